//! The mounted messages view.
//!
//! Mounting a [`MessagesView`] spawns exactly one fetch task owned by the view.
//! The task publishes a single [`ViewState`] transition through a watch channel
//! and is cancelled when the view is unmounted or dropped, so a response that
//! arrives late is never committed.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use messages_view::client::HttpMessageSource;
//! use messages_view::config::EndpointConfig;
//! use messages_view::view::MessagesView;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpMessageSource::new(&EndpointConfig::default())?;
//! let view = MessagesView::mount(Arc::new(source));
//!
//! let state = view.settled().await;
//! println!("{} messages", state.messages().len());
//! println!("{}", view.render());
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::MessageSource;
use crate::error::{FetchError, Result};
use crate::message::{KeyedMessage, Message};
use crate::ui;

/// What the view currently shows.
///
/// Transitions exactly once per mount: `Loading` to either `Loaded` or
/// `Failed`.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// The fetch has not resolved yet.
    #[default]
    Loading,
    /// The fetch succeeded; messages are in server order.
    Loaded(Vec<KeyedMessage>),
    /// The fetch failed; the list stays empty.
    Failed(Arc<FetchError>),
}

impl ViewState {
    fn from_fetch(result: Result<Vec<Message>>) -> Self {
        match result {
            Ok(messages) => Self::Loaded(KeyedMessage::key_all(messages)),
            Err(e) => Self::Failed(Arc::new(e)),
        }
    }

    /// Messages to display. Empty unless loaded.
    pub fn messages(&self) -> &[KeyedMessage] {
        match self {
            Self::Loaded(messages) => messages,
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Loading | Self::Loaded(_) => None,
        }
    }

    /// Short label used in markup and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

/// A mounted messages view owning its fetch task.
#[derive(Debug)]
pub struct MessagesView {
    state: watch::Receiver<ViewState>,
    cancel: CancellationToken,
    gate: CommitGate,
    task: Option<JoinHandle<()>>,
    source: String,
}

/// Serializes the fetch task's commit against the owner's teardown.
///
/// Once closed, no commit can land; a commit that already holds the gate
/// finishes before `close` returns.
#[derive(Debug, Clone)]
struct CommitGate(Arc<Mutex<bool>>);

impl CommitGate {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(true)))
    }

    fn close(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }

    /// Publish `next` unless the gate is closed. Returns whether it was published.
    fn commit(&self, state: &watch::Sender<ViewState>, next: ViewState) -> bool {
        let open = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *open {
            state.send_replace(next);
        }
        *open
    }
}

impl MessagesView {
    /// Mount the view and start its one fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(source: Arc<dyn MessageSource>) -> Self {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let cancel = CancellationToken::new();
        let gate = CommitGate::new();
        let description = source.describe();

        info!(
            name: "messages.view.mounted",
            source = %description,
            "Messages view mounted"
        );

        let task = tokio::spawn(run_fetch(source, tx, cancel.clone(), gate.clone()));

        Self {
            state: rx,
            cancel,
            gate,
            task: Some(task),
            source: description,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Wait until the fetch resolves.
    ///
    /// Returns immediately with the current state if the fetch task is gone
    /// (for example after an unmount).
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.state.clone();
        if let Ok(state) = rx.wait_for(|s| !s.is_loading()).await {
            return state.clone();
        }
        rx.borrow().clone()
    }

    /// Like [`settled`](Self::settled), giving up after `limit`.
    pub async fn settled_within(&self, limit: Duration) -> ViewState {
        tokio::time::timeout(limit, self.settled())
            .await
            .unwrap_or_else(|_| self.state())
    }

    /// Render the current state as an HTML fragment. Never fetches.
    pub fn render(&self) -> String {
        ui::render_messages_panel(&self.state())
    }

    /// Cancel the fetch (if still pending) and wait for the task to finish.
    pub async fn unmount(mut self) {
        self.gate.close();
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!(error = %e, "Fetch task ended abnormally");
            }
        }
        info!(
            name: "messages.view.unmounted",
            source = %self.source,
            state = self.state.borrow().label(),
            "Messages view unmounted"
        );
    }
}

impl Drop for MessagesView {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.gate.close();
            self.cancel.cancel();
            task.abort();
            debug!(
                name: "messages.view.unmounted",
                source = %self.source,
                "Messages view dropped"
            );
        }
    }
}

async fn run_fetch(
    source: Arc<dyn MessageSource>,
    state: watch::Sender<ViewState>,
    cancel: CancellationToken,
    gate: CommitGate,
) {
    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("Fetch cancelled before the response arrived");
            return;
        }
        result = source.fetch_messages() => result,
    };

    if let Err(e) = &result {
        warn!(
            name: "messages.fetch.failed",
            kind = e.kind(),
            error = %e,
            "Message fetch failed"
        );
    }

    if !gate.commit(&state, ViewState::from_fetch(result)) {
        info!(
            name: "messages.view.stale_discarded",
            "Discarding response for unmounted view"
        );
    }
}

/// Mount a view, wait for its fetch, render the fragment and unmount.
///
/// Returns the fragment together with the state it was rendered from.
pub async fn render_once(source: Arc<dyn MessageSource>) -> (String, ViewState) {
    let view = MessagesView::mount(source);
    let state = view.settled().await;
    let fragment = ui::render_messages_panel(&state);
    view.unmount().await;
    (fragment, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Source that waits for a signal before answering, counting calls.
    struct GatedSource {
        calls: AtomicUsize,
        gate: Notify,
        messages: Vec<Message>,
    }

    impl GatedSource {
        fn new(messages: Vec<Message>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
                messages,
            })
        }
    }

    #[async_trait]
    impl MessageSource for GatedSource {
        async fn fetch_messages(&self) -> Result<Vec<Message>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(self.messages.clone())
        }

        fn describe(&self) -> String {
            "gated".into()
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl MessageSource for BrokenSource {
        async fn fetch_messages(&self) -> Result<Vec<Message>> {
            let err = serde_json::from_str::<Vec<Message>>("{\"not\":\"a list\"}").unwrap_err();
            Err(err.into())
        }

        fn describe(&self) -> String {
            "broken".into()
        }
    }

    #[tokio::test]
    async fn test_starts_loading_and_empty() {
        let source = GatedSource::new(vec![Message::new("a", "b", "c")]);
        let view = MessagesView::mount(source.clone());

        let state = view.state();
        assert!(state.is_loading());
        assert!(state.messages().is_empty());
    }

    #[tokio::test]
    async fn test_loads_messages_in_order() {
        let source = GatedSource::new(vec![
            Message::new("Alice", "first", "1"),
            Message::new("Bob", "second", "2"),
        ]);
        let view = MessagesView::mount(source.clone());
        tokio::task::yield_now().await;
        source.gate.notify_one();

        let state = view.settled().await;
        let senders: Vec<_> = state
            .messages()
            .iter()
            .map(|m| m.message.sender.as_str())
            .collect();
        assert_eq!(senders, ["Alice", "Bob"]);
        assert_eq!(state.label(), "loaded");
    }

    #[tokio::test]
    async fn test_renders_never_refetch() {
        let source = GatedSource::new(vec![]);
        let view = MessagesView::mount(source.clone());
        source.gate.notify_one();
        view.settled().await;

        for _ in 0..5 {
            let _ = view.render();
            let _ = view.state();
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_explicit() {
        let view = MessagesView::mount(Arc::new(BrokenSource));

        let state = view.settled().await;
        assert_eq!(state.label(), "failed");
        assert_eq!(state.error().map(FetchError::kind), Some("parse"));
        assert!(state.messages().is_empty());
    }

    #[tokio::test]
    async fn test_unmount_discards_late_response() {
        let source = GatedSource::new(vec![Message::new("late", "x", "y")]);
        let view = MessagesView::mount(source.clone());
        let mut observer = view.subscribe();
        tokio::task::yield_now().await;

        view.unmount().await;
        source.gate.notify_one();
        tokio::task::yield_now().await;

        assert!(observer.borrow_and_update().is_loading());
        assert!(observer.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_settled_within_times_out_while_loading() {
        let source = GatedSource::new(vec![]);
        let view = MessagesView::mount(source);

        let state = view.settled_within(Duration::from_millis(20)).await;
        assert!(state.is_loading());
    }

    #[test]
    fn test_closed_gate_rejects_commit() {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let gate = CommitGate::new();

        gate.close();
        let committed = gate.commit(&tx, ViewState::Loaded(Vec::new()));

        assert!(!committed);
        assert!(rx.borrow().is_loading());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_open_gate_commits_and_survives_later_close() {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let gate = CommitGate::new();

        assert!(gate.commit(&tx, ViewState::Loaded(Vec::new())));
        gate.close();

        assert_eq!(rx.borrow().label(), "loaded");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_drop_while_response_in_flight_never_commits() {
        for _ in 0..50 {
            let source = GatedSource::new(vec![Message::new("late", "x", "y")]);
            let view = MessagesView::mount(source.clone());
            let mut observer = view.subscribe();

            source.gate.notify_one();
            drop(view);

            // Either the commit landed before the drop, or it never lands.
            let before = observer.borrow_and_update().label();
            tokio::time::sleep(Duration::from_millis(5)).await;
            if before == "loading" {
                assert!(observer.borrow().is_loading());
                assert!(!observer.has_changed().unwrap_or(false));
            }
        }
    }
}
