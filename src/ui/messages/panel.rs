//! Messages panel component.

use leptos::prelude::*;

use super::{MessageItem, ViewStatus};
use crate::view::ViewState;

/// The whole messages view: heading, list and status line.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <MessagesPanel state=ViewState::Loading />
/// }
/// ```
#[component]
pub fn MessagesPanel(
    /// Snapshot to render.
    state: ViewState,
) -> impl IntoView {
    let label = state.label();
    let items = state
        .messages()
        .iter()
        .cloned()
        .map(|message| view! { <MessageItem message=message /> })
        .collect_view();

    view! {
        <div class="messages-view" data-state=label>
            <h1>"Messages"</h1>
            <ul class="messages-list">
                {items}
            </ul>
            <ViewStatus state=state />
        </div>
    }
}
