//! UI components and page rendering.
//!
//! Leptos SSR components render a [`ViewState`] snapshot to HTML. Nothing in
//! this module fetches; it only turns state into markup.
//!
//! # Structure
//!
//! - [`messages`]: the messages panel and its parts
//! - [`page`]: the full HTML document served at `/`

pub mod messages;
pub mod page;

use leptos::prelude::*;

use crate::view::ViewState;
use messages::MessagesPanel;

pub use page::render_page;

/// Render the messages panel for `state` as an HTML fragment.
pub fn render_messages_panel(state: &ViewState) -> String {
    let state = state.clone();
    Owner::new().with(move || view! { <MessagesPanel state=state /> }.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::message::{KeyedMessage, Message};
    use std::sync::Arc;

    fn loaded(messages: Vec<Message>) -> ViewState {
        ViewState::Loaded(KeyedMessage::key_all(messages))
    }

    #[test]
    fn test_loading_renders_heading_and_no_items() {
        let html = render_messages_panel(&ViewState::Loading);

        assert!(html.contains("<h1>Messages</h1>"));
        assert_eq!(html.matches("<li").count(), 0);
        assert!(html.contains("aria-busy=\"true\""));
        assert!(html.contains("data-state=\"loading\""));
    }

    #[test]
    fn test_item_structure() {
        let html = render_messages_panel(&loaded(vec![Message::new(
            "Alice",
            "Hi",
            "2024-01-01T00:00:00Z",
        )]));

        assert_eq!(html.matches("<li").count(), 1);
        assert!(html.contains("<strong class=\"message-sender\">Alice</strong>"));
        assert!(html.contains(": "));
        assert!(html.contains("Hi"));
        assert!(html.contains("<br"));
        assert!(html.contains("<small class=\"message-timestamp\">2024-01-01T00:00:00Z</small>"));
        assert!(!html.contains("role=\"alert\""));
        assert!(!html.contains("aria-busy"));
    }

    #[test]
    fn test_items_keyed_by_message_key() {
        let state = loaded(vec![Message::new("a", "b", "c")]);
        let key = state.messages()[0].key;

        let html = render_messages_panel(&state);
        assert!(html.contains(&format!("data-key=\"{key}\"")));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_messages_panel(&loaded(vec![Message::new(
            "<script>",
            "a & b",
            "now",
        )]));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_failure_renders_alert_and_empty_list() {
        let parse = serde_json::from_str::<Vec<Message>>("nope").unwrap_err();
        let state = ViewState::Failed(Arc::new(FetchError::from(parse)));

        let html = render_messages_panel(&state);
        assert_eq!(html.matches("<li").count(), 0);
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("data-error-kind=\"parse\""));
        assert!(html.contains("Could not load messages"));
    }
}
