//! Single message list item.

use leptos::prelude::*;

use crate::message::KeyedMessage;

/// One message: bold sender, `": "`, content, a line break, then the
/// timestamp in small print.
///
/// The item is keyed by the message's [`MessageKey`](crate::message::MessageKey),
/// never by its list position.
#[component]
pub fn MessageItem(
    /// Message to render.
    message: KeyedMessage,
) -> impl IntoView {
    let KeyedMessage { key, message } = message;
    let key = key.to_string();

    view! {
        <li class="message" data-key=key>
            <strong class="message-sender">{message.sender}</strong>
            ": "
            {message.content}
            <br/>
            <small class="message-timestamp">{message.timestamp}</small>
        </li>
    }
}
