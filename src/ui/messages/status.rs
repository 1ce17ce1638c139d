//! Loading and error indicator shown below the list.

use leptos::prelude::*;

use crate::view::ViewState;

/// Status line for a view state.
///
/// Renders a busy indicator while loading and an alert when the fetch failed.
/// A loaded view, even an empty one, shows nothing.
#[component]
pub fn ViewStatus(
    /// State to describe.
    state: ViewState,
) -> impl IntoView {
    match state {
        ViewState::Loading => Some(
            view! {
                <p class="messages-status" aria-busy="true">"Loading messages…"</p>
            }
            .into_any(),
        ),
        ViewState::Failed(error) => {
            let kind = error.kind();
            let text = format!("Could not load messages: {error}");
            Some(
                view! {
                    <p class="messages-error" role="alert" data-error-kind=kind>{text}</p>
                }
                .into_any(),
            )
        }
        ViewState::Loaded(_) => None,
    }
}
