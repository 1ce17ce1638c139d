//! Messages view components.
//!
//! Pure renderers of a [`ViewState`](crate::view::ViewState) snapshot; the
//! fetch lifecycle lives in [`crate::view`].

mod item;
mod panel;
mod status;

pub use item::MessageItem;
pub use panel::MessagesPanel;
pub use status::ViewStatus;
