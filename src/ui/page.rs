//! Full HTML document wrapping the messages panel.

use crate::view::ViewState;

use super::render_messages_panel;

/// Generate the HTML document for a view state.
pub fn render_page(state: &ViewState) -> String {
    let panel = render_messages_panel(state);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Messages</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 2rem; }}
        .messages-list {{ padding-left: 1.25rem; }}
        .message {{ margin-bottom: 0.75rem; }}
        .message-timestamp {{ color: #6b7280; }}
        .messages-error {{ color: #b91c1c; }}
    </style>
</head>
<body>
    <main id="app">
        {panel}
    </main>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wraps_panel() {
        let page = render_page(&ViewState::Loaded(Vec::new()));

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Messages</title>"));
        assert!(page.contains("data-state=\"loaded\""));
        assert!(page.trim_end().ends_with("</html>"));
    }
}
