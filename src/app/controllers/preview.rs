use pulldown_cmark::{Options, Parser, html};
use serde::{Deserialize, Serialize};

/// Which of the editor and preview panes are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutState {
    #[serde(default = "visible")]
    pub editor_visible: bool,
    #[serde(default = "visible")]
    pub preview_visible: bool,
}

fn visible() -> bool {
    true
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            editor_visible: true,
            preview_visible: true,
        }
    }
}

impl LayoutState {
    /// Toggle the editor pane. Returns new visibility.
    pub fn toggle_editor(&mut self) -> bool {
        self.editor_visible = !self.editor_visible;
        self.editor_visible
    }

    /// Toggle the preview pane. Returns new visibility.
    pub fn toggle_preview(&mut self) -> bool {
        self.preview_visible = !self.preview_visible;
        self.preview_visible
    }

    /// Both panes hidden: the UI shows a hint on how to bring them back.
    pub fn all_hidden(&self) -> bool {
        !self.editor_visible && !self.preview_visible
    }
}

/// Rendered HTML of the active note, refreshed on every switch or edit.
#[derive(Debug, Default)]
pub struct PreviewController {
    html: String,
}

impl PreviewController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render markdown text to an HTML fragment.
    pub fn render_markdown(text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(text, options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        html_output
    }

    pub fn refresh(&mut self, text: &str) {
        self.html = Self::render_markdown(text);
    }

    pub fn clear(&mut self) {
        self.html.clear();
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Standalone HTML page for "Export to HTML".
    pub fn export_document(title: &str, markdown: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape_text(title),
            Self::render_markdown(markdown)
        )
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_headings_and_emphasis() {
        let html = PreviewController::render_markdown("# Fern\n\nWater **weekly**.");
        assert!(html.contains("<h1>Fern</h1>"));
        assert!(html.contains("<strong>weekly</strong>"));
    }

    #[test]
    fn test_render_tables_and_strikethrough() {
        let html = PreviewController::render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_refresh_caches_html() {
        let mut preview = PreviewController::new();
        assert_eq!(preview.html(), "");
        preview.refresh("- item");
        assert!(preview.html().contains("<li>item</li>"));
        preview.clear();
        assert_eq!(preview.html(), "");
    }

    #[test]
    fn test_export_document_is_standalone() {
        let page = PreviewController::export_document("a<b>.md", "## Care");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>a&lt;b&gt;.md</title>"));
        assert!(page.contains("<h2>Care</h2>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_layout_toggles() {
        let mut layout = LayoutState::default();
        assert!(!layout.all_hidden());
        assert!(!layout.toggle_editor());
        assert!(!layout.toggle_preview());
        assert!(layout.all_hidden());
        assert!(layout.toggle_preview());
    }

    #[test]
    fn test_layout_partial_json() {
        let layout: LayoutState = serde_json::from_str(r#"{"preview_visible": false}"#).unwrap();
        assert!(layout.editor_visible);
        assert!(!layout.preview_visible);
    }
}
