//! Markdown-to-HTML rendering with failure containment
//!
//! The renderer wraps a [`MarkdownConverter`] (comrak by default) and
//! guarantees that callers always receive a displayable string: when the
//! conversion fails, the source text is returned unchanged.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use comrak::{markdown_to_html, Options};
use log::warn;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Render Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while converting Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The converter panicked on this input
    Panicked(String),
    /// The converter reported a failure
    Conversion(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Panicked(msg) => write!(f, "Markdown renderer panicked: {}", msg),
            RenderError::Conversion(msg) => write!(f, "Markdown conversion failed: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Run `f`, turning a panic into `RenderError::Panicked`.
pub(crate) fn contain_panic<T>(f: impl FnOnce() -> T) -> Result<T, RenderError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| RenderError::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Options
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions enabled for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Pass raw HTML through instead of omitting it
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            allow_raw_html: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    ///
    /// Heading anchors stay off so headings render as plain `<hN>` elements,
    /// which is what word processors import best.
    pub(crate) fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;

        options.render.unsafe_ = self.allow_raw_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Converters
// ─────────────────────────────────────────────────────────────────────────────

/// A Markdown-to-HTML conversion function.
pub trait MarkdownConverter {
    /// Convert `source` to an HTML fragment.
    fn convert(&self, source: &str) -> Result<String, RenderError>;
}

/// The comrak-backed converter (CommonMark + GFM).
#[derive(Debug, Clone, Default)]
pub struct ComrakConverter {
    options: MarkdownOptions,
}

impl ComrakConverter {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl MarkdownConverter for ComrakConverter {
    fn convert(&self, source: &str) -> Result<String, RenderError> {
        let options = self.options.to_comrak_options();
        contain_panic(|| markdown_to_html(source, &options))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Renders Markdown to HTML, never failing at its public boundary.
#[derive(Debug, Clone, Default)]
pub struct Renderer<C = ComrakConverter> {
    converter: C,
}

impl Renderer {
    /// Create a comrak-backed renderer with the given options.
    pub fn new(options: MarkdownOptions) -> Self {
        Self::with_converter(ComrakConverter::new(options))
    }
}

impl<C: MarkdownConverter> Renderer<C> {
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    /// Convert `source`, reporting failures to the caller.
    pub fn try_render(&self, source: &str) -> Result<String, RenderError> {
        self.converter.convert(source)
    }

    /// Convert `source` to HTML, falling back to the unmodified source text.
    pub fn render(&self, source: &str) -> String {
        match self.try_render(source) {
            Ok(html) => html,
            Err(e) => {
                warn!("Rendering failed, falling back to source text: {}", e);
                source.to_string()
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingConverter;

    impl MarkdownConverter for FailingConverter {
        fn convert(&self, _source: &str) -> Result<String, RenderError> {
            Err(RenderError::Conversion("unsupported".to_string()))
        }
    }

    struct PanickingConverter;

    impl MarkdownConverter for PanickingConverter {
        fn convert(&self, source: &str) -> Result<String, RenderError> {
            contain_panic(|| -> String { panic!("cannot handle {}", source) })
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(MarkdownOptions::default())
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(renderer().render("").trim(), "");
    }

    #[test]
    fn test_render_heading() {
        let html = renderer().render("# Hi");
        assert!(html.contains("<h1>Hi</h1>"), "got {}", html);
    }

    #[test]
    fn test_render_bold() {
        let html = renderer().render("**bold**");
        assert!(html.contains("<strong>bold</strong>"), "got {}", html);
    }

    #[test]
    fn test_render_title_and_body() {
        let html = renderer().render("# Title\n\nBody text");
        assert_eq!(html.replace('\n', ""), "<h1>Title</h1><p>Body text</p>");
    }

    #[test]
    fn test_render_gfm_extensions() {
        let r = renderer();
        assert!(r.render("~~gone~~").contains("<del>gone</del>"));
        assert!(r
            .render("| a | b |\n|---|---|\n| 1 | 2 |")
            .contains("<table>"));
        assert!(r.render("- [x] done").contains("checkbox"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = renderer();
        let source = "# Doc\n\n- one\n- two\n\n```rust\nfn main() {}\n```\n\n> quote";
        assert_eq!(r.render(source), r.render(source));
    }

    #[test]
    fn test_render_malformed_input_never_fails() {
        let r = renderer();
        let inputs = [
            "# Unclosed heading",
            "```\nunclosed code block",
            "| broken | table",
            "[unclosed link(",
            "![broken image",
            "***nested emphasis**",
            "\u{0}\u{feff}<<<>>>&&&",
        ];

        for input in inputs {
            assert!(r.try_render(input).is_ok(), "Failed to render: {}", input);
        }
    }

    #[test]
    fn test_raw_html_passes_through_by_default() {
        let source = "Press <kbd>Ctrl</kbd> and <u>underline</u>\n\n\
                      <div align=\"center\">Centered</div>\n";

        let html = renderer().render(source);
        assert!(html.contains("<kbd>Ctrl</kbd>"), "got {}", html);
        assert!(html.contains("<u>underline</u>"), "got {}", html);
        assert!(html.contains("<div align=\"center\">Centered</div>"), "got {}", html);
        assert!(!html.contains("raw HTML omitted"));

        let stripped = Renderer::new(MarkdownOptions {
            allow_raw_html: false,
            ..MarkdownOptions::default()
        });
        let html = stripped.render(source);
        assert!(html.contains("raw HTML omitted"));
        assert!(!html.contains("Centered"));
    }

    #[test]
    fn test_failed_conversion_falls_back_to_source() {
        let r = Renderer::with_converter(FailingConverter);
        let source = "# Title <b>";
        assert!(r.try_render(source).is_err());
        assert_eq!(r.render(source), source);
    }

    #[test]
    fn test_panicking_converter_is_contained() {
        let r = Renderer::with_converter(PanickingConverter);
        let err = r.try_render("boom").unwrap_err();
        assert!(matches!(err, RenderError::Panicked(ref msg) if msg.contains("boom")));
        assert_eq!(r.render("boom"), "boom");
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Conversion("bad input".to_string());
        assert!(err.to_string().contains("bad input"));
    }
}
