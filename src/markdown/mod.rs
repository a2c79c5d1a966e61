//! Markdown parsing and HTML rendering
//!
//! Conversion is delegated to comrak, a CommonMark + GFM compatible parser.
//!
//! # Features
//! - Render markdown to HTML with failure containment ([`Renderer`])
//! - Parse markdown into an owned AST for the preview ([`parse_markdown`])
//! - Extract the plain-text content of rendered HTML ([`html_text_content`])
//!
//! # Example
//! ```ignore
//! use crate::markdown::{MarkdownOptions, Renderer};
//!
//! let renderer = Renderer::new(MarkdownOptions::default());
//! let html = renderer.render("# Hello\n\nThis is **bold** text.");
//! ```

mod parser;
mod renderer;
mod text;

pub use parser::{
    parse_markdown, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, TableAlignment,
};
pub use renderer::{ComrakConverter, MarkdownConverter, MarkdownOptions, RenderError, Renderer};
pub use text::html_text_content;
