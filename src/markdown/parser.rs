//! Markdown parser implementation using comrak
//!
//! This module converts comrak's arena-allocated AST into an owned tree
//! that the preview widget can walk between frames.

use comrak::{
    nodes::{AstNode, ListType as ComrakListType, NodeValue, TableAlignment as ComrakAlignment},
    parse_document, Arena,
};

use super::renderer::{contain_panic, MarkdownOptions, RenderError};

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered { start: usize },
}

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakAlignment> for TableAlignment {
    fn from(align: ComrakAlignment) -> Self {
        match align {
            ComrakAlignment::None => TableAlignment::None,
            ComrakAlignment::Left => TableAlignment::Left,
            ComrakAlignment::Center => TableAlignment::Center,
            ComrakAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Represents the type of a markdown node.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    /// Root document node
    Document,
    /// Block quote (>)
    BlockQuote,
    /// List container
    List { list_type: ListType, tight: bool },
    /// List item
    Item,
    /// Task list item
    TaskItem { checked: bool },
    /// Fenced or indented code block
    CodeBlock { info: String, literal: String },
    /// Raw HTML block
    HtmlBlock(String),
    /// Paragraph
    Paragraph,
    /// Heading (level 1-6)
    Heading { level: u8 },
    /// Thematic break (horizontal rule)
    ThematicBreak,
    /// Table
    Table { alignments: Vec<TableAlignment> },
    /// Table row
    TableRow { header: bool },
    /// Table cell
    TableCell,
    /// Inline text content
    Text(String),
    /// Soft line break
    SoftBreak,
    /// Hard line break
    LineBreak,
    /// Inline code
    Code(String),
    /// Inline HTML
    HtmlInline(String),
    /// Emphasis (italic)
    Emphasis,
    /// Strong emphasis (bold)
    Strong,
    /// Strikethrough
    Strikethrough,
    /// Link
    Link { url: String },
    /// Image
    Image { url: String },
    /// Footnote reference
    FootnoteReference(String),
    /// Footnote definition
    FootnoteDefinition(String),
    /// Anything the preview doesn't draw specially
    Other,
}

/// A node in the markdown AST.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownNode {
    /// The type of this node
    pub node_type: MarkdownNodeType,
    /// Child nodes
    pub children: Vec<MarkdownNode>,
}

impl MarkdownNode {
    /// Get all text content from this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) | MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownDocument {
    /// Root node of the AST
    pub root: MarkdownNode,
}

impl MarkdownDocument {
    /// Whether the document has no block content.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into an owned AST.
///
/// Uses the same extension set as HTML rendering so the preview matches
/// the exported document.
pub fn parse_markdown(
    markdown: &str,
    options: &MarkdownOptions,
) -> Result<MarkdownDocument, RenderError> {
    let comrak_options = options.to_comrak_options();

    contain_panic(|| {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &comrak_options);
        MarkdownDocument {
            root: convert_node(root),
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a comrak AST node to our MarkdownNode structure.
fn convert_node<'a>(node: &'a AstNode<'a>) -> MarkdownNode {
    let node_type = convert_node_value(&node.data.borrow().value);
    let children = node.children().map(convert_node).collect();

    MarkdownNode {
        node_type,
        children,
    }
}

/// Convert a comrak NodeValue to our MarkdownNodeType.
fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet,
                ComrakListType::Ordered => ListType::Ordered { start: list.start },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: heading.level,
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table
                .alignments
                .iter()
                .map(|a| TableAlignment::from(*a))
                .collect(),
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
        },
        NodeValue::FootnoteReference(reference) => {
            MarkdownNodeType::FootnoteReference(reference.name.clone())
        }
        NodeValue::FootnoteDefinition(def) => {
            MarkdownNodeType::FootnoteDefinition(def.name.clone())
        }
        _ => MarkdownNodeType::Other,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(markdown: &str) -> MarkdownDocument {
        parse_markdown(markdown, &MarkdownOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("");
        assert!(doc.is_empty());
        assert_eq!(doc.root.node_type, MarkdownNodeType::Document);
    }

    #[test]
    fn test_parse_heading() {
        let doc = parse("## Heading 2");
        assert_eq!(
            doc.root.children[0].node_type,
            MarkdownNodeType::Heading { level: 2 }
        );
        assert_eq!(doc.root.children[0].text_content(), "Heading 2");
    }

    #[test]
    fn test_parse_bold_text_ast_structure() {
        let doc = parse("This is **bold** text");
        let para = &doc.root.children[0];
        assert_eq!(para.node_type, MarkdownNodeType::Paragraph);

        let strong = para
            .children
            .iter()
            .find(|c| c.node_type == MarkdownNodeType::Strong)
            .expect("Paragraph should contain Strong node");
        assert_eq!(strong.text_content(), "bold");
    }

    #[test]
    fn test_parse_ordered_list_start() {
        let doc = parse("3. Third\n4. Fourth");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::List { list_type, tight } => {
                assert_eq!(*list_type, ListType::Ordered { start: 3 });
                assert!(*tight);
            }
            other => panic!("Expected list node, got {:?}", other),
        }
        assert_eq!(doc.root.children[0].children.len(), 2);
    }

    #[test]
    fn test_parse_task_list() {
        let doc = parse("- [ ] Unchecked\n- [x] Checked");
        let list = &doc.root.children[0];
        assert_eq!(
            list.children[0].node_type,
            MarkdownNodeType::TaskItem { checked: false }
        );
        assert_eq!(
            list.children[1].node_type,
            MarkdownNodeType::TaskItem { checked: true }
        );
    }

    #[test]
    fn test_parse_table_with_alignment() {
        let doc = parse("| Left | Center | Right |\n|:-----|:------:|------:|\n| L | C | R |");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::Table { alignments } => assert_eq!(
                alignments,
                &vec![
                    TableAlignment::Left,
                    TableAlignment::Center,
                    TableAlignment::Right
                ]
            ),
            other => panic!("Expected table node, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_code_block() {
        let doc = parse("```rust\nfn main() {}\n```");
        assert_eq!(
            doc.root.children[0].node_type,
            MarkdownNodeType::CodeBlock {
                info: "rust".to_string(),
                literal: "fn main() {}\n".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_blockquote_and_rule() {
        let doc = parse("> quoted\n\n---\n\nafter");
        assert_eq!(doc.root.children[0].node_type, MarkdownNodeType::BlockQuote);
        assert_eq!(doc.root.children[1].node_type, MarkdownNodeType::ThematicBreak);
    }

    #[test]
    fn test_disabled_extension_is_not_parsed() {
        let options = MarkdownOptions {
            strikethrough: false,
            ..MarkdownOptions::default()
        };
        let doc = parse_markdown("~~kept~~", &options).unwrap();
        assert_eq!(doc.root.text_content(), "~~kept~~");
    }
}
