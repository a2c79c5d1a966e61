//! Drawing the parsed Markdown AST with egui widgets
//!
//! Block nodes map to vertical layout, inline nodes to labels inside a
//! wrapped horizontal layout. Formatting from enclosing inline nodes
//! (bold inside a link inside emphasis...) accumulates in [`InlineStyle`].

use eframe::egui::{self, FontId, RichText, Ui, Vec2};

use crate::markdown::{
    ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, TableAlignment,
};
use crate::theme::Palette;

/// Indent per nesting level, in points.
const INDENT: f32 = 18.0;

/// Appearance shared by every node of one preview pass.
#[derive(Debug, Clone, Copy)]
pub(super) struct PreviewStyle {
    pub palette: Palette,
    pub font_size: f32,
    /// Draw raw HTML nodes as literal text
    pub show_raw_html: bool,
}

/// Inline formatting inherited from parent nodes.
#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle {
    bold: bool,
    italic: bool,
    strikethrough: bool,
}

impl InlineStyle {
    fn apply(self, mut text: RichText) -> RichText {
        if self.bold {
            text = text.strong();
        }
        if self.italic {
            text = text.italics();
        }
        if self.strikethrough {
            text = text.strikethrough();
        }
        text
    }
}

/// Font size for a heading level.
pub(super) fn heading_size(level: u8, base: f32) -> f32 {
    match level {
        1 => base * 1.8,
        2 => base * 1.5,
        3 => base * 1.3,
        4 => base * 1.15,
        5 => base * 1.05,
        _ => base,
    }
}

/// Marker drawn before a list item.
pub(super) fn list_marker(list_type: ListType, index: usize) -> String {
    match list_type {
        ListType::Bullet => "•".to_string(),
        ListType::Ordered { start } => format!("{}.", start + index),
    }
}

pub(super) fn render_document(ui: &mut Ui, document: &MarkdownDocument, style: &PreviewStyle) {
    for child in &document.root.children {
        render_block(ui, child, style);
    }
}

fn render_block(ui: &mut Ui, node: &MarkdownNode, style: &PreviewStyle) {
    match &node.node_type {
        MarkdownNodeType::Heading { level } => render_heading(ui, node, *level, style),
        MarkdownNodeType::Paragraph => {
            render_inline_content(ui, node, style);
            ui.add_space(style.font_size * 0.5);
        }
        MarkdownNodeType::BlockQuote => render_blockquote(ui, node, style),
        MarkdownNodeType::List { list_type, .. } => render_list(ui, node, *list_type, style),
        MarkdownNodeType::CodeBlock { literal, .. } => render_code_block(ui, literal, style),
        MarkdownNodeType::ThematicBreak => render_thematic_break(ui, style),
        MarkdownNodeType::Table { .. } => render_table(ui, node, style),
        MarkdownNodeType::HtmlBlock(html) => {
            if style.show_raw_html {
                render_code_block(ui, html, style);
            }
        }
        MarkdownNodeType::FootnoteDefinition(name) => {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("[{}]", name))
                        .size(style.font_size * 0.85)
                        .color(style.palette.text_muted),
                );
                ui.vertical(|ui| {
                    for child in &node.children {
                        render_block(ui, child, style);
                    }
                });
            });
        }
        _ => {
            for child in &node.children {
                render_block(ui, child, style);
            }
        }
    }
}

fn render_heading(ui: &mut Ui, node: &MarkdownNode, level: u8, style: &PreviewStyle) {
    ui.add_space(if level <= 2 { 8.0 } else { 4.0 });
    ui.label(
        RichText::new(node.text_content())
            .size(heading_size(level, style.font_size))
            .strong()
            .color(style.palette.heading),
    );
    if level <= 2 {
        render_thematic_break(ui, style);
    } else {
        ui.add_space(4.0);
    }
}

fn render_blockquote(ui: &mut Ui, node: &MarkdownNode, style: &PreviewStyle) {
    ui.horizontal(|ui| {
        let inner = ui
            .scope(|ui| {
                // Reserve room for the bar, painted once the height is known
                ui.add_space(12.0);
                ui.vertical(|ui| {
                    for child in &node.children {
                        render_block(ui, child, style);
                    }
                })
                .response
                .rect
            })
            .inner;

        let bar = egui::Rect::from_min_size(
            egui::pos2(inner.left() - 12.0, inner.top()),
            Vec2::new(4.0, inner.height()),
        );
        ui.painter().rect_filled(bar, 0.0, style.palette.quote_bar);
    });
}

fn render_list(ui: &mut Ui, node: &MarkdownNode, list_type: ListType, style: &PreviewStyle) {
    for (index, item) in node.children.iter().enumerate() {
        let marker = match item.node_type {
            MarkdownNodeType::TaskItem { checked: true } => "☑".to_string(),
            MarkdownNodeType::TaskItem { checked: false } => "☐".to_string(),
            _ => list_marker(list_type, index),
        };

        ui.horizontal(|ui| {
            ui.add_space(INDENT * 0.5);
            ui.label(
                RichText::new(marker)
                    .size(style.font_size)
                    .color(style.palette.text_muted),
            );
            ui.vertical(|ui| {
                for child in &item.children {
                    render_block(ui, child, style);
                }
            });
        });
    }
    ui.add_space(style.font_size * 0.3);
}

fn render_code_block(ui: &mut Ui, literal: &str, style: &PreviewStyle) {
    egui::Frame::none()
        .fill(style.palette.code_bg)
        .inner_margin(8.0)
        .rounding(4.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(literal.trim_end_matches('\n'))
                    .font(FontId::monospace(style.font_size * 0.9))
                    .color(style.palette.text),
            );
        });
    ui.add_space(style.font_size * 0.5);
}

fn render_thematic_break(ui: &mut Ui, style: &PreviewStyle) {
    ui.add_space(4.0);
    let (rect, _) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, style.palette.rule);
    ui.add_space(4.0);
}

/// Horizontal placement of a table cell's content.
fn cell_align(alignment: Option<&TableAlignment>) -> egui::Align {
    match alignment {
        Some(TableAlignment::Center) => egui::Align::Center,
        Some(TableAlignment::Right) => egui::Align::Max,
        _ => egui::Align::Min,
    }
}

fn render_table(ui: &mut Ui, node: &MarkdownNode, style: &PreviewStyle) {
    let alignments: &[TableAlignment] = match &node.node_type {
        MarkdownNodeType::Table { alignments } => alignments,
        _ => &[],
    };

    egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, style.palette.border))
        .inner_margin(4.0)
        .show(ui, |ui| {
            egui::Grid::new(ui.next_auto_id())
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for row in &node.children {
                        let header =
                            matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
                        for (column, cell) in row.children.iter().enumerate() {
                            let cell_style = InlineStyle {
                                bold: header,
                                ..InlineStyle::default()
                            };
                            let align = cell_align(alignments.get(column));
                            ui.with_layout(egui::Layout::top_down(align), |ui| {
                                ui.horizontal(|ui| {
                                    for child in &cell.children {
                                        render_inline_node(ui, child, style, cell_style);
                                    }
                                });
                            });
                        }
                        ui.end_row();
                    }
                });
        });
    ui.add_space(style.font_size * 0.5);
}

fn render_inline_content(ui: &mut Ui, node: &MarkdownNode, style: &PreviewStyle) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for child in &node.children {
            render_inline_node(ui, child, style, InlineStyle::default());
        }
    });
}

fn render_inline_node(ui: &mut Ui, node: &MarkdownNode, style: &PreviewStyle, inline: InlineStyle) {
    let text = |s: &str| RichText::new(s).size(style.font_size).color(style.palette.text);

    match &node.node_type {
        MarkdownNodeType::Text(content) => {
            ui.label(inline.apply(text(content.as_str())));
        }
        MarkdownNodeType::Strong => render_inline_children(
            ui,
            node,
            style,
            InlineStyle {
                bold: true,
                ..inline
            },
        ),
        MarkdownNodeType::Emphasis => render_inline_children(
            ui,
            node,
            style,
            InlineStyle {
                italic: true,
                ..inline
            },
        ),
        MarkdownNodeType::Strikethrough => render_inline_children(
            ui,
            node,
            style,
            InlineStyle {
                strikethrough: true,
                ..inline
            },
        ),
        MarkdownNodeType::Code(code) => {
            ui.label(
                RichText::new(code)
                    .font(FontId::monospace(style.font_size * 0.9))
                    .color(style.palette.text)
                    .background_color(style.palette.code_bg),
            );
        }
        MarkdownNodeType::Link { url } => {
            let label = node.text_content();
            let label = if label.is_empty() { url.clone() } else { label };
            ui.hyperlink_to(
                inline.apply(RichText::new(label).size(style.font_size).color(style.palette.link)),
                url,
            )
            .on_hover_text(url.as_str());
        }
        MarkdownNodeType::Image { url } => {
            let alt = node.text_content();
            ui.label(
                RichText::new(format!("🖼 {}", if alt.is_empty() { url } else { &alt }))
                    .size(style.font_size)
                    .color(style.palette.text_muted),
            )
            .on_hover_text(url.as_str());
        }
        MarkdownNodeType::FootnoteReference(name) => {
            ui.label(
                RichText::new(format!("[{}]", name))
                    .size(style.font_size * 0.75)
                    .raised()
                    .color(style.palette.link),
            );
        }
        MarkdownNodeType::HtmlInline(html) => {
            if style.show_raw_html {
                ui.label(
                    RichText::new(html)
                        .font(FontId::monospace(style.font_size * 0.9))
                        .color(style.palette.text_muted),
                );
            }
        }
        MarkdownNodeType::SoftBreak => {
            ui.label(text(" "));
        }
        MarkdownNodeType::LineBreak => {
            ui.end_row();
        }
        _ => render_inline_children(ui, node, style, inline),
    }
}

fn render_inline_children(
    ui: &mut Ui,
    node: &MarkdownNode,
    style: &PreviewStyle,
    inline: InlineStyle,
) {
    for child in &node.children {
        render_inline_node(ui, child, style, inline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_sizes_decrease() {
        let sizes: Vec<f32> = (1..=6).map(|level| heading_size(level, 14.0)).collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(sizes[5], 14.0);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(list_marker(ListType::Bullet, 4), "•");
        assert_eq!(list_marker(ListType::Ordered { start: 1 }, 0), "1.");
        assert_eq!(list_marker(ListType::Ordered { start: 3 }, 2), "5.");
    }

    #[test]
    fn test_cell_align_follows_column_alignment() {
        assert_eq!(cell_align(Some(&TableAlignment::Center)), egui::Align::Center);
        assert_eq!(cell_align(Some(&TableAlignment::Right)), egui::Align::Max);
        assert_eq!(cell_align(Some(&TableAlignment::Left)), egui::Align::Min);
        assert_eq!(cell_align(None), egui::Align::Min);
    }
}
