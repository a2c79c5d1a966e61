//! Live preview of the converted document
//!
//! The preview has two modes: a formatted view drawn from the parsed AST,
//! and the generated HTML markup. Parsing and rendering results are cached
//! per source text so idle frames don't redo the conversion.

mod render;

use eframe::egui::{self, FontId, RichText, ScrollArea, Ui};
use log::{debug, warn};

use crate::config::PreviewMode;
use crate::document::DocumentSource;
use crate::markdown::{
    parse_markdown, MarkdownConverter, MarkdownDocument, MarkdownOptions, RenderError, Renderer,
};
use crate::theme::Palette;
use render::{render_document, PreviewStyle};

/// Shown in place of the preview while there is no source text.
pub const PREVIEW_PLACEHOLDER: &str = "Preview will appear here...";

/// Cached conversion results for one version of the source text.
#[derive(Debug, Default)]
struct PreviewCache {
    source_hash: u64,
    document: Option<Result<MarkdownDocument, RenderError>>,
    html: Option<Result<String, RenderError>>,
}

/// Preview pane state.
#[derive(Debug)]
pub struct MarkdownPreview {
    options: MarkdownOptions,
    cache: Option<PreviewCache>,
}

impl MarkdownPreview {
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            cache: None,
        }
    }

    /// Change the parse options, dropping cached results if they differ.
    pub fn set_options(&mut self, options: MarkdownOptions) {
        if self.options != options {
            self.options = options;
            self.cache = None;
        }
    }

    /// Make sure the cache belongs to `source`.
    ///
    /// Returns `true` if the previous cache was discarded.
    fn refresh(&mut self, source: &DocumentSource) -> bool {
        let hash = source.content_hash();
        match &self.cache {
            Some(cache) if cache.source_hash == hash => false,
            _ => {
                self.cache = Some(PreviewCache {
                    source_hash: hash,
                    ..PreviewCache::default()
                });
                true
            }
        }
    }

    fn cache_mut(&mut self, source: &DocumentSource) -> &mut PreviewCache {
        self.refresh(source);
        self.cache.get_or_insert_with(PreviewCache::default)
    }

    /// Parsed AST for `source`, or the reason parsing failed.
    pub fn document(&mut self, source: &DocumentSource) -> &Result<MarkdownDocument, RenderError> {
        let options = self.options.clone();
        self.cache_mut(source).document.get_or_insert_with(|| {
            debug!("Parsing preview ({} bytes)", source.as_str().len());
            let parsed = parse_markdown(source.as_str(), &options);
            if let Err(e) = &parsed {
                warn!("Preview parse failed, showing source text: {}", e);
            }
            parsed
        })
    }

    fn rendered<C: MarkdownConverter>(
        &mut self,
        source: &DocumentSource,
        renderer: &Renderer<C>,
    ) -> &Result<String, RenderError> {
        self.cache_mut(source).html.get_or_insert_with(|| {
            let rendered = renderer.try_render(source.as_str());
            if let Err(e) = &rendered {
                warn!("Preview render failed, showing source text: {}", e);
            }
            rendered
        })
    }

    /// Rendered HTML for `source`, or the source itself if rendering failed.
    pub fn html<'a, C: MarkdownConverter>(
        &'a mut self,
        source: &'a DocumentSource,
        renderer: &Renderer<C>,
    ) -> &'a str {
        match self.rendered(source, renderer) {
            Ok(html) => html,
            Err(_) => source.as_str(),
        }
    }

    /// Whether `source` could not be converted and is shown as plain text.
    pub fn is_degraded<C: MarkdownConverter>(
        &mut self,
        source: &DocumentSource,
        renderer: &Renderer<C>,
    ) -> bool {
        self.rendered(source, renderer).is_err() || self.document(source).is_err()
    }

    /// Draw the preview pane.
    pub fn show<C: MarkdownConverter>(
        &mut self,
        ui: &mut Ui,
        source: &DocumentSource,
        mode: PreviewMode,
        renderer: &Renderer<C>,
        font_size: f32,
    ) {
        let palette = Palette::for_visuals(ui.visuals());

        if source.is_empty() {
            ui.label(
                RichText::new(PREVIEW_PLACEHOLDER)
                    .italics()
                    .size(font_size)
                    .color(palette.text_muted),
            );
            return;
        }

        let style = PreviewStyle {
            palette,
            font_size,
            show_raw_html: self.options.allow_raw_html,
        };

        ScrollArea::vertical()
            .id_source("preview_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| match mode {
                PreviewMode::Formatted => {
                    if self.is_degraded(source, renderer) {
                        show_degraded(ui, source.as_str(), &style);
                    } else if let Ok(document) = self.document(source) {
                        render_document(ui, document, &style);
                    }
                }
                PreviewMode::Html => {
                    let html = self.html(source, renderer);
                    ui.add(
                        egui::Label::new(
                            RichText::new(html)
                                .font(FontId::monospace(font_size * 0.9))
                                .color(palette.text),
                        )
                        .selectable(true),
                    );
                }
            });
    }
}

/// Raw source text, shown when the document can't be parsed.
fn show_degraded(ui: &mut Ui, source: &str, style: &PreviewStyle) {
    ui.label(
        RichText::new("Formatting unavailable for this document")
            .small()
            .color(style.palette.text_muted),
    );
    ui.add_space(4.0);
    ui.label(RichText::new(source).size(style.font_size).color(style.palette.text));
}
