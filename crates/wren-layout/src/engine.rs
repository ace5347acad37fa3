//! Greedy line breaking with deferred baseline alignment.
//!
//! Words are placed left to right. When a word would cross the available
//! width the current line is flushed first. Items wait in a line buffer
//! until the line is complete, because a line may mix font sizes and its
//! baseline is only known once every item on it is known. Flushing shifts
//! each non-superscript text item down so baselines align; superscripts
//! stay top aligned.

use std::collections::HashMap;

use wren_common::{Component, Diagnostics, Warning};

use crate::display_list::{DisplayContent, DisplayItem, DisplayList, FontKey};
use crate::line_element::LineElement;
use crate::metrics::{FontMetrics, MetricsError};
use crate::style::DEFAULT_FONT_SIZE;

/// Horizontal step taken by an emoji.
pub const HSTEP: i32 = 15;

/// Height of the slot an emoji occupies.
pub const VSTEP: i32 = 18;

/// Line advance is `round(max_ascent * LINE_SPACING) + max_descent`.
pub const LINE_SPACING: f32 = 1.25;

/// Available space and base font for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Available width in pixels.
    pub width: i32,
    /// Viewport height in pixels. Does not affect line breaking.
    pub height: i32,
    /// Size used for lines without any text on them.
    pub base_font_size: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            base_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Lays out line elements against a metrics provider.
pub struct LayoutEngine<'m> {
    metrics: &'m dyn FontMetrics,
    options: LayoutOptions,
}

impl<'m> LayoutEngine<'m> {
    /// Create an engine.
    #[must_use]
    pub const fn new(metrics: &'m dyn FontMetrics, options: LayoutOptions) -> Self {
        Self { metrics, options }
    }

    /// The options this engine lays out with.
    #[must_use]
    pub const fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Lay out `elements`.
    #[must_use]
    pub fn layout(&self, elements: &[LineElement]) -> DisplayList {
        self.layout_with_issues(elements).0
    }

    /// Lay out `elements`, keeping warnings.
    ///
    /// Words whose font cannot be measured are skipped with a warning.
    #[must_use]
    pub fn layout_with_issues(&self, elements: &[LineElement]) -> (DisplayList, Vec<Warning>) {
        let mut inline = InlineLayout::new(self.metrics, self.options);
        for element in elements {
            match element {
                LineElement::Word {
                    text,
                    italic,
                    bold,
                    superscript,
                    font_size,
                } => {
                    let font = FontKey {
                        size: *font_size,
                        bold: *bold,
                        italic: *italic,
                    };
                    inline.add_word(text, font, *superscript);
                }
                LineElement::Break { paragraph } => inline.finish_line(*paragraph),
                LineElement::Emoji { code } => inline.add_emoji(code),
            }
        }
        inline.finish()
    }
}

/// Lay out `elements` in one call.
#[must_use]
pub fn layout(
    elements: &[LineElement],
    options: LayoutOptions,
    metrics: &dyn FontMetrics,
) -> DisplayList {
    LayoutEngine::new(metrics, options).layout(elements)
}

/// Vertical metrics and space width for one font size.
#[derive(Debug, Clone, Copy)]
struct FontInfo {
    ascent: i32,
    descent: i32,
    space_width: i32,
}

/// An item waiting for its line to be finished.
#[derive(Debug)]
struct PendingItem {
    item: DisplayItem,
    /// `None` for emoji, which do not take part in baseline alignment.
    text_metrics: Option<(i32, i32)>,
}

/// State of a single layout pass.
struct InlineLayout<'m> {
    metrics: &'m dyn FontMetrics,
    options: LayoutOptions,
    /// Fonts acquired during this pass, by size.
    fonts: HashMap<u32, FontInfo>,
    line: Vec<PendingItem>,
    items: Vec<DisplayItem>,
    cursor_x: i32,
    cursor_y: i32,
    max_y: i32,
    diagnostics: Diagnostics,
}

impl<'m> InlineLayout<'m> {
    fn new(metrics: &'m dyn FontMetrics, options: LayoutOptions) -> Self {
        Self {
            metrics,
            options,
            fonts: HashMap::new(),
            line: Vec::new(),
            items: Vec::new(),
            cursor_x: 0,
            cursor_y: 0,
            max_y: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    fn font(&mut self, size: u32) -> Result<FontInfo, MetricsError> {
        if let Some(&info) = self.fonts.get(&size) {
            return Ok(info);
        }
        let info = FontInfo {
            ascent: self.metrics.ascent(size)?,
            descent: self.metrics.descent(size)?,
            space_width: self.metrics.measure(" ", size)?.width,
        };
        let _ = self.fonts.insert(size, info);
        Ok(info)
    }

    fn add_word(&mut self, text: &str, font: FontKey, superscript: bool) {
        let measured = self.font(font.size).and_then(|info| {
            let extent = self.metrics.measure(text, font.size)?;
            Ok((info, extent))
        });
        let (info, extent) = match measured {
            Ok(measured) => measured,
            Err(err) => {
                self.diagnostics
                    .warn(Component::Layout, format!("skipping {text:?}: {err}"));
                return;
            }
        };

        self.break_before(extent.width);
        self.line.push(PendingItem {
            item: DisplayItem {
                x: self.cursor_x,
                y: self.cursor_y,
                width: extent.width,
                height: extent.height,
                content: DisplayContent::Text {
                    text: text.to_string(),
                    superscript,
                    font,
                },
            },
            text_metrics: Some((info.ascent, info.descent)),
        });
        self.cursor_x += extent.width + info.space_width;
        self.break_after();
    }

    fn add_emoji(&mut self, code: &str) {
        self.break_before(HSTEP);
        self.line.push(PendingItem {
            item: DisplayItem {
                x: self.cursor_x,
                y: self.cursor_y,
                width: HSTEP,
                height: VSTEP,
                content: DisplayContent::Emoji {
                    code: code.to_string(),
                },
            },
            text_metrics: None,
        });
        self.max_y = self.max_y.max(self.cursor_y + VSTEP);
        self.cursor_x += HSTEP;
        self.break_after();
    }

    /// Start a new line if `width` does not fit on a non-empty line.
    fn break_before(&mut self, width: i32) {
        if self.cursor_x > 0 && self.cursor_x + width > self.options.width {
            self.finish_line(false);
        }
    }

    fn break_after(&mut self) {
        if self.cursor_x >= self.options.width {
            self.finish_line(false);
        }
    }

    /// Align the buffered line on a common baseline and advance the cursor.
    fn finish_line(&mut self, paragraph: bool) {
        let text_metrics = self.line.iter().filter_map(|pending| pending.text_metrics);
        let max_ascent = text_metrics.clone().map(|(ascent, _)| ascent).max();
        let max_descent = text_metrics.map(|(_, descent)| descent).max();
        let (max_ascent, max_descent) = match (max_ascent, max_descent) {
            (Some(ascent), Some(descent)) => (ascent, descent),
            _ => self.base_metrics(),
        };

        for pending in self.line.drain(..) {
            let mut item = pending.item;
            let top_aligned = matches!(
                item.content,
                DisplayContent::Text {
                    superscript: true,
                    ..
                }
            );
            if let Some((ascent, _)) = pending.text_metrics
                && !top_aligned
            {
                item.y += max_ascent - ascent;
            }
            self.items.push(item);
        }

        let mut advance = (max_ascent as f32 * LINE_SPACING).round() as i32 + max_descent;
        if paragraph {
            advance *= 2;
        }
        self.cursor_x = 0;
        self.cursor_y += advance;
        self.max_y = self.max_y.max(self.cursor_y);
    }

    /// Ascent and descent of the base font, for lines without text.
    fn base_metrics(&mut self) -> (i32, i32) {
        match self.font(self.options.base_font_size) {
            Ok(info) => (info.ascent, info.descent),
            Err(err) => {
                self.diagnostics.warn(
                    Component::Layout,
                    format!("base font unavailable: {err}"),
                );
                (VSTEP, 0)
            }
        }
    }

    fn finish(mut self) -> (DisplayList, Vec<Warning>) {
        if !self.line.is_empty() {
            self.finish_line(false);
        }
        (
            DisplayList::new(self.items, self.max_y),
            self.diagnostics.into_warnings(),
        )
    }
}
