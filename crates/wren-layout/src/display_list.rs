//! Display list - positioned content ready for painting.
//!
//! Coordinates are relative to the unscrolled content origin. The painter
//! applies the scroll offset and clips to the viewport itself; the
//! [`DisplayList::visible`] and [`DisplayList::max_scroll`] helpers cover
//! the common cases.

use serde::Serialize;

/// Identifies the font a text item is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontKey {
    /// Size in points.
    pub size: u32,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

/// What to draw at a display item's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayContent {
    /// A word of text.
    Text {
        /// The word.
        text: String,
        /// Top aligned rather than baseline aligned.
        superscript: bool,
        /// Font to draw with.
        font: FontKey,
    },
    /// An emoji image, looked up by its hex code point.
    Emoji {
        /// e.g. `1F600`.
        code: String,
    },
}

/// A positioned piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Advance width.
    pub width: i32,
    /// Height of the slot the content occupies.
    pub height: i32,
    /// What to draw.
    pub content: DisplayContent,
}

impl DisplayItem {
    /// The text if this is a text item.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            DisplayContent::Text { text, .. } => Some(text),
            DisplayContent::Emoji { .. } => None,
        }
    }
}

/// The output of layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DisplayList {
    items: Vec<DisplayItem>,
    max_y: i32,
}

impl DisplayList {
    /// Create a display list from laid out items and the content height.
    #[must_use]
    pub const fn new(items: Vec<DisplayItem>, max_y: i32) -> Self {
        Self { items, max_y }
    }

    /// Items in document order.
    #[must_use]
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Height of the laid out content.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing was laid out.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Largest useful scroll offset for a viewport of `viewport_height`.
    #[must_use]
    pub fn max_scroll(&self, viewport_height: i32) -> i32 {
        (self.max_y - viewport_height).max(0)
    }

    /// Items that intersect the viewport scrolled down by `scroll`.
    pub fn visible(&self, scroll: i32, viewport_height: i32) -> impl Iterator<Item = &DisplayItem> {
        let bottom = scroll + viewport_height;
        self.items
            .iter()
            .filter(move |item| item.y < bottom && item.y + item.height > scroll)
    }
}
