//! Inline text style carried down the element tree.

use strum_macros::{Display, EnumString};

/// Font size used when nothing else is configured.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Tags that change the inline text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StyleTag {
    /// Italic.
    I,
    /// Bold.
    B,
    /// Four points larger.
    Big,
    /// Two points smaller.
    Small,
    /// Superscript: half size, top aligned.
    Sup,
}

/// Style in effect at a point of the traversal.
///
/// Superscripts keep a stack of the sizes they replaced so that nested
/// `<sup>` elements each halve the size. Leaving an element restores the
/// snapshot taken when it was entered, stack included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleState {
    /// Italic text.
    pub italic: bool,
    /// Bold text.
    pub bold: bool,
    /// Current font size in points.
    pub font_size: u32,
    sup_sizes: Vec<u32>,
}

impl Default for StyleState {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

impl StyleState {
    /// Plain style at `font_size`.
    #[must_use]
    pub const fn new(font_size: u32) -> Self {
        Self {
            italic: false,
            bold: false,
            font_size,
            sup_sizes: Vec::new(),
        }
    }

    /// True inside at least one `<sup>`.
    #[must_use]
    pub fn superscript(&self) -> bool {
        !self.sup_sizes.is_empty()
    }

    /// Number of enclosing `<sup>` elements.
    #[must_use]
    pub fn superscript_depth(&self) -> usize {
        self.sup_sizes.len()
    }

    /// Apply the effect of entering `tag`.
    ///
    /// Sizes never drop below one point.
    pub fn enter(&mut self, tag: StyleTag) {
        match tag {
            StyleTag::I => self.italic = true,
            StyleTag::B => self.bold = true,
            StyleTag::Big => self.font_size = self.font_size.saturating_add(4),
            StyleTag::Small => self.font_size = self.font_size.saturating_sub(2).max(1),
            StyleTag::Sup => {
                self.sup_sizes.push(self.font_size);
                self.font_size = (self.font_size / 2).max(1);
            }
        }
    }
}
