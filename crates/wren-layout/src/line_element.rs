//! The flattened, layout-ready form of a document.

use serde::Serialize;

use crate::style::StyleState;

/// One unit of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineElement {
    /// A whitespace-free run of text with the style it was found in.
    Word {
        /// The text, entities already decoded.
        text: String,
        /// Italic text.
        italic: bool,
        /// Bold text.
        bold: bool,
        /// Set inside `<sup>`; such words are top aligned.
        superscript: bool,
        /// Font size in points.
        font_size: u32,
    },
    /// End of the current line.
    Break {
        /// A paragraph break advances twice as far.
        paragraph: bool,
    },
    /// An emoji glyph, identified by its upper-case hex code point.
    Emoji {
        /// e.g. `1F600`.
        code: String,
    },
}

impl LineElement {
    /// A word carrying a snapshot of `style`.
    #[must_use]
    pub fn word(text: impl Into<String>, style: &StyleState) -> Self {
        Self::Word {
            text: text.into(),
            italic: style.italic,
            bold: style.bold,
            superscript: style.superscript(),
            font_size: style.font_size,
        }
    }

    /// A plain line break.
    #[must_use]
    pub const fn line_break() -> Self {
        Self::Break { paragraph: false }
    }

    /// A paragraph break.
    #[must_use]
    pub const fn paragraph_break() -> Self {
        Self::Break { paragraph: true }
    }

    /// An emoji for code point `c`.
    #[must_use]
    pub fn emoji(c: char) -> Self {
        Self::Emoji {
            code: format!("{:X}", u32::from(c)),
        }
    }
}
