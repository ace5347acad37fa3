//! Font metrics used during layout.
//!
//! The layout engine never touches font files itself. It asks a
//! [`FontMetrics`] provider for word extents and for the ascent and descent
//! of each font size it encounters.

use thiserror::Error;

/// Errors a metrics provider can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// The provider cannot produce a font at this size.
    #[error("font size {0} is not supported")]
    UnsupportedSize(u32),
    /// The font carries no horizontal line metrics.
    #[error("font at size {0} has no horizontal line metrics")]
    MissingLineMetrics(u32),
    /// Measuring a piece of text failed.
    #[error("cannot measure {text:?}: {reason}")]
    Measure {
        /// The text being measured.
        text: String,
        /// Provider specific detail.
        reason: String,
    },
}

/// Pixel size of a measured run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    /// Advance width.
    pub width: i32,
    /// Line height of the font the text was measured in.
    pub height: i32,
}

/// Font metrics interface for text measurement during layout.
///
/// Sizes are integer pixel sizes. All returned values are non-negative; in
/// particular `descent` is a magnitude below the baseline, not a signed
/// offset.
pub trait FontMetrics {
    /// Measure `text` set at `size`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot serve `size` or the text.
    fn measure(&self, text: &str, size: u32) -> Result<TextExtent, MetricsError>;

    /// Distance from the top of the line to the baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot serve `size`.
    fn ascent(&self, size: u32) -> Result<i32, MetricsError>;

    /// Distance from the baseline to the bottom of the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot serve `size`.
    fn descent(&self, size: u32) -> Result<i32, MetricsError>;
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance of Latin glyphs in a proportional font is roughly
/// 0.6× the font size, the ascender about 0.8× and the descender 0.2×.
/// Used when no font file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl ApproximateMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;
    const LINE_HEIGHT_RATIO: f32 = 1.2;

    fn check(size: u32) -> Result<f32, MetricsError> {
        if size == 0 {
            Err(MetricsError::UnsupportedSize(size))
        } else {
            Ok(size as f32)
        }
    }
}

impl FontMetrics for ApproximateMetrics {
    fn measure(&self, text: &str, size: u32) -> Result<TextExtent, MetricsError> {
        let size = Self::check(size)?;
        Ok(TextExtent {
            width: (text.chars().count() as f32 * size * Self::CHAR_WIDTH_RATIO).round() as i32,
            height: (size * Self::LINE_HEIGHT_RATIO).round() as i32,
        })
    }

    fn ascent(&self, size: u32) -> Result<i32, MetricsError> {
        Ok((Self::check(size)? * Self::ASCENT_RATIO).round() as i32)
    }

    fn descent(&self, size: u32) -> Result<i32, MetricsError> {
        Ok((Self::check(size)? * Self::DESCENT_RATIO).round() as i32)
    }
}
