//! Font metrics backed by fontdue.

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings, LineMetrics};
use wren_common::{Component, Diagnostics};
use wren_layout::{ApproximateMetrics, FontMetrics, MetricsError, TextExtent};

use crate::LoadError;

/// Fonts tried, in order, when no font file is given.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Metrics read from a TrueType or OpenType font.
///
/// Widths are the sum of per-glyph advances from `Font::metrics`, so no
/// bitmaps are generated just to measure.
pub struct FontdueMetrics {
    font: Font,
}

impl FontdueMetrics {
    /// Wrap an already loaded font.
    #[must_use]
    pub const fn new(font: Font) -> Self {
        Self { font }
    }

    /// Parse font data.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Font`] if fontdue rejects the data.
    pub fn from_bytes(bytes: Vec<u8>, label: &str) -> Result<Self, LoadError> {
        Font::from_bytes(bytes, FontSettings::default())
            .map(Self::new)
            .map_err(|reason| LoadError::Font {
                path: label.to_string(),
                reason,
            })
    }

    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::File`] if the file cannot be read and
    /// [`LoadError::Font`] if it is not a usable font.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::File {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(bytes, &path.display().to_string())
    }

    /// Load the first usable font from the usual system locations.
    #[must_use]
    pub fn load_system() -> Option<Self> {
        FONT_SEARCH_PATHS
            .iter()
            .find_map(|path| Self::load(Path::new(path)).ok())
    }

    fn line_metrics(&self, size: u32) -> Result<LineMetrics, MetricsError> {
        if size == 0 {
            return Err(MetricsError::UnsupportedSize(size));
        }
        self.font
            .horizontal_line_metrics(size as f32)
            .ok_or(MetricsError::MissingLineMetrics(size))
    }
}

impl FontMetrics for FontdueMetrics {
    fn measure(&self, text: &str, size: u32) -> Result<TextExtent, MetricsError> {
        let line = self.line_metrics(size)?;
        let px = size as f32;
        let width: f32 = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| self.font.metrics(ch, px).advance_width)
            .sum();
        Ok(TextExtent {
            width: width.round() as i32,
            height: line.new_line_size.round() as i32,
        })
    }

    fn ascent(&self, size: u32) -> Result<i32, MetricsError> {
        Ok(self.line_metrics(size)?.ascent.round() as i32)
    }

    fn descent(&self, size: u32) -> Result<i32, MetricsError> {
        // fontdue reports descent as a negative offset from the baseline.
        Ok(self.line_metrics(size)?.descent.abs().round() as i32)
    }
}

/// Where layout gets its font metrics from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricsSource {
    /// Fixed ratios, no font file.
    Approximate,
    /// The first system font found, falling back to [`Self::Approximate`].
    #[default]
    System,
    /// A specific font file.
    File(PathBuf),
}

/// Build the metrics provider for `source`.
///
/// A missing system font is not an error; it is reported through
/// `diagnostics` and approximate metrics are used instead.
///
/// # Errors
///
/// Returns a [`LoadError`] if an explicitly requested font file cannot be
/// loaded.
pub fn resolve_metrics(
    source: &MetricsSource,
    diagnostics: &mut Diagnostics,
) -> Result<Box<dyn FontMetrics>, LoadError> {
    match source {
        MetricsSource::Approximate => Ok(Box::new(ApproximateMetrics)),
        MetricsSource::System => match FontdueMetrics::load_system() {
            Some(metrics) => Ok(Box::new(metrics)),
            None => {
                diagnostics.warn(
                    Component::Browser,
                    "no system font found; using approximate metrics",
                );
                Ok(Box::new(ApproximateMetrics))
            }
        },
        MetricsSource::File(path) => Ok(Box::new(FontdueMetrics::load(path)?)),
    }
}
