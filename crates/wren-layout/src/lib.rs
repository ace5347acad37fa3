//! Inline layout for the wren renderer.
//!
//! # Architecture
//!
//! ```text
//! DomTree → TreeFlattener → [LineElement] → LayoutEngine → DisplayList
//!                                               ↑
//!                                          FontMetrics
//! ```
//!
//! Flattening is a pure function of the tree. Layout is a pure function of
//! the line elements, the [`LayoutOptions`] and the metrics provider, so a
//! resize re-runs layout from the same line elements.

mod display_list;
mod engine;
mod flattener;
mod line_element;
mod metrics;
mod style;

pub use display_list::{DisplayContent, DisplayItem, DisplayList, FontKey};
pub use engine::{HSTEP, LINE_SPACING, LayoutEngine, LayoutOptions, VSTEP, layout};
pub use flattener::{TreeFlattener, decode_entities, flatten, flatten_source, is_emoji};
pub use line_element::LineElement;
pub use metrics::{ApproximateMetrics, FontMetrics, MetricsError, TextExtent};
pub use style::{DEFAULT_FONT_SIZE, StyleState, StyleTag};
