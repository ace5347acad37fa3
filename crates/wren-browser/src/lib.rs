//! High-level page API for the wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read markup from a file or standard input
//! - **Font Metrics** - fontdue-backed measurement with a system font search
//! - **Page Pipeline** - parse, flatten and lay out a document, then re-run
//!   layout alone when the viewport changes
//!
//! ```
//! use wren_browser::{Page, RenderOptions};
//! use wren_layout::ApproximateMetrics;
//!
//! let page = Page::new(
//!     "<p>Hello <b>world</b></p>",
//!     RenderOptions::default(),
//!     Box::new(ApproximateMetrics),
//! );
//! assert_eq!(page.display_list.len(), 2);
//! ```

mod font_metrics;

pub use font_metrics::{FontdueMetrics, MetricsSource, resolve_metrics};
pub use wren_dom as dom;
pub use wren_html as html;
pub use wren_layout as layout;

use std::fs;
use std::io::{self, Read};
use std::time::{Duration, Instant};

use thiserror::Error;
use wren_common::Warning;
use wren_dom::DomTree;
use wren_html::HtmlParser;
use wren_layout::{
    DisplayList, FontMetrics, LayoutEngine, LayoutOptions, LineElement, TreeFlattener,
};

/// Path that selects standard input in [`load_document`].
pub const STDIN_PATH: &str = "-";

/// Error type for document and font loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Failed to read standard input.
    #[error("failed to read standard input: {0}")]
    Stdin(#[source] io::Error),
    /// The data is not a font fontdue can use.
    #[error("'{path}' is not a usable font: {reason}")]
    Font {
        /// Where the font data came from.
        path: String,
        /// Reason reported by fontdue.
        reason: &'static str,
    },
}

/// Read a document from `path`, or from standard input when `path` is `-`.
///
/// # Errors
///
/// Returns a [`LoadError`] if the source cannot be read or is not UTF-8.
pub fn load_document(path: &str) -> Result<String, LoadError> {
    if path == STDIN_PATH {
        let mut source = String::new();
        let _ = io::stdin()
            .read_to_string(&mut source)
            .map_err(LoadError::Stdin)?;
        return Ok(source);
    }
    fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_string(),
        source,
    })
}

/// Options for one page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Insert implicit `html`, `head` and `body` elements.
    pub implicit_tags: bool,
    /// Lay out the raw markup instead of the document it describes.
    pub view_source: bool,
    /// Viewport size and base font.
    pub layout: LayoutOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            implicit_tags: true,
            view_source: false,
            layout: LayoutOptions::default(),
        }
    }
}

/// Wall-clock time spent in each pass of the last render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTimings {
    /// Tokenizing and tree building.
    pub parse: Duration,
    /// Tree flattening.
    pub flatten: Duration,
    /// The most recent layout.
    pub layout: Duration,
}

/// A parsed and laid out document.
///
/// The tree and line elements are computed once. [`Page::resize`] only
/// repeats layout.
pub struct Page {
    /// Original markup.
    pub source: String,
    /// Parsed document tree.
    pub tree: DomTree,
    /// Flattened line elements.
    pub elements: Vec<LineElement>,
    /// Layout of `elements` at the current viewport.
    pub display_list: DisplayList,
    /// Warnings from parsing and flattening.
    pub document_issues: Vec<Warning>,
    /// Warnings from the most recent layout.
    pub layout_issues: Vec<Warning>,
    /// Per-pass timings.
    pub timings: PassTimings,
    options: RenderOptions,
    metrics: Box<dyn FontMetrics>,
}

impl Page {
    /// Parse, flatten and lay out `source`.
    #[must_use]
    pub fn new(source: &str, options: RenderOptions, metrics: Box<dyn FontMetrics>) -> Self {
        let start = Instant::now();
        let (tree, mut document_issues) = HtmlParser::new(source)
            .with_implicit_tags(options.implicit_tags)
            .run_with_issues();
        let parse = start.elapsed();

        let start = Instant::now();
        let elements = if options.view_source {
            wren_layout::flatten_source(source)
        } else {
            let (elements, issues) = TreeFlattener::new()
                .with_base_font_size(options.layout.base_font_size)
                .flatten_with_issues(&tree);
            document_issues.extend(issues);
            elements
        };
        let flatten = start.elapsed();

        let mut page = Self {
            source: source.to_string(),
            tree,
            elements,
            display_list: DisplayList::default(),
            document_issues,
            layout_issues: Vec::new(),
            timings: PassTimings {
                parse,
                flatten,
                layout: Duration::ZERO,
            },
            options,
            metrics,
        };
        page.relayout();
        page
    }

    /// Load and render the document at `path` (`-` for standard input).
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the document cannot be read.
    pub fn load(
        path: &str,
        options: RenderOptions,
        metrics: Box<dyn FontMetrics>,
    ) -> Result<Self, LoadError> {
        let source = load_document(path)?;
        Ok(Self::new(&source, options, metrics))
    }

    /// Current render options.
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    /// Change the viewport and lay the page out again.
    ///
    /// Changing only the height keeps the display list, since height does
    /// not affect line breaking.
    pub fn resize(&mut self, width: i32, height: i32) {
        let width_changed = width != self.options.layout.width;
        self.options.layout.width = width;
        self.options.layout.height = height;
        if width_changed {
            self.relayout();
        }
    }

    /// Largest useful scroll offset for the current viewport.
    #[must_use]
    pub fn max_scroll(&self) -> i32 {
        self.display_list.max_scroll(self.options.layout.height)
    }

    /// All warnings, document warnings first.
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.document_issues.iter().chain(&self.layout_issues)
    }

    fn relayout(&mut self) {
        let start = Instant::now();
        let engine = LayoutEngine::new(self.metrics.as_ref(), self.options.layout);
        let (display_list, issues) = engine.layout_with_issues(&self.elements);
        self.display_list = display_list;
        self.layout_issues = issues;
        self.timings.layout = start.elapsed();
    }
}
