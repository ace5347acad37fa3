//! Pipeline warnings with colored terminal output.
//!
//! Nothing in the parser, flattener or layout engine is fatal. Anomalies such
//! as a mismatched closing tag or a font size the metrics provider cannot
//! serve are recorded as [`Warning`]s in a [`Diagnostics`] sink owned by the
//! pass, then handed back to the caller together with the result.
//!
//! Reporting is a separate step ([`report`]) so the caller decides whether and
//! how loudly to surface them.

use std::collections::HashSet;
use std::fmt;

use owo_colors::OwoColorize;
use strum_macros::Display;

/// The pipeline stage a warning originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Component {
    /// Markup scanning: tags, attributes, comments, raw text.
    #[strum(serialize = "HTML Parser")]
    HtmlParser,
    /// Stack of open elements and implicit tag insertion.
    #[strum(serialize = "Tree Builder")]
    TreeBuilder,
    /// Tree to line element conversion.
    Flattener,
    /// Line breaking and font metrics.
    Layout,
    /// Document loading and the page pipeline.
    Browser,
}

/// How much the caller wants to hear about.
///
/// Threaded explicitly from the command line down to [`report`]; there is no
/// process-wide verbosity switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Print nothing.
    Quiet,
    /// Print each distinct warning once.
    #[default]
    Normal,
    /// Print each distinct warning once, a summary, and pass timings.
    Verbose,
}

/// A single recoverable anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Warning {
    /// Where the warning was raised.
    pub component: Component,
    /// Human readable description.
    pub message: String,
}

impl Warning {
    /// Create a new warning.
    #[must_use]
    pub fn new(component: Component, message: impl Into<String>) -> Self {
        Self {
            component,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[wren {}] ⚠ {}", self.component, self.message)
    }
}

/// Collects warnings for one pass over a document.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, component: Component, message: impl Into<String>) {
        self.warnings.push(Warning::new(component, message));
    }

    /// All warnings recorded so far, in the order they were raised.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of recorded warnings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Append warnings raised elsewhere (e.g. by a nested pass).
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        self.warnings.extend(warnings);
    }

    /// Consume the sink, returning the recorded warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Print warnings to stderr, each distinct warning once.
///
/// Returns the number of lines printed (not counting the verbose summary).
pub fn report(warnings: &[Warning], verbosity: Verbosity) -> usize {
    if verbosity == Verbosity::Quiet {
        return 0;
    }

    let mut seen = HashSet::new();
    let mut printed = 0;
    for warning in warnings {
        if seen.insert(warning) {
            eprintln!("{}", warning.yellow());
            printed += 1;
        }
    }

    if verbosity == Verbosity::Verbose && !warnings.is_empty() {
        eprintln!(
            "{}",
            format!("{} warning(s), {printed} distinct", warnings.len()).dimmed()
        );
    }
    printed
}
