//! Common utilities for the wren pipeline.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Diagnostics** - recoverable warnings collected per pass and reported
//!   on the terminal with colored output

pub mod warning;

pub use warning::{Component, Diagnostics, Verbosity, Warning, report};
