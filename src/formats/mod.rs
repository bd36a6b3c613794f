// ABOUTME: Output format converters: the full HTML sanitizer and the plain-text linearizer.
// ABOUTME: Every emitted fragment passes through sanitizer::sanitize_fragment before leaving the core.

//! Output format conversion module.
//!
//! This module holds the two auxiliary-but-tightly-coupled pieces of the pipeline: the
//! hardening sanitizer applied to every emitted fragment, and the HTML-to-plain-text
//! linearizer used for `-t`/`--text` CLI output.

pub mod linearizer;
pub mod sanitizer;

pub use linearizer::linearize;
pub use sanitizer::sanitize_fragment;
