// ABOUTME: DOM manipulation and traversal utilities for HTML content extraction.
// ABOUTME: Implements the scoring/voting/walking pipeline over a dom_query document tree.

//! DOM utilities for HTML document manipulation.
//!
//! This module provides the block scorer, container voter, content walker, heading
//! recovery, paywall-duplicate detector, image refinement, and the `.text`/`.tail` etree
//! adapter they are all specified in terms of.

pub mod categorise;
pub mod diff;
pub mod etree;
pub mod headings;
pub mod images;
pub mod paywall;
pub mod sanitize_lite;
pub mod scorer;
pub mod structural_summary;
pub mod valuate;
pub mod walker;

pub use categorise::categorise;
pub use headings::recover_headings;
pub use images::refine_images_in;
pub use paywall::remove_paywall_duplicates;
pub use sanitize_lite::sanitize_lite;
pub use scorer::{select_container, Container};
pub use valuate::{getval, sumval, valuate};
pub use walker::{walk_container, WalkResult};
