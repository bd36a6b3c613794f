// ABOUTME: The extraction pipeline's output type: an ordered fragment list plus metadata.
// ABOUTME: Narrower than a full parser result — the core only ever promises these two things.

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// Result type alias used across the fetch/CLI boundary.
pub type Result<T> = std::result::Result<T, crate::error::ExtractError>;

/// Output of one extraction run: a finite ordered list of sanitized HTML fragments plus
/// the metadata record. Both are independent — an empty `fragments` list (no content
/// found) is a valid, successful result and metadata is still attempted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExtractResult {
    pub fragments: Vec<String>,
    pub metadata: Metadata,
}

impl ExtractResult {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn has_title(&self) -> bool {
        self.metadata.title.is_some()
    }

    pub fn has_description(&self) -> bool {
        self.metadata.description.is_some()
    }

    /// Join fragments with blank lines, matching the CLI's HTML output mode.
    pub fn joined_html(&self) -> String {
        self.fragments.join("\n\n")
    }
}
