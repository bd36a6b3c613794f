// ABOUTME: Metadata extractor — title/description/published/modified from head meta tags.
// ABOUTME: Ported from jabrss contenttools.py's extract_meta(), supplemented per Properties.

use dom_query::Document;
use serde::{Deserialize, Serialize};

/// Metadata record: four optional string fields. Absent/empty values stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    pub modified: Option<String>,
}

fn meta_content(doc: &Document, selector: &str) -> Option<String> {
    let sel = doc.select(selector);
    let content = sel.attr("content")?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn first_of(doc: &Document, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| meta_content(doc, s))
}

/// Extract the four-field metadata record from a parsed document, per §4.11.
pub fn extract_metadata(doc: &Document) -> Metadata {
    let title = meta_content(doc, "meta[property='og:title']").or_else(|| {
        let text = doc.select("title").text();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    });

    let description = first_of(
        doc,
        &["meta[property='og:description']", "meta[name='description']"],
    );

    let published = first_of(
        doc,
        &[
            "meta[property='article:published_time']",
            "meta[name='date']",
            "meta[name='publish-date']",
        ],
    );

    let modified = first_of(
        doc,
        &[
            "meta[property='article:modified_time']",
            "meta[name='last-modified']",
        ],
    );

    Metadata {
        title,
        description,
        published,
        modified,
    }
}
