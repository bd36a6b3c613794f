// ABOUTME: Paywall-duplicate detector: diffs amp-access-gated siblings, drops the thinner one.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() amp-access loop.

use dom_query::Document;

use super::diff::maxclines;
use super::etree;
use super::structural_summary::structural_summary;

fn average_text_len(summary: &[(String, usize)]) -> f64 {
    if summary.is_empty() {
        return 0.0;
    }
    let total: usize = summary.iter().map(|(_, len)| *len).sum();
    total as f64 / summary.len() as f64
}

/// Remove the thinner of each adjacent pair of `amp-access`-gated, same-tag siblings whose
/// structural summaries are similar enough (`maxclines >= 6`).
pub fn remove_paywall_duplicates(doc: &Document) {
    let gated: Vec<_> = doc
        .select("*[amp-access]")
        .nodes()
        .iter()
        .cloned()
        .collect();

    for elem in gated {
        let Some(prev) = etree::prev_element_sibling(&elem) else {
            continue;
        };
        if etree::tag(&prev) != etree::tag(&elem) {
            continue;
        }
        if etree::attr(&prev, "amp-access").is_none() {
            continue;
        }

        let prev_tree = structural_summary(&prev);
        let cur_tree = structural_summary(&elem);

        if maxclines(&prev_tree, &cur_tree) < 6 {
            continue;
        }

        let prev_avg = average_text_len(&prev_tree);
        let cur_avg = average_text_len(&cur_tree);

        if prev_avg > cur_avg {
            etree::remove(&elem);
        }
    }
}
