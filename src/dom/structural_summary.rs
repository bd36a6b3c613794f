// ABOUTME: Structural summary: a linearized (label, text_length) walk used for diffing siblings.
// ABOUTME: Ported from jabrss contenttools.py's get_tree().

use dom_query::NodeRef;

use super::etree;

/// One entry of a structural summary: a `+`/`-`-prefixed tag label and a text length.
pub type SummaryEntry = (String, usize);

/// Depth-first walk producing one entry per node: a descent entry (label, 0) followed
/// eventually by that same node's final entry carrying the accumulated stripped text
/// length (own `text` plus every child's `tail`), and separate entries for each child
/// subtree in between.
pub fn structural_summary(elem: &NodeRef) -> Vec<SummaryEntry> {
    fn walk(elem: &NodeRef, depth: i64, out: &mut Vec<SummaryEntry>) {
        let prefix = if depth < 0 {
            "-".repeat((-depth) as usize)
        } else if depth > 0 {
            "+".repeat(depth as usize)
        } else {
            String::new()
        };
        let label = format!("{}{}", prefix, etree::tag(elem));
        let label_idx = out.len();
        out.push((label, 0));

        let mut text_len = etree::text(elem).trim().len();

        let mut child_depth = 0i64;
        for child in elem.children_it(false) {
            if !child.is_element() {
                continue;
            }
            text_len += etree::tail(&child).trim().len();
            walk(&child, child_depth + 1, out);
            child_depth -= 1;
        }

        out[label_idx].1 = text_len;
    }

    let mut out = Vec::new();
    walk(elem, 0, &mut out);
    out
}
