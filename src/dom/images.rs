// ABOUTME: Image refinement — collapses a responsive srcset down to one best source.
// ABOUTME: Ported from jabrss contenttools.py's clean_imgs().

use dom_query::NodeRef;

use super::categorise::categorise;
use super::etree;

const PREFERRED_MIN_WIDTH: i64 = 600;
const PREFERRED_PRECEDING_MIN_WIDTH: i64 = 300;

fn parse_srcset(srcset: &str) -> Vec<(i64, String)> {
    srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split_whitespace();
            let url = parts.next()?.to_string();
            let width = match parts.next() {
                Some(w) if w.ends_with('w') => w[..w.len() - 1].parse::<i64>().ok()?,
                _ => return None,
            };
            Some((width, url))
        })
        .collect()
}

/// Refine a single `img` element within an emitted fragment, per §4.8: clear low-scoring
/// images entirely, else collapse a `srcset` to a single best `src` within the preferred
/// width band.
pub fn refine_image(node: &NodeRef) {
    if etree::tag(node) != "img" {
        return;
    }

    if categorise(node) < 0 {
        for name in etree::attr_names(node) {
            etree::remove_attr(node, &name);
        }
        etree::clear_contents(node);
        return;
    }

    let Some(srcset) = etree::attr(node, "srcset") else {
        return;
    };

    let mut candidates = parse_srcset(&srcset);
    candidates.retain(|(w, _)| *w > 0);
    candidates.sort();

    let Some(idx) = candidates.iter().position(|(w, _)| *w >= PREFERRED_MIN_WIDTH) else {
        return;
    };

    if idx > 0 && candidates[idx - 1].0 >= PREFERRED_PRECEDING_MIN_WIDTH {
        let url = candidates[idx].1.clone();
        etree::set_attr(node, "src", &url);
        etree::remove_attr(node, "width");
        etree::remove_attr(node, "height");
        etree::remove_attr(node, "srcset");
    }
}

/// Refine every `img` descendant (and the fragment root itself, if it is one) of `fragment`.
pub fn refine_images_in(fragment: &NodeRef) {
    for node in etree::descendants_and_self(fragment) {
        refine_image(&node);
    }
}
