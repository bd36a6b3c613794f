// ABOUTME: Heading recovery — detaches `top`, then harvests outer/nested headings around it.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() post-walk block.

use dom_query::NodeRef;

use super::etree;

fn remove_after(elem: &NodeRef) {
    let mut node = elem.clone();
    loop {
        let Some(parent) = node.parent() else {
            break;
        };
        while let Some(next) = etree::next_element_sibling(&node) {
            etree::remove(&next);
        }
        node = parent;
    }
}

fn remove_before(elem: &NodeRef) {
    let mut node = elem.clone();
    loop {
        let Some(parent) = node.parent() else {
            break;
        };
        while let Some(prev) = etree::prev_element_sibling(&node) {
            etree::remove(&prev);
        }
        node = parent;
    }
}

/// Detach `top` from the document, then harvest headings per §4.7. Returns the heading
/// list, to be prepended to the walker's content fragments.
pub fn recover_headings(body: &NodeRef, top: &NodeRef, highest_header_level: i64) -> Vec<NodeRef> {
    remove_after(top);
    etree::remove(top);

    let mut headers: Vec<NodeRef> = Vec::new();
    let mut lowest_header: Option<i64> = None;
    let mut last_parent: Option<NodeRef> = None;

    for level in 1..highest_header_level {
        let tag = format!("h{level}");
        let last = etree::descendants_and_self(body)
            .into_iter()
            .filter(|n| etree::tag(n) == tag)
            .last();

        if let Some(elem) = last {
            etree::set_tail_empty(&elem);
            headers.push(elem.clone());
            remove_before(&elem);
            last_parent = elem.parent();
            etree::remove(&elem);
            lowest_header = Some(level);
            break;
        }
    }

    if lowest_header.is_some() {
        let rest: Vec<NodeRef> = etree::descendants_and_self(body)
            .into_iter()
            .filter(|n| matches!(etree::tag(n).as_str(), "h2" | "h3" | "h4" | "h5" | "h6"))
            .collect();

        for elem in rest {
            etree::set_tail_empty(&elem);
            headers.push(elem.clone());
            last_parent = elem.parent();
            etree::remove(&elem);
        }

        if let Some(parent) = &last_parent {
            for child in parent.children_it(false).filter(|c| c.is_element()) {
                etree::set_tail_empty(&child);
                headers.push(child);
            }
        }
    }

    headers
}
