// ABOUTME: Content walker — picks which descendants of the chosen container become fragments.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() walker/emit loop.

use std::collections::HashSet;

use dom_query::{NodeId, NodeRef};

use super::categorise::categorise;
use super::etree;

/// Result of walking the selected container: the emitted top-level fragments plus the
/// shallowest heading level observed (sentinel `7` if none).
pub struct WalkResult {
    pub fragments: Vec<NodeRef>,
    pub highest_header_level: i64,
}

/// Walk descendants of `top` in document order, emitting scored children per §4.6.
pub fn walk_container(top: &NodeRef, nesting: i64) -> WalkResult {
    let top_tag = etree::tag(top);
    if matches!(top_tag.as_str(), "dl" | "ol" | "ul") {
        etree::set_tail_empty(top);
        return WalkResult {
            fragments: vec![top.clone()],
            highest_header_level: 7,
        };
    }

    let mut fragments = Vec::new();
    let mut emitted: HashSet<NodeId> = HashSet::new();
    let mut highest_header_level = 7i64;
    let top_id = top.id;

    let mut stack: Vec<NodeRef> = top.children_it(false).filter(|c| c.is_element()).collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        let mut children: Vec<NodeRef> =
            node.children_it(false).filter(|c| c.is_element()).collect();
        children.reverse();
        stack.extend(children);

        let score = categorise(&node);
        if score <= 0 {
            continue;
        }

        let tag = etree::tag(&node);
        let mut towrite = false;
        if let Some(level) = heading_level(&tag) {
            towrite = true;
            highest_header_level = highest_header_level.min(level);
        }

        if already_emitted_ancestor(&node, top_id, &emitted) {
            continue;
        }

        // Climb from node toward top, decrementing a counter initialized at `nesting`; the
        // emitted element is the first one whose parent is `top`. An `img` candidate lifts
        // to its parent before the climb starts, so the img->parent edge isn't counted.
        let mut counter = nesting;
        let mut cur = if tag == "img" {
            match node.parent() {
                Some(parent) if parent.id != top_id => parent,
                _ => node.clone(),
            }
        } else {
            node.clone()
        };
        let enclosing = loop {
            match cur.parent() {
                Some(parent) if parent.id == top_id => break cur,
                Some(parent) => {
                    counter -= 1;
                    cur = parent;
                }
                None => break cur,
            }
        };

        if !towrite {
            towrite = counter > 0;
        }

        if towrite && !emitted.contains(&enclosing.id) {
            for n in etree::descendants_and_self(&enclosing) {
                emitted.insert(n.id);
            }
            etree::set_tail_empty(&enclosing);
            fragments.push(enclosing);
        }
    }

    WalkResult {
        fragments,
        highest_header_level,
    }
}

fn heading_level(tag: &str) -> Option<i64> {
    if tag.len() == 2 && tag.starts_with('h') {
        tag[1..].parse::<i64>().ok().filter(|n| (1..=7).contains(n))
    } else {
        None
    }
}

fn already_emitted_ancestor(node: &NodeRef, top_id: NodeId, emitted: &HashSet<NodeId>) -> bool {
    let mut cur = node.clone();
    loop {
        if emitted.contains(&cur.id) {
            return true;
        }
        match cur.parent() {
            Some(p) if p.id != top_id => cur = p,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn container(html: &str, selector: &str) -> NodeRef {
        let doc = Document::from(html);
        doc.select(selector).nodes().first().cloned().unwrap()
    }

    #[test]
    fn list_container_emitted_whole() {
        let top = container(
            "<ul><li><img width=\"400\" height=\"300\" src=\"a.jpg\"></li></ul>",
            "ul",
        );
        let result = walk_container(&top, 1);
        assert_eq!(result.fragments.len(), 1);
        assert_eq!(etree::tag(&result.fragments[0]), "ul");
    }

    #[test]
    fn paragraph_and_heading_both_emitted() {
        let top = container(
            "<article><h1>Hello</h1><p>World of words, many words here indeed.</p></article>",
            "article",
        );
        let result = walk_container(&top, 1);
        let tags: Vec<String> = result.fragments.iter().map(etree::tag).collect();
        assert_eq!(tags, vec!["h1", "p"]);
        assert_eq!(result.highest_header_level, 1);
    }

    #[test]
    fn non_scoring_child_is_skipped() {
        let top = container(
            "<article><span></span><p>World of words, many words here indeed.</p></article>",
            "article",
        );
        let result = walk_container(&top, 1);
        let tags: Vec<String> = result.fragments.iter().map(etree::tag).collect();
        assert_eq!(tags, vec!["p"]);
    }

    #[test]
    fn scored_img_lifts_to_parent_before_climbing() {
        // `div` itself scores 0 (not a candidate on its own), so the img's climb is what
        // decides emission. Without the img->parent lift the img->div edge is counted,
        // undercounting the climb by one and dropping the block at nesting == 1.
        let top = container(
            "<article><div><img width=\"400\" height=\"300\" src=\"a.jpg\"></div></article>",
            "article",
        );
        let result = walk_container(&top, 1);
        assert_eq!(result.fragments.len(), 1);
        assert_eq!(etree::tag(&result.fragments[0]), "div");
    }

    #[test]
    fn nested_paragraph_emits_enclosing_wrapper_once() {
        let top = container(
            "<article><div><p>World of words, many words here indeed.</p><p>Second paragraph with more words here.</p></div></article>",
            "article",
        );
        let result = walk_container(&top, 2);
        // both <p>s climb to the same enclosing <div> (parent of the p's is div, whose
        // parent is top) -> emitted once, not twice.
        assert_eq!(result.fragments.len(), 1);
        assert_eq!(etree::tag(&result.fragments[0]), "div");
    }
}
