// ABOUTME: Block scorer and container voter — the core of the extraction pipeline.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() scoring/toplist/path-voting block.

use dom_query::NodeRef;

use super::categorise::categorise;
use super::etree;
use super::valuate::{getval, sumval, valuate, Triple, ZERO};

const SCORED_TAGS: &[&str] = &["p", "li", "dd", "dt", "figure"];

/// Find `node`'s slot in `list` by id, inserting a fresh zeroed entry at the end (i.e. in
/// first-seen order) if absent. Document-order-preserving in place of a `HashMap`, so that
/// ties in the later rank sorts break the same way every run, matching a Python dict's
/// insertion-order iteration.
fn entry_index(list: &mut Vec<(NodeRef, Triple)>, node: &NodeRef) -> usize {
    if let Some(idx) = list.iter().position(|(n, _)| n.id == node.id) {
        idx
    } else {
        list.push((node.clone(), ZERO));
        list.len() - 1
    }
}

/// Accumulate score triples per candidate parent: `p`/`li`/`dd`/`dt`/`figure` descendants
/// contribute `valuate(p)` to `p.getparent()`; positive-scoring `img`s contribute `(score, 1, 1)`
/// to their own parent. Returned in first-seen document order.
fn accumulate_scores(body: &NodeRef) -> Vec<(NodeRef, Triple)> {
    let mut topnodes: Vec<(NodeRef, Triple)> = Vec::new();

    for n in etree::descendants_and_self(body) {
        let tag = etree::tag(&n);
        if SCORED_TAGS.contains(&tag.as_str()) {
            if let Some(parent) = n.parent() {
                let val = valuate(&n);
                let idx = entry_index(&mut topnodes, &parent);
                topnodes[idx].1 = sumval(topnodes[idx].1, val);
            }
        } else if tag == "img" {
            let score = categorise(&n);
            if score > 0 {
                if let Some(parent) = n.parent() {
                    let idx = entry_index(&mut topnodes, &parent);
                    topnodes[idx].1 = sumval(topnodes[idx].1, (score, 1, 1));
                }
            }
        }
    }

    topnodes
}

/// Result of container selection: the chosen container node and the `nesting` depth that
/// the content walker should start decrementing from.
pub struct Container {
    pub top: NodeRef,
    pub nesting: i64,
}

/// Run the block scorer and container voter over `body`. Returns `None` if no candidate
/// parent accumulated any score at all (the "no content found" outcome).
pub fn select_container(body: &NodeRef) -> Option<Container> {
    let topnodes = accumulate_scores(body);
    if topnodes.is_empty() {
        return None;
    }

    let mut toplist: Vec<(NodeRef, i64)> = topnodes
        .into_iter()
        .map(|(node, triple)| (node, getval(triple)))
        .collect();
    toplist.sort_by(|a, b| b.1.cmp(&a.1));

    let (leader_node, leader_rank) = toplist[0].clone();
    let weighing: i64 = match etree::tag(&leader_node).as_str() {
        "dl" | "ol" | "ul" => 4,
        _ => 2,
    };

    let retained: Vec<(NodeRef, i64)> = toplist
        .into_iter()
        .filter(|(_, rank)| weighing * rank >= leader_rank)
        .collect();

    // Path voting: for each retained parent, climb from its grandparent upward, starting
    // `nesting` at 2. `paths` is document-order-preserving, same rationale as `topnodes` above.
    let mut paths: Vec<(NodeRef, i64, i64)> = Vec::new();
    let mut article_candidate: Option<(NodeRef, i64)> = None;
    let mut last_top_of_chain: Option<NodeRef> = None;

    for (parent_node, _) in &retained {
        // `top` after this loop is the last retained parent itself, assigned on every
        // iteration regardless of whether it has a grandparent to climb from.
        last_top_of_chain = Some(parent_node.clone());

        let Some(mut node) = parent_node.parent() else {
            continue;
        };
        let mut nesting = 2i64;

        loop {
            if etree::tag(&node) == "article" && article_candidate.is_none() {
                article_candidate = Some((node.clone(), nesting));
            }

            let idx = match paths.iter().position(|(n, _, _)| n.id == node.id) {
                Some(idx) => idx,
                None => {
                    paths.push((node.clone(), 0, 0));
                    paths.len() - 1
                }
            };
            paths[idx].1 += 1;
            paths[idx].2 = paths[idx].2.max(nesting);

            match node.parent() {
                Some(p) => {
                    node = p;
                    nesting += 1;
                }
                None => break,
            }
        }
    }

    let mut pathlist = paths;
    pathlist.sort_by_key(|(_, count, nest)| (*count, *nest));
    let maxp = pathlist.last().map(|(_, count, _)| *count).unwrap_or(0);

    // Design note: the original comparison is `4*valuate(top)[0] < valuate(article)[0]`
    // where `top` is whatever the last iterated path-voting candidate's parent chain
    // happened to be, not the scorer's leader. We preserve that behavior rather than
    // "fixing" it to reference the leader.
    let (top, nesting) = if let (Some((article, art_nesting)), Some(initial)) =
        (&article_candidate, &last_top_of_chain)
    {
        if 4 * valuate(initial).0 < valuate(article).0 {
            (article.clone(), *art_nesting)
        } else {
            choose_from_pathlist(&pathlist, maxp)?
        }
    } else {
        choose_from_pathlist(&pathlist, maxp)?
    };

    Some(Container { top, nesting })
}

fn choose_from_pathlist(
    pathlist: &[(NodeRef, i64, i64)],
    maxp: i64,
) -> Option<(NodeRef, i64)> {
    if maxp > 1 {
        let filtered: Vec<&(NodeRef, i64, i64)> = pathlist
            .iter()
            .filter(|(_, count, _)| *count >= (maxp + 1) / 2)
            .collect();
        if filtered.is_empty() {
            return None;
        }

        let (first_node, first_count, first_nesting) = filtered[0];
        let mut chosen = first_node.clone();
        let mut chosen_nesting = *first_nesting;
        let pathnr = *first_count;

        if *first_count == maxp / 2 {
            for (node, count, nesting) in &filtered[1..] {
                if *count != pathnr {
                    chosen = node.clone();
                    chosen_nesting = *nesting;
                    break;
                }
            }
        }

        Some((chosen, chosen_nesting))
    } else {
        pathlist.first().map(|(node, _, _)| (node.clone(), 1))
    }
}
