// ABOUTME: Score triple arithmetic — valuate(), textlen(), getval(), sumval().
// ABOUTME: Ported from jabrss contenttools.py; combined with categorise.rs to rank containers.

use dom_query::NodeRef;

use super::categorise::categorise;
use super::etree;

/// A `(length, words, clutter)` score triple. Triples compose by component-wise addition.
pub type Triple = (i64, i64, i64);

pub const ZERO: Triple = (0, 0, 0);

/// `(chars_in_text, word_gaps)` for a text blob: sum of word lengths (whitespace excluded),
/// and `len(words) - 1` (zero if no words).
pub fn textlen(s: &str) -> (i64, i64) {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.is_empty() {
        (0, 0)
    } else {
        let chars: i64 = words.iter().map(|w| w.chars().count() as i64).sum();
        (chars, words.len() as i64 - 1)
    }
}

/// `valuate(p)`: walk `p` and every descendant, summing text/tail lengths and categorise()
/// contributions. `clutter` starts at 3 unless `p` is one of the low-clutter container tags.
pub fn valuate(p: &NodeRef) -> Triple {
    let mut length = 0i64;
    let mut words = 0i64;
    let mut clutter = match etree::tag(p).as_str() {
        "p" | "article" | "div" | "span" => 0,
        _ => 3,
    };

    let p_id = p.id;
    for n in etree::descendants_and_self(p) {
        let (tl, tw) = textlen(&etree::text(&n));
        length += tl;
        words += tw;

        if n.id != p_id {
            let (tl, tw) = textlen(&etree::tail(&n));
            length += tl;
            words += tw;
        }

        let val = categorise(&n);
        if val > 0 {
            length += val;
        } else {
            clutter -= val;
        }
    }

    (length, words, clutter)
}

/// Combined score `S = 100 * length * words / (clutter + 5)`, floor-divided.
pub fn getval(v: Triple) -> i64 {
    let (length, words, clutter) = v;
    (100 * length * words).div_euclid(clutter + 5)
}

/// Component-wise addition of two score triples.
pub fn sumval(a: Triple, b: Triple) -> Triple {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;
    use pretty_assertions::assert_eq;

    fn node(html: &str, selector: &str) -> NodeRef {
        let doc = Document::from(html);
        doc.select(selector).nodes().first().cloned().unwrap()
    }

    #[test]
    fn textlen_counts_chars_and_gaps() {
        assert_eq!(textlen("hello world"), (10, 1));
        assert_eq!(textlen("one"), (3, 0));
        assert_eq!(textlen(""), (0, 0));
        assert_eq!(textlen("   "), (0, 0));
    }

    #[test]
    fn valuate_paragraph_has_zero_base_clutter() {
        let p = node("<p>World of words, many words here indeed.</p>", "p");
        let (_, _, clutter) = valuate(&p);
        // p's own categorise() contributes +20 to length (not clutter); base clutter for
        // a <p> tag itself is 0, so the only clutter contribution would come from
        // non-positive-scoring descendants, of which there are none here.
        assert_eq!(clutter, 0);
    }

    #[test]
    fn valuate_div_starts_with_clutter_three() {
        let div = node("<div>text</div>", "div");
        let (_, _, clutter) = valuate(&div);
        assert_eq!(clutter, 3);
    }

    #[test]
    fn valuate_is_monotone_under_positive_descendant() {
        let without = node("<article><p>short text here</p></article>", "article");
        let with = node(
            "<article><p>short text here</p><p>another positive paragraph block</p></article>",
            "article",
        );
        assert!(getval(valuate(&with)) >= getval(valuate(&without)));
    }

    #[test]
    fn sumval_adds_componentwise() {
        assert_eq!(sumval((1, 2, 3), (4, 5, 6)), (5, 7, 9));
    }

    #[test]
    fn getval_floor_divides() {
        assert_eq!(getval((10, 3, 0)), 100 * 10 * 3 / 5);
    }
}
