// ABOUTME: Tag categorization scoring table — a total, pure function of tag and attributes.
// ABOUTME: Ported from jabrss contenttools.py's categorise(); see dom/valuate.rs for its use.

use dom_query::NodeRef;

use super::etree;

/// Parse a `srcset`-style candidate list into `(width_px, url)` pairs, following malformed
/// entries through rather than aborting: a candidate missing a trailing `w` descriptor is
/// treated as width 0.
fn parse_srcset(srcset: &str) -> Vec<(i64, String)> {
    srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split_whitespace();
            let url = parts.next()?.to_string();
            let width = match parts.next() {
                Some(w) if w.ends_with('w') => w[..w.len() - 1].parse::<i64>().unwrap_or(0),
                _ => 0,
            };
            Some((width, url))
        })
        .collect()
}

fn categorise_img(node: &NodeRef) -> i64 {
    let src = etree::attr(node, "src").unwrap_or_default();
    let srcset = etree::attr(node, "srcset").unwrap_or_default();

    if src.is_empty() && !srcset.is_empty() {
        let mut imgs = parse_srcset(&srcset);
        imgs.sort();
        return match imgs.last() {
            Some((w, _)) => w / 10,
            None => -3,
        };
    }

    if src.is_empty() || src.contains('?') || src.contains('&') || src.contains(';') {
        return -5;
    }

    let width = etree::attr(node, "width");
    let height = etree::attr(node, "height");
    match (width, height) {
        (Some(w), Some(h)) => match (w.parse::<i64>(), h.parse::<i64>()) {
            (Ok(w), Ok(h)) if w * h > 100 * 100 => w * h / 16,
            (Ok(_), Ok(_)) => -3,
            _ => -3,
        },
        _ => {
            let title = etree::attr(node, "title").unwrap_or_default();
            let alt = etree::attr(node, "alt").unwrap_or_default();
            4 * (title.chars().count() as i64 + alt.chars().count() as i64)
        }
    }
}

/// `categorise(node)` from the original: a pure function of tag and attributes.
pub fn categorise(node: &NodeRef) -> i64 {
    let tag = etree::tag(node);

    let mut result: i64 = match tag.as_str() {
        "img" => categorise_img(node),
        "p" => 20,
        "article" | "dd" | "dt" | "figure" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "h7"
        | "li" => 10,
        "dl" | "ol" | "table" | "ul" => 1,
        "a" => {
            if etree::attr(node, "onclick").is_some() {
                -5
            } else if etree::attr(node, "href")
                .map(|h| h.starts_with("http"))
                .unwrap_or(false)
            {
                -2
            } else {
                0
            }
        }
        "b" | "br" | "em" | "i" | "div" | "small" | "span" | "strong" | "tbody" | "td"
        | "thead" | "tr" => 0,
        "blink" | "script" => -5,
        "amp-lightbox" => -20,
        _ => -1,
    };

    match etree::attr(node, "itemprop").as_deref() {
        Some("article") | Some("articleBody") => result += 50,
        Some("text") => result += 30,
        Some("articleSection") | Some("dateCreated") | Some("headline") | Some("description")
        | Some("author") | Some("publisher") => result += 10,
        _ => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn node(html: &str, selector: &str) -> NodeRef {
        let doc = Document::from(html);
        doc.select(selector).nodes().first().cloned().unwrap()
    }

    #[test]
    fn paragraph_scores_twenty() {
        assert_eq!(categorise(&node("<p>x</p>", "p")), 20);
    }

    #[test]
    fn unknown_tag_defaults_negative_one() {
        assert_eq!(categorise(&node("<weird>x</weird>", "weird")), -1);
    }

    #[test]
    fn amp_lightbox_heavily_penalized() {
        assert_eq!(categorise(&node("<amp-lightbox>x</amp-lightbox>", "amp-lightbox")), -20);
    }

    #[test]
    fn anchor_with_onclick_penalized() {
        assert_eq!(categorise(&node(r#"<a onclick="x()">l</a>"#, "a")), -5);
    }

    #[test]
    fn anchor_external_link_mild_penalty() {
        assert_eq!(categorise(&node(r#"<a href="http://x.com">l</a>"#, "a")), -2);
    }

    #[test]
    fn anchor_relative_link_neutral() {
        assert_eq!(categorise(&node(r#"<a href="/x">l</a>"#, "a")), 0);
    }

    #[test]
    fn img_no_src_no_srcset() {
        assert_eq!(categorise(&node("<img>", "img")), -5);
    }

    #[test]
    fn img_src_with_query_string_penalized() {
        assert_eq!(categorise(&node(r#"<img src="a.jpg?x=1">"#, "img")), -5);
    }

    #[test]
    fn img_with_large_dimensions() {
        let n = node(r#"<img src="a.jpg" width="200" height="200">"#, "img");
        assert_eq!(categorise(&n), 200 * 200 / 16);
    }

    #[test]
    fn img_with_small_dimensions_penalized() {
        let n = node(r#"<img src="a.jpg" width="10" height="10">"#, "img");
        assert_eq!(categorise(&n), -3);
    }

    #[test]
    fn img_with_no_dimensions_uses_alt_and_title_length() {
        let n = node(r#"<img src="a.jpg" alt="hello" title="hi">"#, "img");
        assert_eq!(categorise(&n), 4 * (5 + 2));
    }

    #[test]
    fn img_srcset_only_picks_max_width_over_ten() {
        let n = node(
            r#"<img srcset="a.jpg 300w, b.jpg 600w, c.jpg 1200w">"#,
            "img",
        );
        assert_eq!(categorise(&n), 1200 / 10);
    }

    #[test]
    fn img_srcset_unparseable_defaults_negative_three() {
        let n = node(r#"<img srcset="">"#, "img");
        assert_eq!(categorise(&n), -3);
    }

    #[test]
    fn itemprop_article_body_adds_fifty() {
        let n = node(r#"<div itemprop="articleBody">x</div>"#, "div");
        assert_eq!(categorise(&n), 0 + 50);
    }

    #[test]
    fn itemprop_headline_adds_ten() {
        let n = node(r#"<h1 itemprop="headline">x</h1>"#, "h1");
        assert_eq!(categorise(&n), 10 + 10);
    }
}
