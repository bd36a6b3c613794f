// ABOUTME: Pre-pass sanitizer: drops ad/analytics tags by name, unwraps amp-img, prunes empty leaves.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() opening block.

use dom_query::{Document, Selection};

use super::etree;

const STRIPPED_TAGS: &[&str] = &[
    "amp-ad",
    "amp-analytics",
    "amp-consent",
    "amp-iframe",
    "amp-script",
    "amp-social-share",
    "amp-sticky-ad",
    "script",
];

/// Run the sanitizer-lite pre-pass over `doc`, operating within `body` (or the document
/// root, if there is no `body`). Mutates in place.
pub fn sanitize_lite(doc: &Document) {
    let body = doc.select("body");
    let scope: Selection = if body.length() > 0 { body } else { doc.select("*").first() };

    for tag in STRIPPED_TAGS {
        scope.select(tag).remove();
    }

    for node in scope.select("amp-img").nodes().iter().cloned().collect::<Vec<_>>() {
        Selection::from(node).rename("img");
    }

    // Repeatedly prune empty, childless, non-image leaves until a full pass removes nothing.
    loop {
        let mut removed_any = false;
        let candidates: Vec<_> = scope.select("*").nodes().iter().cloned().collect();

        for node in candidates {
            if etree::tag(&node) == "img" {
                continue;
            }
            if node.children_it(false).next().is_some() {
                continue;
            }
            let text_empty = etree::text(&node).trim().is_empty();
            let tail_empty = etree::tail(&node).trim().is_empty();
            if text_empty && tail_empty {
                etree::remove(&node);
                removed_any = true;
            }
        }

        if !removed_any {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_script_and_amp_analytics() {
        let doc = Document::from(
            "<html><body><script>alert(1)</script><amp-analytics>x</amp-analytics><p>keep</p></body></html>",
        );
        sanitize_lite(&doc);
        assert_eq!(doc.select("script").length(), 0);
        assert_eq!(doc.select("amp-analytics").length(), 0);
        assert_eq!(doc.select("p").length(), 1);
    }

    #[test]
    fn renames_amp_img_to_img() {
        let doc = Document::from(r#"<html><body><amp-img src="a.jpg"></amp-img></body></html>"#);
        sanitize_lite(&doc);
        assert_eq!(doc.select("amp-img").length(), 0);
        assert_eq!(doc.select("img").length(), 1);
    }

    #[test]
    fn prunes_empty_leaves_to_fixed_point() {
        let doc = Document::from(
            "<html><body><div><span></span></div><p>  </p><p>real text</p></body></html>",
        );
        sanitize_lite(&doc);
        // span is empty -> removed, then div becomes empty -> removed too.
        assert_eq!(doc.select("span").length(), 0);
        assert_eq!(doc.select("div").length(), 0);
        // whitespace-only p is removed
        assert_eq!(doc.select("p").length(), 1);
    }

    #[test]
    fn keeps_childless_images_even_without_text() {
        let doc = Document::from(r#"<html><body><img src="a.jpg"></body></html>"#);
        sanitize_lite(&doc);
        assert_eq!(doc.select("img").length(), 1);
    }

    #[test]
    fn falls_back_to_root_without_body() {
        let doc = Document::from("<article><script>x</script><p>content</p></article>");
        sanitize_lite(&doc);
        assert_eq!(doc.select("script").length(), 0);
        assert_eq!(doc.select("p").length(), 1);
    }
}
