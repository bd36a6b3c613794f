// ABOUTME: Full hardening sanitizer applied to every emitted fragment before it leaves the core.
// ABOUTME: Ported from jabrss contenttools.py's extract_content() cleaner + Cleaner() config.

const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "dl", "dt", "dd", "blockquote", "pre", "code", "img", "a", "span", "div", "figure",
    "figcaption", "table", "thead", "tbody", "tr", "td", "th", "small", "sup", "sub", "hr", "q",
    "cite",
];

fn build_policy<'a>() -> ammonia::Builder<'a> {
    let mut builder = ammonia::Builder::new();
    builder.tags(ALLOWED_TAGS.iter().copied().collect());
    builder.clean_content_tags(["script", "style", "noscript"].iter().copied().collect());

    builder.add_tag_attributes("a", &["href"]);
    builder.add_tag_attributes("img", &["src", "alt", "width", "height", "srcset", "sizes"]);
    builder.add_tag_attributes("div", &["class"]);
    builder.add_tag_attributes("span", &["class"]);
    builder.add_tag_attributes("p", &["class"]);

    builder.url_schemes(["http", "https", "mailto"].iter().copied().collect());
    builder.link_rel(None);
    builder
}

/// Run the full hardening sanitizer over one fragment's serialized HTML, per §4.9:
/// scripts/styles/forms/frames/comments/meta/link/page-structure tags are dropped, only
/// the conservative allow-list above survives, and no `rel=nofollow` is ever added.
pub fn sanitize_fragment(html: &str) -> String {
    build_policy().clean(html).to_string()
}
