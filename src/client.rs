// ABOUTME: The main Client struct: wires HTTP fetch to the extraction pipeline in dom/.
// ABOUTME: Provides async parse() and parse_html() methods returning an ExtractResult.

use std::net::ToSocketAddrs;

use dom_query::{Document, NodeRef, Selection};

use crate::dom::{
    recover_headings, refine_images_in, remove_paywall_duplicates, sanitize_lite,
    select_container, walk_container,
};
use crate::error::ExtractError;
use crate::formats::{linearize, sanitize_fragment};
use crate::metadata::extract_metadata;
use crate::options::{ClientBuilder, ContentType, Options};
use crate::resource::{fetch, FetchOptions};
use crate::result::{ExtractResult, Result};

/// The element the pipeline walks: `<body>`, or the document's first element if there is
/// no `body` (§8 boundary case: "Document with no body: falls back to root").
fn document_root(doc: &Document) -> Option<NodeRef> {
    let body = doc.select("body");
    if body.length() > 0 {
        body.nodes().first().cloned()
    } else {
        doc.select("*").nodes().first().cloned()
    }
}

/// Run the scorer/walker/heading-recovery/image-refinement pipeline (§4.3-4.8) over a
/// parsed document, mutating it in place, and return the emitted fragment nodes in
/// document order. An empty result means "no content found" — success, not an error.
fn extract_fragment_nodes(doc: &Document) -> Vec<NodeRef> {
    sanitize_lite(doc);
    remove_paywall_duplicates(doc);

    let Some(body) = document_root(doc) else {
        return Vec::new();
    };

    let Some(container) = select_container(&body) else {
        return Vec::new();
    };

    let walk = walk_container(&container.top, container.nesting);
    let headers = recover_headings(&body, &container.top, walk.highest_header_level);

    let fragments: Vec<NodeRef> = headers.into_iter().chain(walk.fragments).collect();
    for fragment in &fragments {
        refine_images_in(fragment);
    }
    fragments
}

/// Run the full pipeline plus metadata extraction (§4.9-4.11), rendering each fragment
/// according to `content_type`.
pub fn extract(doc: &Document, content_type: ContentType) -> ExtractResult {
    let fragment_nodes = extract_fragment_nodes(doc);

    let fragments = match content_type {
        ContentType::Html => fragment_nodes
            .iter()
            .map(|n| sanitize_fragment(&Selection::from(n.clone()).html().to_string()))
            .collect(),
        ContentType::Text => fragment_nodes.iter().map(linearize).collect(),
    };

    ExtractResult {
        fragments,
        metadata: extract_metadata(doc),
    }
}

/// The main client for extracting article content from URLs or raw HTML.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            let allow_private = opts.allow_private_networks;
            let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
                let next = attempt.url().clone();
                if !allow_private {
                    if let Some(host) = next.host_str() {
                        let scheme = next.scheme();
                        let port = next
                            .port()
                            .unwrap_or(if scheme == "https" { 443 } else { 80 });
                        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
                            if crate::resource::is_private_ip(&ip) {
                                return attempt.error("redirect to private IP blocked");
                            }
                        } else {
                            let addr_str = format!("{}:{}", host, port);
                            match addr_str.to_socket_addrs() {
                                Ok(addrs) => {
                                    for sa in addrs {
                                        if crate::resource::is_private_ip(&sa.ip()) {
                                            return attempt.error("redirect to private IP blocked");
                                        }
                                    }
                                }
                                Err(_) => {
                                    return attempt.error("DNS lookup failed during redirect");
                                }
                            }
                        }
                    }
                }
                attempt.follow()
            });

            reqwest::Client::builder()
                .redirect(redirect_policy)
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http_client }
    }

    /// Fetch `url` and extract article content from the response body.
    pub async fn parse(&self, url: &str) -> Result<ExtractResult> {
        if url.is_empty() {
            return Err(ExtractError::invalid_url(url, "Parse", None));
        }
        if url::Url::parse(url).is_err() {
            return Err(ExtractError::invalid_url(
                url,
                "Parse",
                Some(anyhow::anyhow!("malformed URL")),
            ));
        }

        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
            parse_non_200: false,
        };

        let fetch_result = fetch(&self.http_client, url, &fetch_opts).await?;
        let raw_html = fetch_result.text_utf8(None)?;

        let doc = Document::from(raw_html.as_str());
        Ok(extract(&doc, self.opts.content_type))
    }

    /// Extract article content directly from an HTML string, skipping the network fetch.
    pub async fn parse_html(&self, html: &str, url: &str) -> Result<ExtractResult> {
        if html.is_empty() {
            return Err(ExtractError::invalid_url(
                url,
                "ParseHTML",
                Some(anyhow::anyhow!("empty HTML")),
            ));
        }
        if url.is_empty() {
            return Err(ExtractError::invalid_url(url, "ParseHTML", None));
        }
        if url::Url::parse(url).is_err() {
            return Err(ExtractError::invalid_url(
                url,
                "ParseHTML",
                Some(anyhow::anyhow!("malformed URL")),
            ));
        }

        let doc = Document::from(html);
        Ok(extract(&doc, self.opts.content_type))
    }
}
