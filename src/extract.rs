//! HTML content and link extraction
//!
//! This module turns a fetched HTML document into:
//! - candidate text blocks (header-scoped sections, falling back to a flat
//!   paragraph list when no heading yields a section)
//! - outbound links resolved to absolute URLs
//!
//! Language filtering of the blocks happens in the traversal controller, not
//! here.

use scraper::{ElementRef, Html, Selector};
use url::Url;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Extracts candidate text blocks from an HTML document
///
/// Each heading produces one block: the heading text, a dashed underline of
/// the same length, and the text of every `<p>`, `<ul>`, and `<ol>` sibling
/// up to the next heading. Headings with no following text are skipped. If no
/// heading produces a block, every non-empty paragraph in the document is
/// returned as its own block instead.
///
/// # Arguments
///
/// * `html` - The HTML content to extract from
///
/// # Returns
///
/// An ordered list of candidate text blocks
pub fn extract_blocks(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut blocks = Vec::new();

    if let Ok(heading_selector) = Selector::parse("h1, h2, h3, h4, h5, h6") {
        for heading in document.select(&heading_selector) {
            let heading_text = element_text(&heading);
            if heading_text.is_empty() {
                continue;
            }

            let body = section_body(&heading);
            if body.is_empty() {
                continue;
            }

            let underline = "-".repeat(heading_text.chars().count());
            blocks.push(format!("{}\n{}\n{}", heading_text, underline, body.join("\n")));
        }
    }

    if blocks.is_empty() {
        // Fallback: no header-scoped sections, take the flat paragraph list
        if let Ok(p_selector) = Selector::parse("p") {
            for paragraph in document.select(&p_selector) {
                let text = element_text(&paragraph);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }
    }

    blocks
}

/// Collects the section text following a heading, up to the next heading
fn section_body(heading: &ElementRef) -> Vec<String> {
    let mut body = Vec::new();

    for sibling in heading.next_siblings() {
        let element = match ElementRef::wrap(sibling) {
            Some(element) => element,
            None => continue,
        };
        let name = element.value().name();

        if HEADING_TAGS.contains(&name) {
            break;
        }

        match name {
            "p" => {
                let text = element_text(&element);
                if !text.is_empty() {
                    body.push(text);
                }
            }
            "ul" | "ol" => {
                if let Ok(li_selector) = Selector::parse("li") {
                    let items: Vec<String> = element
                        .select(&li_selector)
                        .map(|li| element_text(&li))
                        .filter(|text| !text.is_empty())
                        .collect();
                    if !items.is_empty() {
                        body.push(items.join("\n"));
                    }
                }
            }
            _ => {}
        }
    }

    body
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts all followable links from an HTML document
///
/// Links come from `<a href>` anchors, resolved against `base_url`. Only
/// `http` and `https` results are kept; `javascript:`, `mailto:`, `tel:`,
/// `data:` and fragment-only hrefs are dropped.
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// A vector of absolute URLs found in the HTML, in document order
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
