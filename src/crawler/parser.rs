//! Link and title extraction for fetched HTML pages

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Hrefs with these prefixes never lead to a crawlable page
const UNFOLLOWABLE_PREFIXES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Anchors (minus download links) plus the canonical link
const LINK_SELECTOR: &str = r#"a[href]:not([download]), link[rel="canonical"][href]"#;

/// What the crawler keeps from a page's markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: Option<String>,

    /// Absolute http(s) URLs in document order, each listed once
    pub links: Vec<String>,
}

/// Extracts the title and the followable links of an HTML page
///
/// Relative hrefs resolve against `page_url`, which should be the URL the
/// body was actually served from (after redirects). Fragments are dropped,
/// so `/a#x` and `/a#y` are the same link.
///
/// ```
/// use depth_crawl::crawler::parse_html;
/// use url::Url;
///
/// let page_url = Url::parse("https://example.com/docs/").unwrap();
/// let parsed = parse_html(r#"<title>Docs</title><a href="intro#top">Intro</a>"#, &page_url);
/// assert_eq!(parsed.title.as_deref(), Some("Docs"));
/// assert_eq!(parsed.links, vec!["https://example.com/docs/intro"]);
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: page_title(&document),
        links: followable_links(&document, page_url),
    }
}

fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let raw: String = document.select(&selector).next()?.text().collect();

    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

fn followable_links(document: &Html, page_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve(href, page_url))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Turns an href into an absolute crawlable URL, or `None` if it isn't one
fn resolve(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if UNFOLLOWABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let mut url = page_url.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url.into())
}
