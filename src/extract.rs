//! Marker extraction from decoded page content
//!
//! Two narrow patterns are all the engine needs: the version disclosure
//! marker that feed generators embed, and the theme path segment inside
//! stylesheet links. Targeted regexes are deliberate here; a general HTML
//! parse would be scope creep for probe-oriented detection.

use regex::Regex;
use scraper::{Html, Selector};

/// Path segment that marks a theme asset URL
const THEME_PATH_MARKER: &str = "/wp-content/themes/";

/// Extract a WordPress version from the feed generator marker.
///
/// Feeds embed `<generator>https://wordpress.org/?v=X.Y.Z</generator>`.
/// Matching is case-sensitive: the marker is machine-generated and always
/// lowercase, so lowercasing the haystack first would only invite false
/// positives. Absence is a normal outcome, not an error.
pub fn extract_version(text: &str) -> Option<String> {
    let re = Regex::new(r"wordpress\.org/\?v=([0-9.]+)").ok()?;
    re.captures(text)?.get(1).map(|m| m.as_str().to_string())
}

/// Extract the active theme slug from `<link>` hrefs in page HTML.
///
/// Walks link hrefs in document order and returns the slug from the first
/// one pointing under `/wp-content/themes/`. Theme stylesheets are enqueued
/// before plugin assets, so first match approximates the active theme.
pub fn extract_theme(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("link").ok()?;
    let re = Regex::new(r"/wp-content/themes/([A-Za-z0-9_-]+)/").ok()?;

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href")
            && href.contains(THEME_PATH_MARKER)
            && let Some(caps) = re.captures(href)
        {
            return Some(caps[1].to_string());
        }
    }

    None
}
