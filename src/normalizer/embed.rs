use scraper::{Html, Selector};
use tracing::debug;

/// Extract the viewer URL from a stored VR embed.
///
/// Listings store the full `<iframe ...>` snippet copied from the VR
/// provider. A bare URL is returned unchanged.
pub fn embed_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if !raw.contains('<') {
        return Some(raw.to_string());
    }

    let fragment = Html::parse_fragment(raw);
    let selector = Selector::parse("iframe[src]").ok()?;
    let src = fragment
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(String::from);

    if src.is_none() {
        debug!("No iframe src in VR embed: {}", raw);
    }
    src
}
