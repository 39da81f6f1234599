//! Href resolution and deduplication.

use std::collections::HashSet;

use tracing::trace;
use url::Url;

/// Resolve `href` against `base` into an absolute http(s) URL.
///
/// Returns `None` for empty hrefs, join failures and any scheme other than
/// `http`/`https` (`javascript:`, `mailto:`, `tel:`, `data:` ...). The fragment
/// is dropped so in-page anchors canonicalize to their page.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}

/// Resolve every href and deduplicate by canonical string form.
///
/// Unresolvable hrefs are skipped silently. First-seen order is kept.
pub fn resolve_links<'a, I>(base: &Url, hrefs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let Some(url) = resolve_href(base, href) else {
            trace!(href, "skipping unresolvable href");
            continue;
        };

        let canonical = String::from(url);
        if seen.insert(canonical.clone()) {
            links.push(canonical);
        }
    }

    links
}
