//! Parsing and validation of the link classification response.

use tracing::debug;

use brochure_shared::{BrochureError, RelevantLinks, Result};

/// Parse the model's raw classification output into [`RelevantLinks`].
///
/// The text must be a JSON object of the shape
/// `{"relevantLinks": [{"linkType": string, "link": string}, ...]}` and every
/// `link` must be an absolute http(s) URL. Any violation rejects the whole
/// response. A leading `<think>` block and a surrounding markdown code fence
/// are stripped first; nothing else is repaired.
pub fn parse_relevant_links(raw: &str) -> Result<RelevantLinks> {
    let text = strip_wrappers(raw);

    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        BrochureError::validation(format!(
            "classification response is not valid JSON: {e} (got: {})",
            text.chars().take(200).collect::<String>()
        ))
    })?;

    let links: RelevantLinks = serde_json::from_value(value).map_err(|e| {
        BrochureError::validation(format!("classification response does not match schema: {e}"))
    })?;

    links.validate()?;

    debug!(count = links.relevant_links.len(), "classification response accepted");
    Ok(links)
}

/// Drop a leading `<think>…</think>` reasoning block emitted by reasoning models.
pub(crate) fn strip_think(raw: &str) -> &str {
    let text = raw.trim();
    if text.starts_with("<think>") {
        if let Some(end) = text.find("</think>") {
            return text[end + "</think>".len()..].trim();
        }
    }
    text
}

/// Drop a leading `<think>` block and a surrounding code fence.
fn strip_wrappers(raw: &str) -> &str {
    let mut text = strip_think(raw);

    if let Some(fenced) = text.strip_prefix("```") {
        let fenced = fenced.strip_prefix("json").unwrap_or(fenced);
        if let Some(inner) = fenced.trim_end().strip_suffix("```") {
            text = inner.trim();
        }
    }

    text
}
