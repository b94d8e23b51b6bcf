use std::collections::BTreeMap;
use tracing::debug;

use super::marker::Marker;
use super::validate::ValidatedTemplate;
use crate::error::TemplateError;

/// Replace every marker of `template` with its generated fragment.
///
/// `fragments` is an ordered marker → text mapping. The substitution is a
/// single pass over the original text: inserted fragments are never scanned
/// for markers again, so running it twice on the same inputs yields the same
/// bytes.
///
/// An optional marker present in the template without a fragment is removed.
/// A fragment for a marker the template does not contain is dropped.
///
/// # Errors
///
/// - [`TemplateError::ReplacedTwice`] when `fragments` targets a marker twice
/// - [`TemplateError::Unreplaced`] when a required marker has no fragment
pub fn expand(
    template: &ValidatedTemplate,
    fragments: &[(Marker, String)],
) -> Result<String, TemplateError> {
    let mut by_marker: BTreeMap<Marker, &str> = BTreeMap::new();
    for (marker, text) in fragments {
        if by_marker.insert(*marker, text.as_str()).is_some() {
            return Err(TemplateError::ReplacedTwice(*marker));
        }
    }

    let kind = template.kind();
    for &marker in kind.required() {
        if !by_marker.contains_key(&marker) {
            return Err(TemplateError::Unreplaced(marker));
        }
    }
    for marker in by_marker.keys() {
        if !template.contains(*marker) {
            debug!(%kind, %marker, "dropping fragment for marker absent from template");
        }
    }

    let text = template.text();
    let extra: usize = by_marker.values().map(|f| f.len()).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = 0;
    for span in template.spans() {
        out.push_str(&text[cursor..span.range.start]);
        if let Some(fragment) = by_marker.get(&span.marker) {
            out.push_str(fragment);
        }
        cursor = span.range.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}
