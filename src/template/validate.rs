use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::path::Path;

use super::marker::{Marker, TemplateKind};
use crate::error::TemplateError;

// camelCase with at least one capital: `__attribute__`, `__FILE__` and
// friends never match.
#[allow(clippy::expect_used)]
static MARKER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"__[a-z][a-z0-9]*[A-Z][A-Za-z0-9]*__").expect("marker regex should be valid")
});

/// Where a marker sits in the raw template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpan {
    pub marker: Marker,
    /// Byte range replaced on expansion (includes a trailing `;`, if any).
    pub range: Range<usize>,
}

/// A template whose markers have been checked against its kind.
#[derive(Debug, Clone)]
pub struct ValidatedTemplate {
    kind: TemplateKind,
    text: String,
    spans: Vec<MarkerSpan>,
}

impl ValidatedTemplate {
    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Marker spans in order of appearance.
    pub fn spans(&self) -> &[MarkerSpan] {
        &self.spans
    }

    pub fn contains(&self, marker: Marker) -> bool {
        self.spans.iter().any(|s| s.marker == marker)
    }
}

/// Read a template file from disk and validate it.
///
/// # Errors
///
/// Returns [`TemplateError::Io`] if the file cannot be read, or any
/// validation error from [`validate`].
pub fn load_template(path: &Path, kind: TemplateKind) -> Result<ValidatedTemplate, TemplateError> {
    let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&text, kind)
}

/// Check that `text` carries exactly the markers `kind` requires.
///
/// # Errors
///
/// - [`TemplateError::UnknownMarker`] for a marker-shaped token that is not a
///   marker of this kind (typos fail here instead of leaking into output)
/// - [`TemplateError::DuplicateMarker`] when any marker appears twice
/// - [`TemplateError::MissingMarker`] when a required marker is absent
pub fn validate(text: &str, kind: TemplateKind) -> Result<ValidatedTemplate, TemplateError> {
    let mut spans = Vec::new();

    for m in MARKER_TOKEN.find_iter(text) {
        let marker = Marker::from_token(m.as_str()).filter(|marker| kind.allows(*marker));
        let Some(marker) = marker else {
            return Err(TemplateError::UnknownMarker {
                kind,
                token: m.as_str().to_string(),
                line: line_of(text, m.start()),
            });
        };
        let mut end = m.end();
        if text[end..].starts_with(';') {
            end += 1;
        }
        spans.push(MarkerSpan {
            marker,
            range: m.start()..end,
        });
    }

    if kind.allows(Marker::PublicSection) {
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            if line.trim() == Marker::PublicSection.token() {
                let start = offset + line.find(Marker::PublicSection.token()).unwrap_or(0);
                spans.push(MarkerSpan {
                    marker: Marker::PublicSection,
                    range: start..start + Marker::PublicSection.token().len(),
                });
            }
            offset += line.len();
        }
    }

    spans.sort_by_key(|s| s.range.start);

    for marker in Marker::ALL {
        let count = spans.iter().filter(|s| s.marker == marker).count();
        if count > 1 {
            return Err(TemplateError::DuplicateMarker {
                kind,
                marker,
                count,
            });
        }
    }
    for &marker in kind.required() {
        if !spans.iter().any(|s| s.marker == marker) {
            return Err(TemplateError::MissingMarker { kind, marker });
        }
    }

    Ok(ValidatedTemplate {
        kind,
        text: text.to_string(),
        spans,
    })
}

fn line_of(text: &str, byte: usize) -> usize {
    text[..byte].matches('\n').count() + 1
}
