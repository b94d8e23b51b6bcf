use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::WriteError;

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content was identical; the file was not touched
    Unchanged,
}

/// Outcome of writing a header/source pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOutcome {
    pub header: WriteOutcome,
    pub source: WriteOutcome,
}

impl PairOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.header == WriteOutcome::Unchanged && self.source == WriteOutcome::Unchanged
    }
}

fn is_unchanged(path: &Path, contents: &str) -> bool {
    fs::read(path)
        .map(|existing| existing == contents.as_bytes())
        .unwrap_or(false)
}

/// Write `contents` to a temp file next to `path`, ready to be persisted.
fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile, WriteError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut file = NamedTempFile::new_in(dir).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|source| WriteError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file)
}

fn persist(file: NamedTempFile, path: &Path) -> Result<(), WriteError> {
    file.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Atomically replace `path` with `contents`, skipping identical files.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<WriteOutcome, WriteError> {
    if is_unchanged(path, contents) {
        debug!(path = %path.display(), "output unchanged");
        return Ok(WriteOutcome::Unchanged);
    }
    let staged = stage(path, contents.as_bytes())?;
    persist(staged, path)?;
    Ok(WriteOutcome::Written)
}

fn restore_source(path: &Path, previous: Option<&[u8]>) {
    let restored = match previous {
        Some(contents) => stage(path, contents).and_then(|file| persist(file, path)),
        None => fs::remove_file(path).map_err(|source| WriteError::Write {
            path: path.to_path_buf(),
            source,
        }),
    };
    if let Err(e) = restored {
        warn!(
            path = %path.display(),
            error = %e,
            "failed to roll back source after header write failure"
        );
    }
}

/// Write a header/source pair, all or nothing.
///
/// Both files are staged before either is moved into place. The source is
/// renamed first; if the header rename then fails the source is put back the
/// way it was (previous contents restored, or removed if it did not exist),
/// so a run never leaves a header without its matching source.
pub fn write_pair(
    header_path: &Path,
    header_text: &str,
    source_path: &Path,
    source_text: &str,
) -> Result<PairOutcome, WriteError> {
    let header_same = is_unchanged(header_path, header_text);
    let source_same = is_unchanged(source_path, source_text);

    let header_staged = if header_same {
        None
    } else {
        Some(stage(header_path, header_text.as_bytes())?)
    };
    let source_staged = if source_same {
        None
    } else {
        Some(stage(source_path, source_text.as_bytes())?)
    };

    // Some(previous) once the new source is in place; previous is None when
    // there was no source before.
    let replaced_source = match source_staged {
        Some(file) => {
            let previous = fs::read(source_path).ok();
            persist(file, source_path)?;
            Some(previous)
        }
        None => None,
    };

    if let Some(file) = header_staged {
        if let Err(e) = persist(file, header_path) {
            if let Some(previous) = replaced_source {
                restore_source(source_path, previous.as_deref());
            }
            return Err(e);
        }
    }

    let outcome = |same: bool| {
        if same {
            WriteOutcome::Unchanged
        } else {
            WriteOutcome::Written
        }
    };
    Ok(PairOutcome {
        header: outcome(header_same),
        source: outcome(source_same),
    })
}
