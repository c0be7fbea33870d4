// ZipDrop - platform/fs.rs
//
// Turning user-offered paths into candidate files, and opening payloads.
// Directories are expanded one level deep unless the walk is recursive.
// Unreadable entries become warnings; they never abort the collection.

use crate::core::model::{CandidateFile, FileSource};
use crate::util::error::{Result, ZipDropError};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Build a candidate from a single regular file on disk.
pub fn candidate_from_path(path: &Path) -> Result<CandidateFile> {
    let metadata = std::fs::metadata(path).map_err(|source| ZipDropError::Io {
        path: path.to_path_buf(),
        operation: "read metadata",
        source,
    })?;
    if !metadata.is_file() {
        return Err(ZipDropError::Io {
            path: path.to_path_buf(),
            operation: "read metadata",
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(CandidateFile::from_path(name, metadata.len(), path.to_path_buf()))
}

/// Expand `paths` into candidate files.
///
/// Files are taken as-is. Directories contribute the regular files they
/// contain, in file-name order; with `recursive` the walk descends into
/// subdirectories. Suffix filtering is left to the orchestrator so rejected
/// files are counted.
///
/// Returns the candidates and a list of human-readable warnings.
pub fn collect_candidates(paths: &[PathBuf], recursive: bool) -> (Vec<CandidateFile>, Vec<String>) {
    let mut candidates = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            let walker = WalkDir::new(path)
                .min_depth(1)
                .max_depth(max_depth)
                .follow_links(false)
                .sort_by_file_name();
            for entry in walker {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "Directory walk error");
                        warnings.push(format!("Walk error: {e}"));
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                match candidate_from_path(entry.path()) {
                    Ok(c) => candidates.push(c),
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping unreadable file");
                        warnings.push(e.to_string());
                    }
                }
            }
        } else {
            match candidate_from_path(path) {
                Ok(c) => candidates.push(c),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable path");
                    warnings.push(e.to_string());
                }
            }
        }
    }

    tracing::debug!(
        offered = paths.len(),
        candidates = candidates.len(),
        warnings = warnings.len(),
        "Collected candidates"
    );
    (candidates, warnings)
}

/// An opened payload and its length at the time it was opened.
pub struct Payload {
    pub reader: Box<dyn Read + Send>,
    pub len: u64,
}

/// Open a candidate's payload for streaming.
///
/// On-disk files are measured through the open handle, so a file that
/// changed after it was selected is sent as it is now.
pub fn open_payload(file: &CandidateFile) -> io::Result<Payload> {
    match &file.source {
        FileSource::Path(path) => {
            let handle = std::fs::File::open(path)?;
            let len = handle.metadata()?.len();
            if len != file.size {
                tracing::debug!(
                    file = %file.name,
                    selected = file.size,
                    now = len,
                    "File size changed since selection"
                );
            }
            Ok(Payload {
                reader: Box::new(handle),
                len,
            })
        }
        FileSource::Memory(bytes) => Ok(Payload {
            reader: Box::new(Cursor::new(bytes.clone())),
            len: bytes.len() as u64,
        }),
    }
}
