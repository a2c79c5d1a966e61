//! Saving packaged documents to disk
//!
//! A download happens in three steps, mirroring how a browser hands a blob
//! to the user:
//!
//! 1. the payload is staged in a temporary file (the *reference*),
//! 2. the reference is saved under the requested file name,
//! 3. the reference is released.
//!
//! The destination file only ever appears complete: bytes are copied into a
//! sibling temporary file and renamed into place.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rfd::FileDialog;
use tempfile::NamedTempFile;

use super::document::DocumentPayload;

/// File extension filter for the save dialog.
const WORD_EXTENSIONS: &[&str] = &["doc"];

/// Give up looking for a free "name (n).doc" after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// Download Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while saving a document.
#[derive(Debug)]
pub enum DownloadError {
    /// The payload could not be staged in a temporary file
    Stage(io::Error),
    /// The staged payload could not be written to its destination
    Write { path: PathBuf, source: io::Error },
    /// No destination file name could be chosen
    NoDestination(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Stage(e) => write!(f, "Failed to prepare document: {}", e),
            DownloadError::Write { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            DownloadError::NoDestination(msg) => write!(f, "No destination available: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Stage(e) => Some(e),
            DownloadError::Write { source, .. } => Some(source),
            DownloadError::NoDestination(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Downloader
// ─────────────────────────────────────────────────────────────────────────────

/// Result of asking the user's environment to save a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written to this path
    Saved(PathBuf),
    /// The user dismissed the save prompt
    Cancelled,
}

/// Hands a packaged document to the user's environment as a file.
///
/// Callers must pass every reference obtained from `create_reference` to
/// `release` exactly once, whether or not saving succeeded.
pub trait Downloader {
    /// Temporary handle to a staged payload.
    type Reference;

    fn create_reference(&mut self, payload: &DocumentPayload)
        -> Result<Self::Reference, DownloadError>;

    fn save_as(
        &mut self,
        reference: &Self::Reference,
        file_name: &str,
    ) -> Result<SaveOutcome, DownloadError>;

    fn release(&mut self, reference: Self::Reference);
}

/// Stage payload bytes in a fresh temporary file.
fn stage_payload(payload: &DocumentPayload) -> Result<NamedTempFile, DownloadError> {
    let mut file = tempfile::Builder::new()
        .prefix("mdword-")
        .suffix(".doc")
        .tempfile()
        .map_err(DownloadError::Stage)?;

    file.write_all(payload.bytes()).map_err(DownloadError::Stage)?;
    file.flush().map_err(DownloadError::Stage)?;

    debug!(
        "Staged {} bytes ({}) at {}",
        payload.len(),
        payload.mime_type(),
        file.path().display()
    );
    Ok(file)
}

/// Delete a staged payload, logging failures.
fn release_staged(reference: NamedTempFile) {
    let path = reference.path().to_path_buf();
    if let Err(e) = reference.close() {
        warn!("Failed to remove staged document {}: {}", path.display(), e);
    }
}

/// Copy the staged payload next to `dest`, then move it into place.
///
/// With `overwrite` false an existing file at `dest` is left untouched and
/// the call fails with `AlreadyExists`.
fn write_destination(
    reference: &NamedTempFile,
    dest: &Path,
    overwrite: bool,
) -> Result<(), DownloadError> {
    let write_err = |source: io::Error| DownloadError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut partial = NamedTempFile::new_in(dir).map_err(write_err)?;
    let mut staged = File::open(reference.path()).map_err(write_err)?;
    io::copy(&mut staged, &mut partial).map_err(write_err)?;
    partial.flush().map_err(write_err)?;

    let persisted = if overwrite {
        partial.persist(dest)
    } else {
        partial.persist_noclobber(dest)
    };
    // On failure the partial file is dropped along with the error
    persisted.map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Pick a path in `dir` for `file_name` that does not exist yet.
///
/// Follows browser naming: `name.doc`, then `name (1).doc`, `name (2).doc`...
pub fn unique_destination(dir: &Path, file_name: &str) -> Result<PathBuf, DownloadError> {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let (stem, extension) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    };

    for n in 1..=MAX_NAME_ATTEMPTS {
        let candidate = dir.join(format!("{} ({}){}", stem, n, extension));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(DownloadError::NoDestination(format!(
        "too many files named '{}' in {}",
        file_name,
        dir.display()
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory Downloader
// ─────────────────────────────────────────────────────────────────────────────

/// Saves straight into a directory without prompting, never replacing
/// existing files.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    directory: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Downloader for DirectoryDownloader {
    type Reference = NamedTempFile;

    fn create_reference(
        &mut self,
        payload: &DocumentPayload,
    ) -> Result<NamedTempFile, DownloadError> {
        stage_payload(payload)
    }

    fn save_as(
        &mut self,
        reference: &NamedTempFile,
        file_name: &str,
    ) -> Result<SaveOutcome, DownloadError> {
        // Another process may claim the name between the check and the rename
        let mut attempts = 0;
        loop {
            let dest = unique_destination(&self.directory, file_name)?;
            match write_destination(reference, &dest, false) {
                Ok(()) => return Ok(SaveOutcome::Saved(dest)),
                Err(DownloadError::Write { source, .. })
                    if source.kind() == io::ErrorKind::AlreadyExists && attempts < 3 =>
                {
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn release(&mut self, reference: NamedTempFile) {
        release_staged(reference);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog Downloader
// ─────────────────────────────────────────────────────────────────────────────

/// Asks where to save through the native save dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogDownloader {
    initial_dir: Option<PathBuf>,
}

impl DialogDownloader {
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self { initial_dir }
    }
}

impl Downloader for DialogDownloader {
    type Reference = NamedTempFile;

    fn create_reference(
        &mut self,
        payload: &DocumentPayload,
    ) -> Result<NamedTempFile, DownloadError> {
        stage_payload(payload)
    }

    fn save_as(
        &mut self,
        reference: &NamedTempFile,
        file_name: &str,
    ) -> Result<SaveOutcome, DownloadError> {
        let mut dialog = FileDialog::new()
            .set_title("Save Word Document")
            .add_filter("Word Documents", WORD_EXTENSIONS)
            .set_file_name(file_name);

        if let Some(dir) = &self.initial_dir {
            dialog = dialog.set_directory(dir);
        }

        match dialog.save_file() {
            Some(dest) => {
                // The dialog has already confirmed replacing an existing file
                write_destination(reference, &dest, true)?;
                Ok(SaveOutcome::Saved(dest))
            }
            None => Ok(SaveOutcome::Cancelled),
        }
    }

    fn release(&mut self, reference: NamedTempFile) {
        release_staged(reference);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn payload() -> DocumentPayload {
        DocumentPayload::word_document("<p>x</p>")
    }

    fn file_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_stage_and_release() {
        let staged = stage_payload(&payload()).unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<html><body><p>x</p></body></html>"
        );

        release_staged(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_directory_downloader_saves_payload() {
        let dir = TempDir::new().unwrap();
        let mut downloader = DirectoryDownloader::new(dir.path());

        let reference = downloader.create_reference(&payload()).unwrap();
        let outcome = downloader
            .save_as(&reference, "converted-document.doc")
            .unwrap();
        downloader.release(reference);

        let expected = dir.path().join("converted-document.doc");
        assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
        assert_eq!(
            fs::read_to_string(expected).unwrap(),
            "<html><body><p>x</p></body></html>"
        );
        assert_eq!(file_count(dir.path()), 1);
    }

    #[test]
    fn test_directory_downloader_does_not_clobber() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("converted-document.doc"), "old").unwrap();
        let mut downloader = DirectoryDownloader::new(dir.path());

        let reference = downloader.create_reference(&payload()).unwrap();
        let outcome = downloader
            .save_as(&reference, "converted-document.doc")
            .unwrap();
        downloader.release(reference);

        assert_eq!(
            outcome,
            SaveOutcome::Saved(dir.path().join("converted-document (1).doc"))
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("converted-document.doc")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_directory_downloader_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let mut downloader = DirectoryDownloader::new(&missing);

        let reference = downloader.create_reference(&payload()).unwrap();
        let result = downloader.save_as(&reference, "converted-document.doc");
        downloader.release(reference);

        assert!(matches!(result, Err(DownloadError::Write { .. })));
        assert!(!missing.exists());
        assert_eq!(file_count(dir.path()), 0);
    }

    #[test]
    fn test_unique_destination_numbering() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            unique_destination(dir.path(), "report.doc").unwrap(),
            dir.path().join("report.doc")
        );

        fs::write(dir.path().join("report.doc"), "").unwrap();
        fs::write(dir.path().join("report (1).doc"), "").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "report.doc").unwrap(),
            dir.path().join("report (2).doc")
        );
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes"), "").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "notes").unwrap(),
            dir.path().join("notes (1)")
        );
    }

    #[test]
    fn test_write_destination_overwrite() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("chosen.doc");
        fs::write(&dest, "old").unwrap();

        let staged = stage_payload(&payload()).unwrap();
        assert!(write_destination(&staged, &dest, false).is_err());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");

        write_destination(&staged, &dest, true).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "<html><body><p>x</p></body></html>"
        );
        assert_eq!(file_count(dir.path()), 1);
        release_staged(staged);
    }

    #[test]
    fn test_download_error_display() {
        let err = DownloadError::Write {
            path: PathBuf::from("/tmp/out.doc"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out.doc"));
        assert!(msg.contains("denied"));

        let err = DownloadError::NoDestination("full".to_string());
        assert!(err.to_string().contains("full"));
    }
}
