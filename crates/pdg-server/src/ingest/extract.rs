//! Zip extraction and listing
//!
//! Extraction rejects any entry whose name escapes the extraction directory.
//! Listing is eager, flat and sorted: only files directly inside the
//! extraction directory are returned, nested directories are not traversed.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors produced while unpacking an uploaded archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a valid zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive entry escapes the extraction directory: {0:?}")]
    UnsafePath(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Unpack the archive at `archive_path` into `out_dir`, creating the
/// directory if absent.
///
/// Entries whose names resolve outside `out_dir` (absolute paths, `..`
/// components) fail the whole extraction with [`ExtractError::UnsafePath`].
pub fn extract_archive(archive_path: &Path, out_dir: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    fs::create_dir_all(out_dir)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(ExtractError::UnsafePath(entry.name().to_string()));
        };
        let dest = out_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
        debug!(entry = %dest.display(), size = entry.size(), "extracted archive entry");
    }

    Ok(())
}

/// List the file names directly inside `dir`, sorted.
///
/// Subdirectories are skipped, matching the ingestion contract: only
/// top-level archive files are written into the data unit.
pub async fn list_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_archive(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join("upload.zip");
        fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn test_extract_and_list() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(
            tmp.path(),
            &build_zip(&[("b.txt", b"beta"), ("a.txt", b"alpha")]),
        );
        let out = tmp.path().join("out");

        extract_archive(&archive, &out).unwrap();

        assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(out.join("b.txt")).unwrap(), b"beta");
        assert_eq!(list_files(&out).await.unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_nested_directories_not_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(
            tmp.path(),
            &build_zip(&[("top.txt", b"top"), ("sub/inner.txt", b"inner")]),
        );
        let out = tmp.path().join("out");

        extract_archive(&archive, &out).unwrap();

        // The nested file lands on disk but is not part of the flat listing.
        assert!(out.join("sub").join("inner.txt").exists());
        assert_eq!(list_files(&out).await.unwrap(), vec!["top.txt"]);
    }

    #[test]
    fn test_traversal_entry_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), &build_zip(&[("../evil.txt", b"evil")]));
        let out = tmp.path().join("out");

        let err = extract_archive(&archive, &out).unwrap_err();
        assert!(matches!(err, ExtractError::UnsafePath(_)));
        assert!(!tmp.path().join("evil.txt").exists());
    }

    #[test]
    fn test_corrupt_archive_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = write_archive(tmp.path(), b"definitely not a zip");
        let out = tmp.path().join("out");

        let err = extract_archive(&archive, &out).unwrap_err();
        assert!(matches!(err, ExtractError::Archive(_)));
    }
}
