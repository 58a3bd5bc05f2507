//! Blocking document I/O. Every call opens, does one read or write, and closes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::app::domain::DiskStamp;
use crate::app::infrastructure::error::{AppError, Result};

/// Read a UTF-8 document and the stamp it had when read.
pub fn read_document(path: &Path) -> Result<(String, Option<DiskStamp>)> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read document");
    Ok((content, disk_stamp(path).ok()))
}

/// Write `text` to `path`, returning the stamp of the freshly written file.
pub fn write_document(path: &Path, text: &str) -> Result<Option<DiskStamp>> {
    fs::write(path, text).map_err(|source| {
        warn!(path = %path.display(), error = %source, "write failed");
        AppError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), bytes = text.len(), "wrote document");
    Ok(disk_stamp(path).ok())
}

pub fn disk_stamp(path: &Path) -> io::Result<DiskStamp> {
    fs::metadata(path).map(|meta| DiskStamp::from_metadata(&meta))
}

/// One entry of the file-tree sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Non-hidden entries of `dir`, directories first, then by name.
pub fn list_directory(dir: &Path) -> Result<Vec<DirEntryInfo>> {
    let entries = fs::read_dir(dir).map_err(|source| AppError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut listing: Vec<DirEntryInfo> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            Some(DirEntryInfo {
                path: entry.path(),
                name,
                is_dir,
            })
        })
        .collect();

    listing.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(listing)
}

/// True for the extensions treated as markdown notes.
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "md" | "markdown" | "mdown"))
        .unwrap_or(false)
}

/// Paths from a drag-and-drop payload: one per line, plain or `file://` URIs.
///
/// A URI whose escapes do not decode to UTF-8 is kept undecoded.
pub fn paths_from_drop(payload: &str) -> Vec<PathBuf> {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix("file://") {
            Some(uri) => match urlencoding::decode(uri) {
                Ok(decoded) => PathBuf::from(decoded.as_ref()),
                Err(e) => {
                    warn!(uri = line, error = %e, "dropped URI is not UTF-8, using it undecoded");
                    PathBuf::from(uri)
                }
            },
            None => PathBuf::from(line),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_from_drop() {
        let payload = "file:///home/me/My%20Notes/a.md\r\n/tmp/b.md\n\n";
        assert_eq!(
            paths_from_drop(payload),
            vec![
                PathBuf::from("/home/me/My Notes/a.md"),
                PathBuf::from("/tmp/b.md")
            ]
        );
    }

    #[test]
    fn test_paths_from_drop_decodes_utf8_escapes() {
        assert_eq!(
            paths_from_drop("file:///notes/caf%C3%A9.md"),
            vec![PathBuf::from("/notes/caf\u{e9}.md")]
        );
    }

    #[test]
    fn test_paths_from_drop_keeps_undecodable_uri() {
        assert_eq!(
            paths_from_drop("file:///tmp/%E9x.md"),
            vec![PathBuf::from("/tmp/%E9x.md")]
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");

        let stamp = write_document(&path, "# Fern\n").unwrap();
        let (content, read_stamp) = read_document(&path).unwrap();

        assert_eq!(content, "# Fern\n");
        assert_eq!(stamp, read_stamp);
        assert_eq!(stamp.map(|s| s.len), Some(7));
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = write_document(&dir.path().join("no/such/dir/a.md"), "x").unwrap_err();
        assert!(matches!(err, AppError::Write { .. }));
    }

    #[test]
    fn test_list_directory_orders_dirs_first_and_hides_dotfiles() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("A.md"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();

        let names: Vec<String> = list_directory(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["templates", "A.md", "b.md"]);
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("/a/notes.md")));
        assert!(is_markdown_file(Path::new("README.Markdown")));
        assert!(!is_markdown_file(Path::new("notes.txt")));
        assert!(!is_markdown_file(Path::new("md")));
    }
}
