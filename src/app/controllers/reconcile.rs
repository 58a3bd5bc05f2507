//! Unsaved-change reconciliation for closing a tab or the whole window.
//!
//! Deciding is split in two: [`assess_close`] looks at a session (and at
//! most one stat plus one read of its backing file). [`decide_close`] maps
//! the assessment and the user's answer to an action. Neither prompts;
//! `AppState` drives the `Prompter` between the two.

use std::io::ErrorKind;

use tracing::debug;

use crate::app::domain::document::{DiskStamp, DocumentSession};
use crate::app::domain::prompt::{Choice, UnsavedPrompt};
use crate::app::services::files::{disk_stamp, read_document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAssessment {
    /// Text matches the backing file.
    Clean,
    /// Untitled with nothing but whitespace.
    Blank,
    /// Text differs from the backing file.
    Modified { externally_changed: bool },
    /// Backing file no longer exists.
    Missing,
    /// Untitled with content.
    Untitled,
}

impl CloseAssessment {
    pub fn needs_prompt(self) -> bool {
        !matches!(self, CloseAssessment::Clean | CloseAssessment::Blank)
    }

    /// The question to put to the user before closing `label`, if any.
    pub fn prompt(self, label: &str) -> Option<UnsavedPrompt> {
        match self {
            CloseAssessment::Clean | CloseAssessment::Blank => None,
            CloseAssessment::Modified { externally_changed } => Some(UnsavedPrompt::Modified {
                label: label.to_string(),
                externally_changed,
            }),
            CloseAssessment::Missing => Some(UnsavedPrompt::Missing {
                label: label.to_string(),
            }),
            CloseAssessment::Untitled => Some(UnsavedPrompt::Untitled),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    Remove,
    /// Write to the existing backing path, then remove.
    SaveThenRemove,
    /// Ask for a location, write there, then remove.
    SaveAsThenRemove,
    /// Close aborted; the session stays open untouched.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exit,
    Cancelled,
}

/// Work out whether closing `doc` could lose anything.
///
/// Uses the in-memory snapshot when the file's stamp is unchanged since the
/// last load/save, and re-reads the file only when something else wrote it.
pub fn assess_close(doc: &DocumentSession) -> CloseAssessment {
    inspect(doc).0
}

/// Like [`assess_close`], but when a re-read finds the file already holds the
/// buffer's text, the session adopts that content and stamp as its sync point.
pub fn assess_and_resync(doc: &mut DocumentSession) -> CloseAssessment {
    let (assessment, on_disk) = inspect(doc);
    if let Some((content, stamp)) = on_disk {
        debug!(label = doc.label(), "external write matches buffer, resyncing");
        doc.resync_from_disk(content, stamp);
    }
    assessment
}

/// The assessment, plus the disk content and stamp when a re-read matched the buffer.
fn inspect(doc: &DocumentSession) -> (CloseAssessment, Option<(String, Option<DiskStamp>)>) {
    let Some(path) = doc.path() else {
        let assessment = if doc.is_blank() {
            CloseAssessment::Blank
        } else {
            CloseAssessment::Untitled
        };
        return (assessment, None);
    };

    let in_memory = || {
        if doc.is_dirty() {
            CloseAssessment::Modified { externally_changed: false }
        } else {
            CloseAssessment::Clean
        }
    };

    let (assessment, on_disk) = match disk_stamp(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => (CloseAssessment::Missing, None),
        Err(_) => (in_memory(), None),
        Ok(stamp) if doc.synced().and_then(|s| s.stamp) == Some(stamp) => (in_memory(), None),
        Ok(_) => match read_document(path) {
            Ok((content, stamp)) if content == doc.text() => {
                (CloseAssessment::Clean, Some((content, stamp)))
            }
            Ok(_) => (CloseAssessment::Modified { externally_changed: true }, None),
            Err(e) if e.is_not_found() => (CloseAssessment::Missing, None),
            Err(_) => (CloseAssessment::Modified { externally_changed: true }, None),
        },
    };

    debug!(label = doc.label(), ?assessment, "assessed close");
    (assessment, on_disk)
}

/// Map an assessment plus the user's answer (if one was asked) to an action.
pub fn decide_close(assessment: CloseAssessment, choice: Option<Choice>) -> CloseAction {
    match (assessment, choice) {
        (CloseAssessment::Clean | CloseAssessment::Blank, _) => CloseAction::Remove,
        (_, None | Some(Choice::Cancel)) => CloseAction::Keep,
        (_, Some(Choice::Discard)) => CloseAction::Remove,
        (CloseAssessment::Modified { .. }, Some(Choice::Save)) => CloseAction::SaveThenRemove,
        (CloseAssessment::Missing | CloseAssessment::Untitled, Some(Choice::Save)) => {
            CloseAction::SaveAsThenRemove
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::document::DocumentId;
    use crate::app::services::files::write_document;
    use std::fs;
    use tempfile::TempDir;

    fn loaded(dir: &TempDir, name: &str, content: &str) -> DocumentSession {
        let path = dir.path().join(name);
        let stamp = write_document(&path, content).unwrap();
        DocumentSession::new_from_file(DocumentId(1), path, content, stamp)
    }

    #[test]
    fn test_untitled_assessment() {
        let mut doc = DocumentSession::new_untitled(DocumentId(1));
        assert_eq!(assess_close(&doc), CloseAssessment::Blank);
        doc.set_text("   \n");
        assert_eq!(assess_close(&doc), CloseAssessment::Blank);
        doc.set_text("draft");
        assert_eq!(assess_close(&doc), CloseAssessment::Untitled);
    }

    #[test]
    fn test_unchanged_file_is_clean() {
        let dir = TempDir::new().unwrap();
        let doc = loaded(&dir, "notes.md", "hello");
        assert_eq!(assess_close(&doc), CloseAssessment::Clean);
        assert!(!assess_close(&doc).needs_prompt());
    }

    #[test]
    fn test_edited_buffer_is_modified() {
        let dir = TempDir::new().unwrap();
        let mut doc = loaded(&dir, "notes.md", "hello");
        doc.set_text("hello world");
        assert_eq!(
            assess_close(&doc),
            CloseAssessment::Modified { externally_changed: false }
        );
    }

    #[test]
    fn test_deleted_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let doc = loaded(&dir, "notes.md", "hello");
        fs::remove_file(doc.path().unwrap()).unwrap();
        assert_eq!(assess_close(&doc), CloseAssessment::Missing);
    }

    #[test]
    fn test_external_edit_is_detected() {
        let dir = TempDir::new().unwrap();
        let doc = loaded(&dir, "notes.md", "hello");
        fs::write(doc.path().unwrap(), "hello from elsewhere").unwrap();
        assert_eq!(
            assess_close(&doc),
            CloseAssessment::Modified { externally_changed: true }
        );
    }

    #[test]
    fn test_external_edit_matching_buffer_is_clean() {
        let dir = TempDir::new().unwrap();
        let mut doc = loaded(&dir, "notes.md", "hello");
        doc.set_text("hello world");
        fs::write(doc.path().unwrap(), "hello world").unwrap();
        assert_eq!(assess_close(&doc), CloseAssessment::Clean);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_matching_external_edit_resyncs_session() {
        let dir = TempDir::new().unwrap();
        let mut doc = loaded(&dir, "notes.md", "hello");
        doc.set_text("hello world");
        fs::write(doc.path().unwrap(), "hello world").unwrap();

        assert_eq!(assess_and_resync(&mut doc), CloseAssessment::Clean);
        assert!(!doc.is_dirty());
        assert_eq!(doc.title(), "notes.md");
        assert_eq!(doc.synced().and_then(|s| s.stamp), disk_stamp(doc.path().unwrap()).ok());
        // The new stamp is now the baseline, so no further re-read is needed.
        assert_eq!(assess_and_resync(&mut doc), CloseAssessment::Clean);
    }

    #[test]
    fn test_mismatched_external_edit_does_not_resync() {
        let dir = TempDir::new().unwrap();
        let mut doc = loaded(&dir, "notes.md", "hello");
        doc.set_text("hello world");
        fs::write(doc.path().unwrap(), "something else").unwrap();

        assert_eq!(
            assess_and_resync(&mut doc),
            CloseAssessment::Modified { externally_changed: true }
        );
        assert_eq!(doc.synced().map(|s| s.content.as_str()), Some("hello"));
    }

    #[test]
    fn test_decide_close_table() {
        use CloseAction::*;
        let modified = CloseAssessment::Modified { externally_changed: false };

        assert_eq!(decide_close(CloseAssessment::Clean, None), Remove);
        assert_eq!(decide_close(CloseAssessment::Blank, None), Remove);

        assert_eq!(decide_close(modified, Some(Choice::Save)), SaveThenRemove);
        assert_eq!(decide_close(modified, Some(Choice::Discard)), Remove);
        assert_eq!(decide_close(modified, Some(Choice::Cancel)), Keep);

        for assessment in [CloseAssessment::Missing, CloseAssessment::Untitled] {
            assert_eq!(decide_close(assessment, Some(Choice::Save)), SaveAsThenRemove);
            assert_eq!(decide_close(assessment, Some(Choice::Discard)), Remove);
            assert_eq!(decide_close(assessment, Some(Choice::Cancel)), Keep);
            assert_eq!(decide_close(assessment, None), Keep);
        }
    }

    #[test]
    fn test_prompt_wording_follows_assessment() {
        assert_eq!(CloseAssessment::Clean.prompt("a.md"), None);
        assert_eq!(
            CloseAssessment::Missing.prompt("a.md"),
            Some(UnsavedPrompt::Missing { label: "a.md".to_string() })
        );
        assert_eq!(CloseAssessment::Untitled.prompt("New file"), Some(UnsavedPrompt::Untitled));
    }
}
