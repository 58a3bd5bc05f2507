use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::app::services::text_ops::{extract_filename, is_blank};

/// Tab label used for sessions that have never been saved.
pub const UNTITLED_LABEL: &str = "New file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// File length and modification time observed at the last load or save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl DiskStamp {
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

/// What the backing file held the last time the buffer and disk agreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPoint {
    pub content: String,
    pub stamp: Option<DiskStamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocState {
    /// Untitled and nothing but whitespace typed.
    Empty,
    Dirty,
    Clean,
}

/// One open buffer: its text, optional backing file and tab label.
///
/// The label always tracks the backing path's file name, so path and label
/// are only changed together through [`DocumentSession::mark_synced`].
#[derive(Debug, Clone)]
pub struct DocumentSession {
    pub id: DocumentId,
    pub cursor_position: usize,
    text: String,
    path: Option<PathBuf>,
    label: String,
    synced: Option<SyncPoint>,
}

impl DocumentSession {
    pub fn new_untitled(id: DocumentId) -> Self {
        Self::new_untitled_with_text(id, String::new())
    }

    pub fn new_untitled_with_text(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            cursor_position: 0,
            text: text.into(),
            path: None,
            label: UNTITLED_LABEL.to_string(),
            synced: None,
        }
    }

    pub fn new_from_file(
        id: DocumentId,
        path: PathBuf,
        content: impl Into<String>,
        stamp: Option<DiskStamp>,
    ) -> Self {
        let content = content.into();
        Self {
            id,
            cursor_position: 0,
            label: label_for(&path),
            text: content.clone(),
            path: Some(path),
            synced: Some(SyncPoint { content, stamp }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn synced(&self) -> Option<&SyncPoint> {
        self.synced.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }

    /// Dirty state from the in-memory snapshot alone; no disk access.
    pub fn state(&self) -> DocState {
        match (&self.path, &self.synced) {
            (None, _) if self.is_blank() => DocState::Empty,
            (None, _) => DocState::Dirty,
            (Some(_), Some(sync)) if sync.content == self.text => DocState::Clean,
            (Some(_), _) => DocState::Dirty,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == DocState::Dirty
    }

    /// Tab/window caption: the label with a `*` while there are unsaved changes.
    pub fn title(&self) -> String {
        if self.is_dirty() {
            format!("{}*", self.label)
        } else {
            self.label.clone()
        }
    }

    /// Record that the current text now matches `path` on disk.
    pub fn mark_synced(&mut self, path: PathBuf, stamp: Option<DiskStamp>) {
        self.label = label_for(&path);
        self.path = Some(path);
        self.synced = Some(SyncPoint {
            content: self.text.clone(),
            stamp,
        });
    }

    /// Adopt content found on disk after an external change.
    pub fn resync_from_disk(&mut self, content: String, stamp: Option<DiskStamp>) {
        self.synced = Some(SyncPoint { content, stamp });
    }
}

fn label_for(path: &Path) -> String {
    extract_filename(&path.to_string_lossy())
}
