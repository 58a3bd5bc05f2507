use std::path::{Path, PathBuf};

use crate::app::domain::document::{DiskStamp, DocumentId, DocumentSession};

/// Ordered open sessions, one of which is active.
///
/// While the window is open the registry is never empty: removing the last
/// session immediately creates a fresh untitled one.
pub struct TabRegistry {
    documents: Vec<DocumentSession>,
    active_id: Option<DocumentId>,
    next_id: u64,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistry {
    /// Empty registry; callers add the first session (see [`Self::ensure_not_empty`]).
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, doc: DocumentSession) -> DocumentId {
        let id = doc.id;
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn add_untitled(&mut self) -> DocumentId {
        let id = self.next_document_id();
        self.push(DocumentSession::new_untitled(id))
    }

    pub fn add_untitled_with_text(&mut self, text: impl Into<String>) -> DocumentId {
        let id = self.next_document_id();
        self.push(DocumentSession::new_untitled_with_text(id, text))
    }

    /// Add a session backed by `path`. Callers check [`Self::find_by_path`] first.
    pub fn add_from_file(&mut self, path: PathBuf, content: &str, stamp: Option<DiskStamp>) -> DocumentId {
        let id = self.next_document_id();
        self.push(DocumentSession::new_from_file(id, path, content, stamp))
    }

    /// Create an untitled session if there is none. Returns true if one was created.
    pub fn ensure_not_empty(&mut self) -> bool {
        if self.documents.is_empty() {
            self.add_untitled();
            true
        } else {
            false
        }
    }

    pub fn active_doc(&self) -> Option<&DocumentSession> {
        let active_id = self.active_id?;
        self.doc_by_id(active_id)
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut DocumentSession> {
        let active_id = self.active_id?;
        self.doc_by_id_mut(active_id)
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.active_id = Some(id);
        }
    }

    /// Remove a session by id and activate its nearest neighbour.
    ///
    /// Returns the removed session. If it was the last one, a new untitled
    /// session takes its place.
    pub fn remove(&mut self, id: DocumentId) -> Option<DocumentSession> {
        let idx = self.documents.iter().position(|d| d.id == id)?;
        let doc = self.documents.remove(idx);

        if self.active_id == Some(id) {
            self.active_id = if self.documents.is_empty() {
                None
            } else {
                let new_idx = idx.min(self.documents.len() - 1);
                Some(self.documents[new_idx].id)
            };
        }

        self.ensure_not_empty();
        Some(doc)
    }

    pub fn documents(&self) -> &[DocumentSession] {
        &self.documents
    }

    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|d| d.id).collect()
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    /// Find a session by exact path equality (no canonicalisation).
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.path() == Some(path))
            .map(|d| d.id)
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&DocumentSession> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut DocumentSession> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Get the next document id (for tab cycling)
    pub fn next_doc_id(&self) -> Option<DocumentId> {
        let active_id = self.active_id?;
        let idx = self.documents.iter().position(|d| d.id == active_id)?;
        let next_idx = (idx + 1) % self.documents.len();
        Some(self.documents[next_idx].id)
    }

    /// Get the previous document id (for tab cycling)
    pub fn prev_doc_id(&self) -> Option<DocumentId> {
        let active_id = self.active_id?;
        let idx = self.documents.iter().position(|d| d.id == active_id)?;
        let prev_idx = if idx == 0 {
            self.documents.len() - 1
        } else {
            idx - 1
        };
        Some(self.documents[prev_idx].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(paths: &[&str]) -> (TabRegistry, Vec<DocumentId>) {
        let mut reg = TabRegistry::new();
        let ids = paths
            .iter()
            .map(|p| reg.add_from_file(PathBuf::from(p), "", None))
            .collect();
        (reg, ids)
    }

    #[test]
    fn test_added_session_becomes_active() {
        let (reg, ids) = registry_with(&["/a.md", "/b.md"]);
        assert_eq!(reg.active_id(), Some(ids[1]));
        assert_eq!(reg.active_doc().unwrap().label(), "b.md");
    }

    #[test]
    fn test_remove_activates_nearest_neighbor() {
        let (mut reg, ids) = registry_with(&["/a.md", "/b.md", "/c.md"]);
        reg.set_active(ids[1]);
        reg.remove(ids[1]);
        assert_eq!(reg.active_id(), Some(ids[2]));

        reg.remove(ids[2]);
        assert_eq!(reg.active_id(), Some(ids[0]));
    }

    #[test]
    fn test_remove_inactive_keeps_active() {
        let (mut reg, ids) = registry_with(&["/a.md", "/b.md"]);
        reg.remove(ids[0]);
        assert_eq!(reg.active_id(), Some(ids[1]));
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn test_removing_last_session_creates_untitled() {
        let (mut reg, ids) = registry_with(&["/a.md"]);
        let removed = reg.remove(ids[0]).unwrap();
        assert_eq!(removed.id, ids[0]);

        assert_eq!(reg.count(), 1);
        let doc = reg.active_doc().unwrap();
        assert!(doc.path().is_none());
        assert_ne!(doc.id, ids[0]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (mut reg, _) = registry_with(&["/a.md"]);
        assert!(reg.remove(DocumentId(999)).is_none());
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn test_find_by_path_is_exact() {
        let (reg, ids) = registry_with(&["/p/notes.md"]);
        assert_eq!(reg.find_by_path(Path::new("/p/notes.md")), Some(ids[0]));
        assert_eq!(reg.find_by_path(Path::new("/p/sub/../notes.md")), None);
        assert_eq!(reg.find_by_path(Path::new("p/notes.md")), None);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let (mut reg, ids) = registry_with(&["/a.md", "/b.md", "/c.md"]);
        assert_eq!(reg.next_doc_id(), Some(ids[0]));
        reg.set_active(ids[0]);
        assert_eq!(reg.prev_doc_id(), Some(ids[2]));
    }

    #[test]
    fn test_ensure_not_empty() {
        let mut reg = TabRegistry::new();
        assert!(reg.ensure_not_empty());
        assert!(!reg.ensure_not_empty());
        assert_eq!(reg.count(), 1);
    }
}
