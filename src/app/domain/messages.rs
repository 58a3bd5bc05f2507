use std::path::PathBuf;

use super::document::DocumentId;
use crate::app::services::text_ops::FormatAction;

/// All messages that can be sent through the FLTK channel.
/// Each menu callback sends one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew,
    FileNewFromTemplate,
    FileOpen,
    OpenPath(PathBuf),
    OpenProject,
    /// Show another folder in the sidebar without changing the working directory.
    BrowseDirectory(PathBuf),
    FilesDropped(Vec<PathBuf>),
    FileSave,
    FileSaveAs,
    ExportHtml,
    FileQuit,
    WindowClose,

    // Tabs
    TabSelect(DocumentId),
    TabClose(DocumentId),
    TabCloseActive,
    TabNext,
    TabPrevious,

    // Edit
    BufferEdited,
    EditCut,
    EditCopy,
    EditPaste,

    // Format
    Format(FormatAction),
    InsertListItem,
    InsertImage,

    // View
    TogglePreview,
    ToggleEditor,

    // Help
    ShowAbout,
}
