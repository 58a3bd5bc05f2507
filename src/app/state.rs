//! Application coordinator: owns the open sessions and the working
//! directory, and runs every user-level action against them.
//!
//! Nothing here touches FLTK. Modal questions go through a [`Prompter`] and
//! cross-run state through a [`SettingsStore`], so the whole lifecycle can be
//! driven from tests.

use std::env;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::controllers::preview::{LayoutState, PreviewController};
use crate::app::controllers::reconcile::{
    CloseAction, CloseAssessment, ExitOutcome, assess_and_resync, decide_close,
};
use crate::app::controllers::tabs::TabRegistry;
use crate::app::domain::document::{DocumentId, DocumentSession};
use crate::app::domain::prompt::{Choice, Prompter, UnsavedPrompt};
use crate::app::domain::settings::AppSettings;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::files::{is_markdown_file, read_document, write_document};
use crate::app::services::session::{OpenFileEntry, PersistedState, SettingsStore, WindowGeometry};
use crate::app::services::templates::{list_templates, load_template};
use crate::app::services::text_ops::{
    FormatAction, TextEdit, apply_format, floor_char_boundary, image_link, insert_list_item,
};

/// Suggested file name when saving a session that has never been saved.
const DEFAULT_SAVE_NAME: &str = "untitled.md";

const IMAGE_OUTSIDE_WARNING: &str = "The image is outside the project folder. \
     The link will break if the project is moved.";

/// Result of a save or save-as attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The save-location prompt was dismissed.
    Cancelled,
    /// The write failed; the error was reported and the session is untouched.
    Failed,
}

pub struct AppState {
    pub tabs: TabRegistry,
    pub preview: PreviewController,
    pub layout: LayoutState,
    pub geometry: Option<WindowGeometry>,
    working_dir: PathBuf,
}

impl AppState {
    /// One empty untitled session rooted at `working_dir`.
    pub fn new(working_dir: PathBuf) -> Self {
        let mut tabs = TabRegistry::new();
        tabs.ensure_not_empty();
        Self {
            tabs,
            preview: PreviewController::new(),
            layout: LayoutState::default(),
            geometry: None,
            working_dir,
        }
    }

    /// Rebuild the previous run's sessions from `store`.
    pub fn restore(store: &dyn SettingsStore, settings: &AppSettings) -> Self {
        Self::from_persisted(store.load(), settings)
    }

    /// Recreate sessions from persisted state.
    ///
    /// Entries whose file still exists are reloaded from disk; the rest come
    /// back as untitled sessions holding the persisted text. Duplicate paths
    /// are skipped.
    pub fn from_persisted(state: PersistedState, settings: &AppSettings) -> Self {
        let working_dir = match state.current_directory {
            Some(dir) if dir.is_dir() => dir,
            Some(dir) => {
                warn!(dir = %dir.display(), "Persisted working directory is gone; using current directory");
                current_dir()
            }
            None => current_dir(),
        };

        let mut app = Self {
            tabs: TabRegistry::new(),
            preview: PreviewController::new(),
            layout: state.window_state.unwrap_or(LayoutState {
                editor_visible: true,
                preview_visible: settings.preview_enabled,
            }),
            geometry: state.geometry,
            working_dir,
        };

        for OpenFileEntry { path, content } in state.open_files {
            if app.tabs.find_by_path(&path).is_some() {
                debug!(path = %path.display(), "Skipping duplicate persisted entry");
                continue;
            }
            if path.exists() {
                match read_document(&path) {
                    Ok((text, stamp)) => {
                        app.tabs.add_from_file(path, &text, stamp);
                    }
                    Err(e) => {
                        warn!("Could not reload persisted file: {}", e);
                        app.tabs.add_untitled_with_text(content);
                    }
                }
            } else {
                info!(path = %path.display(), "Persisted file is missing; restoring its text untitled");
                app.tabs.add_untitled_with_text(content);
            }
        }

        app.tabs.ensure_not_empty();
        info!(sessions = app.tabs.count(), dir = %app.working_dir.display(), "Session restored");
        app.refresh_preview();
        app
    }

    /// State to write on shutdown: every backed session's path plus its
    /// current, possibly unsaved, text.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            current_directory: Some(self.working_dir.clone()),
            open_files: self
                .tabs
                .documents()
                .iter()
                .filter_map(|doc| {
                    doc.path().map(|path| OpenFileEntry {
                        path: path.to_path_buf(),
                        content: doc.text().to_string(),
                    })
                })
                .collect(),
            geometry: self.geometry,
            window_state: Some(self.layout),
        }
    }

    pub fn persist(&self, store: &mut dyn SettingsStore) -> Result<()> {
        store.save(&self.snapshot())
    }

    // --- Working directory ---

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn change_working_directory(&mut self, dir: PathBuf) -> Result<()> {
        if !dir.is_dir() {
            return Err(AppError::NotADirectory(dir));
        }
        info!(dir = %dir.display(), "Working directory changed");
        self.working_dir = dir;
        Ok(())
    }

    fn remember_dir_of(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.working_dir = parent.to_path_buf();
        }
    }

    // --- Sessions ---

    pub fn active(&self) -> Option<&DocumentSession> {
        self.tabs.active_doc()
    }

    pub fn new_document(&mut self) -> DocumentId {
        let id = self.tabs.add_untitled();
        self.refresh_preview();
        id
    }

    /// Markdown templates offered in the working directory.
    pub fn templates(&self) -> Result<Vec<PathBuf>> {
        list_templates(&self.working_dir)
    }

    /// New untitled session seeded with a template's text.
    pub fn new_from_template(&mut self, template: &Path) -> Result<DocumentId> {
        let text = load_template(template)?;
        let id = self.tabs.add_untitled_with_text(text);
        self.refresh_preview();
        Ok(id)
    }

    /// Open `path`, or activate the session already showing it.
    pub fn open_path(&mut self, path: PathBuf) -> Result<DocumentId> {
        if let Some(id) = self.tabs.find_by_path(&path) {
            debug!(path = %path.display(), "Already open; activating");
            self.switch_to(id);
            return Ok(id);
        }

        let (text, stamp) = read_document(&path)?;
        self.remember_dir_of(&path);
        info!(path = %path.display(), "Opened");
        let id = self.tabs.add_from_file(path, &text, stamp);
        self.refresh_preview();
        Ok(id)
    }

    pub fn switch_to(&mut self, id: DocumentId) {
        self.tabs.set_active(id);
        self.refresh_preview();
    }

    pub fn switch_to_next_tab(&mut self) {
        if let Some(id) = self.tabs.next_doc_id() {
            self.switch_to(id);
        }
    }

    pub fn switch_to_previous_tab(&mut self) {
        if let Some(id) = self.tabs.prev_doc_id() {
            self.switch_to(id);
        }
    }

    /// Handle files and folders dropped on the window.
    ///
    /// Folders ask before becoming the working directory; files are opened
    /// with the usual deduplication. Returns true if the working directory
    /// changed.
    pub fn handle_drop(&mut self, paths: Vec<PathBuf>, prompter: &mut dyn Prompter) -> bool {
        let mut dir_changed = false;
        for path in paths {
            if path.is_dir() {
                let question = format!(
                    "Do you really want to change the working directory to \"{}\"?",
                    path.display()
                );
                if prompter.confirm("Change working directory", &question) {
                    match self.change_working_directory(path) {
                        Ok(()) => dir_changed = true,
                        Err(e) => prompter.report_error(&e.to_string()),
                    }
                }
            } else if let Err(e) = self.open_path(path) {
                prompter.report_error(&e.to_string());
            }
        }
        dir_changed
    }

    // --- Editing ---

    /// Replace the active session's text with what the editor now holds.
    pub fn update_active_text(&mut self, text: impl Into<String>) {
        if let Some(doc) = self.tabs.active_doc_mut() {
            doc.set_text(text);
        }
        self.refresh_preview();
    }

    pub fn set_active_cursor(&mut self, cursor: usize) {
        if let Some(doc) = self.tabs.active_doc_mut() {
            doc.cursor_position = cursor;
        }
    }

    pub fn format_active(&mut self, selection: Range<usize>, action: FormatAction) -> Option<TextEdit> {
        let edit = apply_format(self.active()?.text(), selection, action);
        self.apply_edit(edit)
    }

    pub fn insert_list_item(&mut self, cursor: usize) -> Option<TextEdit> {
        let edit = insert_list_item(self.active()?.text(), cursor);
        self.apply_edit(edit)
    }

    /// Insert a link to `image` at `cursor`, relative to the working directory.
    pub fn insert_image(
        &mut self,
        cursor: usize,
        image: &Path,
        prompter: &mut dyn Prompter,
    ) -> Option<TextEdit> {
        let link = image_link(image, &self.working_dir);
        if link.outside_project {
            prompter.warn(IMAGE_OUTSIDE_WARNING);
        }
        let at = floor_char_boundary(self.active()?.text(), cursor);
        self.apply_edit(TextEdit::insert(at, link.markdown))
    }

    fn apply_edit(&mut self, edit: TextEdit) -> Option<TextEdit> {
        let doc = self.tabs.active_doc_mut()?;
        let mut text = doc.text().to_string();
        edit.apply(&mut text);
        doc.set_text(text);
        doc.cursor_position = edit.cursor;
        self.refresh_preview();
        Some(edit)
    }

    // --- Preview and layout ---

    pub fn refresh_preview(&mut self) {
        if !self.layout.preview_visible {
            return;
        }
        match self.tabs.active_doc() {
            Some(doc) => self.preview.refresh(doc.text()),
            None => self.preview.clear(),
        }
    }

    pub fn toggle_preview(&mut self) -> bool {
        let visible = self.layout.toggle_preview();
        self.refresh_preview();
        visible
    }

    pub fn toggle_editor(&mut self) -> bool {
        self.layout.toggle_editor()
    }

    /// Write the active session as a standalone HTML page. Leaves the
    /// session's path and dirty state alone.
    pub fn export_active_html(&mut self, path: &Path) -> Result<()> {
        let Some(doc) = self.tabs.active_doc() else {
            return Ok(());
        };
        let page = PreviewController::export_document(doc.label(), doc.text());
        write_document(path, &page)?;
        info!(path = %path.display(), "Exported HTML");
        self.remember_dir_of(path);
        Ok(())
    }

    // --- Saving ---

    /// Save to the session's backing file, asking for one if it has none.
    pub fn save_document(&mut self, id: DocumentId, prompter: &mut dyn Prompter) -> SaveOutcome {
        let Some(path) = self.tabs.doc_by_id(id).and_then(|d| d.path().map(Path::to_path_buf)) else {
            return self.save_document_as(id, prompter);
        };
        self.write_session(id, path, prompter)
    }

    /// Ask for a location and save the session there.
    pub fn save_document_as(&mut self, id: DocumentId, prompter: &mut dyn Prompter) -> SaveOutcome {
        let Some(doc) = self.tabs.doc_by_id(id) else {
            return SaveOutcome::Failed;
        };
        let suggested = if doc.path().is_some() {
            doc.label().to_string()
        } else {
            DEFAULT_SAVE_NAME.to_string()
        };

        let Some(mut path) = prompter.ask_save_path(&self.working_dir, &suggested) else {
            debug!("Save as dismissed");
            return SaveOutcome::Cancelled;
        };
        append_markdown_extension(&mut path);

        if let Some(other) = self.tabs.find_by_path(&path).filter(|other| *other != id) {
            let label = self.tabs.doc_by_id(other).map(|d| d.label()).unwrap_or_default();
            prompter.report_error(&format!(
                "\"{}\" is already open in another tab. Close it first.",
                label
            ));
            return SaveOutcome::Failed;
        }

        self.write_session(id, path, prompter)
    }

    pub fn save_active(&mut self, prompter: &mut dyn Prompter) -> SaveOutcome {
        match self.tabs.active_id() {
            Some(id) => self.save_document(id, prompter),
            None => SaveOutcome::Failed,
        }
    }

    pub fn save_active_as(&mut self, prompter: &mut dyn Prompter) -> SaveOutcome {
        match self.tabs.active_id() {
            Some(id) => self.save_document_as(id, prompter),
            None => SaveOutcome::Failed,
        }
    }

    fn write_session(&mut self, id: DocumentId, path: PathBuf, prompter: &mut dyn Prompter) -> SaveOutcome {
        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return SaveOutcome::Failed;
        };
        match write_document(&path, doc.text()) {
            Ok(stamp) => {
                info!(path = %path.display(), "Saved");
                doc.mark_synced(path.clone(), stamp);
                self.remember_dir_of(&path);
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                prompter.report_error(&format!("Error saving file: {}", e));
                SaveOutcome::Failed
            }
        }
    }

    // --- Closing ---

    /// Close one session, asking about unsaved changes first.
    ///
    /// Returns true if the session was removed. The registry is refilled
    /// with an empty session when the last one goes.
    pub fn close_document(&mut self, id: DocumentId, prompter: &mut dyn Prompter) -> bool {
        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return false;
        };
        let assessment = assess_and_resync(doc);
        let choice = assessment
            .prompt(doc.label())
            .map(|prompt| prompter.ask_unsaved(&prompt));
        let action = decide_close(assessment, choice);
        debug!(?id, ?action, "Close decided");

        let proceed = match action {
            CloseAction::Keep => false,
            CloseAction::Remove => true,
            CloseAction::SaveThenRemove => self.save_document(id, prompter) == SaveOutcome::Saved,
            CloseAction::SaveAsThenRemove => self.save_document_as(id, prompter) == SaveOutcome::Saved,
        };

        if proceed {
            self.tabs.remove(id);
            self.refresh_preview();
        }
        proceed
    }

    pub fn close_active(&mut self, prompter: &mut dyn Prompter) -> bool {
        match self.tabs.active_id() {
            Some(id) => self.close_document(id, prompter),
            None => false,
        }
    }

    /// Sessions that would lose something if the window closed now, in tab order.
    ///
    /// A session whose file was rewritten with its exact text is resynced and
    /// left out.
    pub fn pending_changes(&mut self) -> Vec<(DocumentId, CloseAssessment)> {
        let mut pending = Vec::new();
        for id in self.tabs.ids() {
            let Some(doc) = self.tabs.doc_by_id_mut(id) else {
                continue;
            };
            let assessment = assess_and_resync(doc);
            if assessment.needs_prompt() {
                pending.push((id, assessment));
            }
        }
        pending
    }

    /// Quit the application, asking once about all unsaved sessions.
    ///
    /// Save writes every pending session in tab order, asking for a location
    /// where needed; any failed or dismissed save cancels the exit. On Exit
    /// the session state is written to `store`; a store failure is logged
    /// and does not block the exit.
    pub fn request_exit(
        &mut self,
        prompter: &mut dyn Prompter,
        store: &mut dyn SettingsStore,
    ) -> ExitOutcome {
        let pending = self.pending_changes();
        if !pending.is_empty() {
            let prompt = UnsavedPrompt::Exit {
                dirty_count: pending.len(),
            };
            match prompter.ask_unsaved(&prompt) {
                Choice::Cancel => {
                    info!("Exit cancelled");
                    return ExitOutcome::Cancelled;
                }
                Choice::Discard => info!(count = pending.len(), "Exiting without saving"),
                Choice::Save => {
                    for (id, assessment) in pending {
                        let outcome = match decide_close(assessment, Some(Choice::Save)) {
                            CloseAction::SaveThenRemove => self.save_document(id, prompter),
                            CloseAction::SaveAsThenRemove => {
                                self.switch_to(id);
                                self.save_document_as(id, prompter)
                            }
                            CloseAction::Remove | CloseAction::Keep => SaveOutcome::Saved,
                        };
                        if outcome != SaveOutcome::Saved {
                            info!(?id, ?outcome, "Exit cancelled by save");
                            return ExitOutcome::Cancelled;
                        }
                    }
                }
            }
        }

        if let Err(e) = self.persist(store) {
            warn!("Could not write session state: {}", e);
        }
        ExitOutcome::Exit
    }
}

/// Give an extensionless save target a `.md` extension.
///
/// A name that is only a markdown extension (`.md`) already has an empty stem,
/// so it is left alone rather than becoming `.md.md`.
fn append_markdown_extension(path: &mut PathBuf) {
    if path.extension().is_some() {
        return;
    }
    let bare_extension = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix('.'))
        .is_some_and(|ext| is_markdown_file(Path::new(&format!("x.{ext}"))));
    if !bare_extension {
        path.set_extension("md");
    }
}

fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
