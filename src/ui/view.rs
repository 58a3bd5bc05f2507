//! Binds [`AppState`] to the FLTK widgets and dispatches menu messages.

use fltk::{
    app::Sender,
    prelude::*,
    text::{TextBuffer, WrapMode},
};
use tracing::debug;

use super::dialogs::about::show_about_dialog;
use super::dialogs::template_picker::show_template_picker;
use super::file_dialogs::{HTML_FILTER, IMAGE_FILTER, MARKDOWN_FILTER, native_dir_dialog, native_open_dialog, native_save_dialog};
use super::main_window::{APP_TITLE, MainWidgets};
use super::menu::{build_menu, set_menu_checkbox};
use super::prompter::FltkPrompter;
use crate::app::controllers::reconcile::ExitOutcome;
use crate::app::domain::messages::Message;
use crate::app::domain::prompt::Prompter;
use crate::app::domain::settings::AppSettings;
use crate::app::services::session::{JsonFileStore, WindowGeometry};
use crate::app::services::text_ops::TextEdit;
use crate::app::state::AppState;

pub struct MainView {
    pub state: AppState,
    widgets: MainWidgets,
    buffer: TextBuffer,
    prompter: FltkPrompter,
    store: JsonFileStore,
}

impl MainView {
    pub fn new(
        mut widgets: MainWidgets,
        state: AppState,
        settings: &AppSettings,
        store: JsonFileStore,
        sender: &Sender<Message>,
    ) -> Self {
        build_menu(&mut widgets.menu, sender, state.layout);

        let editor = &mut widgets.text_editor;
        editor.set_text_size(settings.font_size as i32);
        editor.set_linenumber_width(if settings.line_numbers_enabled { 40 } else { 0 });
        if settings.word_wrap_enabled {
            editor.wrap_mode(WrapMode::AtBounds, 0);
        }

        if let Some(g) = state.geometry {
            widgets.wind.resize(g.x, g.y, g.width, g.height);
        }
        widgets.file_tree.show_dir(state.working_dir());

        let buffer = widgets.text_editor.buffer().unwrap_or_default();
        let mut view = Self {
            state,
            widgets,
            buffer,
            prompter: FltkPrompter,
            store,
        };
        view.apply_layout();
        view.bind_active_buffer();
        view
    }

    pub fn show(&mut self) {
        self.widgets.wind.show();
    }

    /// Handle one message. Returns true when the application should quit.
    pub fn handle(&mut self, msg: Message) -> bool {
        debug!(?msg, "dispatch");
        match msg {
            Message::BufferEdited => self.buffer_edited(),

            Message::FileNew => {
                self.remember_cursor();
                self.state.new_document();
                self.bind_active_buffer();
            }
            Message::FileNewFromTemplate => self.new_from_template(),
            Message::FileOpen => {
                if let Some(path) = native_open_dialog(self.state.working_dir(), MARKDOWN_FILTER) {
                    self.open(path);
                }
            }
            Message::OpenPath(path) => self.open(path),
            Message::OpenProject => {
                if let Some(dir) = native_dir_dialog(self.state.working_dir()) {
                    match self.state.change_working_directory(dir) {
                        Ok(()) => self.widgets.file_tree.show_dir(self.state.working_dir()),
                        Err(e) => self.prompter.report_error(&e.to_string()),
                    }
                }
            }
            Message::BrowseDirectory(dir) => self.widgets.file_tree.show_dir(&dir),
            Message::FilesDropped(paths) => {
                self.remember_cursor();
                if self.state.handle_drop(paths, &mut self.prompter) {
                    self.widgets.file_tree.show_dir(self.state.working_dir());
                }
                self.bind_active_buffer();
            }
            Message::FileSave => {
                self.remember_cursor();
                self.state.save_active(&mut self.prompter);
                self.after_save();
            }
            Message::FileSaveAs => {
                self.remember_cursor();
                self.state.save_active_as(&mut self.prompter);
                self.after_save();
            }
            Message::ExportHtml => self.export_html(),
            Message::FileQuit | Message::WindowClose => return self.quit(),

            Message::TabSelect(id) => {
                self.remember_cursor();
                self.state.switch_to(id);
                self.bind_active_buffer();
            }
            Message::TabClose(id) => {
                self.remember_cursor();
                self.state.close_document(id, &mut self.prompter);
                self.bind_active_buffer();
            }
            Message::TabCloseActive => {
                self.remember_cursor();
                self.state.close_active(&mut self.prompter);
                self.bind_active_buffer();
            }
            Message::TabNext => {
                self.remember_cursor();
                self.state.switch_to_next_tab();
                self.bind_active_buffer();
            }
            Message::TabPrevious => {
                self.remember_cursor();
                self.state.switch_to_previous_tab();
                self.bind_active_buffer();
            }

            Message::EditCut => self.widgets.text_editor.cut(),
            Message::EditCopy => self.widgets.text_editor.copy(),
            Message::EditPaste => self.widgets.text_editor.paste(),

            Message::Format(action) => {
                let selection = self.selection();
                let edit = self.state.format_active(selection, action);
                self.apply_edit(edit);
            }
            Message::InsertListItem => {
                let cursor = self.widgets.text_editor.insert_position().max(0) as usize;
                let edit = self.state.insert_list_item(cursor);
                self.apply_edit(edit);
            }
            Message::InsertImage => {
                if let Some(image) = native_open_dialog(self.state.working_dir(), IMAGE_FILTER) {
                    let cursor = self.widgets.text_editor.insert_position().max(0) as usize;
                    let edit = self.state.insert_image(cursor, &image, &mut self.prompter);
                    self.apply_edit(edit);
                }
            }

            Message::TogglePreview => {
                let visible = self.state.toggle_preview();
                set_menu_checkbox(&self.widgets.menu, "View/Preview", visible);
                self.apply_layout();
                self.show_preview();
            }
            Message::ToggleEditor => {
                let visible = self.state.toggle_editor();
                set_menu_checkbox(&self.widgets.menu, "View/Editor", visible);
                self.apply_layout();
            }
            Message::ShowAbout => show_about_dialog(),
        }
        false
    }

    // --- Editor binding ---

    fn remember_cursor(&mut self) {
        let pos = self.widgets.text_editor.insert_position().max(0) as usize;
        self.state.set_active_cursor(pos);
    }

    /// Load the active session into the editor and refresh everything that
    /// depends on which session is active.
    fn bind_active_buffer(&mut self) {
        if let Some(doc) = self.state.active() {
            let cursor = doc.cursor_position.min(doc.text().len());
            self.buffer.set_text(doc.text());
            self.widgets.text_editor.set_insert_position(cursor as i32);
            self.widgets.text_editor.show_insert_position();
        }
        self.show_preview();
        self.update_window_title();
        self.rebuild_tab_bar();
    }

    fn buffer_edited(&mut self) {
        let text = self.buffer.text();
        if self.state.active().is_some_and(|doc| doc.text() == text) {
            return;
        }
        let was_dirty = self.state.active().is_some_and(|doc| doc.is_dirty());
        self.state.update_active_text(text);
        self.show_preview();
        if self.state.active().is_some_and(|doc| doc.is_dirty()) != was_dirty {
            self.update_window_title();
            self.rebuild_tab_bar();
        }
    }

    fn selection(&self) -> std::ops::Range<usize> {
        match self.buffer.selection_position() {
            Some((start, end)) if start != end => start.max(0) as usize..end.max(0) as usize,
            _ => {
                let cursor = self.widgets.text_editor.insert_position().max(0) as usize;
                cursor..cursor
            }
        }
    }

    /// Mirror an edit already applied to the session into the editor buffer.
    fn apply_edit(&mut self, edit: Option<TextEdit>) {
        let Some(edit) = edit else { return };
        self.buffer.unselect();
        self.buffer.replace(edit.range.start as i32, edit.range.end as i32, &edit.replacement);
        self.widgets.text_editor.set_insert_position(edit.cursor as i32);
        self.widgets.text_editor.show_insert_position();
        self.show_preview();
        self.update_window_title();
        self.rebuild_tab_bar();
    }

    // --- Chrome ---

    fn update_window_title(&mut self) {
        let title = match self.state.active() {
            Some(doc) => format!("{} - {}", doc.title(), APP_TITLE),
            None => APP_TITLE.to_string(),
        };
        self.widgets.wind.set_label(&title);
    }

    fn rebuild_tab_bar(&mut self) {
        let active = self.state.tabs.active_id();
        self.widgets.tab_bar.rebuild(self.state.tabs.documents(), active);
    }

    fn show_preview(&mut self) {
        if self.state.layout.preview_visible {
            self.widgets.preview.set_value(self.state.preview.html());
        }
    }

    fn apply_layout(&mut self) {
        let layout = self.state.layout;
        let w = &mut self.widgets;
        if layout.editor_visible {
            w.text_editor.show();
        } else {
            w.text_editor.hide();
        }
        if layout.preview_visible {
            w.preview.show();
        } else {
            w.preview.hide();
        }
        if layout.all_hidden() {
            w.hint.show();
        } else {
            w.hint.hide();
        }
        w.body.layout();
        w.wind.redraw();
    }

    // --- File actions ---

    fn open(&mut self, path: std::path::PathBuf) {
        self.remember_cursor();
        match self.state.open_path(path) {
            Ok(_) => self.bind_active_buffer(),
            Err(e) => self.prompter.report_error(&format!("Error opening file: {}", e)),
        }
    }

    fn new_from_template(&mut self) {
        let templates = match self.state.templates() {
            Ok(templates) => templates,
            Err(e) => {
                self.prompter.report_error(&e.to_string());
                return;
            }
        };
        let Some(template) = show_template_picker(&templates) else {
            return;
        };
        self.remember_cursor();
        match self.state.new_from_template(&template) {
            Ok(_) => self.bind_active_buffer(),
            Err(e) => self.prompter.report_error(&e.to_string()),
        }
    }

    fn after_save(&mut self) {
        self.update_window_title();
        self.rebuild_tab_bar();
        let root = self.widgets.file_tree.root().to_path_buf();
        self.widgets.file_tree.show_dir(&root);
    }

    fn export_html(&mut self) {
        let suggested = self
            .state
            .active()
            .and_then(|doc| doc.path())
            .and_then(|p| p.file_stem())
            .map(|stem| format!("{}.html", stem.to_string_lossy()))
            .unwrap_or_else(|| "export.html".to_string());
        let Some(mut path) = native_save_dialog(self.state.working_dir(), &suggested, HTML_FILTER) else {
            return;
        };
        if path.extension().is_none() {
            path.set_extension("html");
        }
        if let Err(e) = self.state.export_active_html(&path) {
            self.prompter.report_error(&format!("Error exporting file: {}", e));
        }
    }

    fn quit(&mut self) -> bool {
        self.remember_cursor();
        let w = &self.widgets.wind;
        self.state.geometry = Some(WindowGeometry {
            x: w.x(),
            y: w.y(),
            width: w.w(),
            height: w.h(),
        });
        let outcome = self.state.request_exit(&mut self.prompter, &mut self.store);
        // A save-as during exit may have switched tabs.
        self.bind_active_buffer();
        outcome == ExitOutcome::Exit
    }
}
