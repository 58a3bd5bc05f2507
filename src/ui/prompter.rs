use std::path::{Path, PathBuf};

use fltk::dialog;

use crate::app::domain::prompt::{Choice, Prompter, UnsavedPrompt};
use crate::ui::file_dialogs::{MARKDOWN_FILTER, native_save_dialog};

/// [`Prompter`] backed by FLTK's modal dialogs.
pub struct FltkPrompter;

impl Prompter for FltkPrompter {
    fn ask_unsaved(&mut self, prompt: &UnsavedPrompt) -> Choice {
        let (save, discard) = match prompt {
            UnsavedPrompt::Exit { .. } => ("Save All", "Quit Without Saving"),
            UnsavedPrompt::Missing { .. } => ("Save As...", "Discard"),
            _ => ("Save", "Discard"),
        };
        dialog::message_title(prompt.title());
        // choice2 returns None when the dialog is closed from the title bar.
        match dialog::choice2_default(&prompt.message(), save, discard, "Cancel") {
            Some(0) => Choice::Save,
            Some(1) => Choice::Discard,
            _ => Choice::Cancel,
        }
    }

    fn ask_save_path(&mut self, start_dir: &Path, suggested_name: &str) -> Option<PathBuf> {
        native_save_dialog(start_dir, suggested_name, MARKDOWN_FILTER)
    }

    fn confirm(&mut self, title: &str, question: &str) -> bool {
        dialog::message_title(title);
        dialog::choice2_default(question, "No", "Yes", "") == Some(1)
    }

    fn report_error(&mut self, message: &str) {
        dialog::alert_default(message);
    }

    fn warn(&mut self, message: &str) {
        dialog::message_default(message);
    }
}
