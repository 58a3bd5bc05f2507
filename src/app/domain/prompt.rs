use std::path::{Path, PathBuf};

/// Answer to a Save/Discard/Cancel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Save,
    Discard,
    Cancel,
}

/// The situation an unsaved-changes prompt describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsavedPrompt {
    /// Buffer differs from its backing file.
    Modified { label: String, externally_changed: bool },
    /// Backing file disappeared while the tab was open.
    Missing { label: String },
    /// Never-saved buffer with content.
    Untitled,
    /// One aggregate question for the whole window on exit.
    Exit { dirty_count: usize },
}

impl UnsavedPrompt {
    pub fn title(&self) -> &'static str {
        match self {
            UnsavedPrompt::Missing { .. } => "File not found",
            _ => "Unsaved changes",
        }
    }

    pub fn message(&self) -> String {
        match self {
            UnsavedPrompt::Modified { label, externally_changed: false } => {
                format!("\"{}\" has unsaved changes. Save?", label)
            }
            UnsavedPrompt::Modified { label, externally_changed: true } => format!(
                "\"{}\" was changed on disk and differs from the editor. Save your version?",
                label
            ),
            UnsavedPrompt::Missing { label } => {
                format!("\"{}\" no longer exists. Save as?", label)
            }
            UnsavedPrompt::Untitled => "This note has unsaved changes. Save?".to_string(),
            UnsavedPrompt::Exit { dirty_count: 1 } => {
                "One note has unsaved changes. Save before quitting?".to_string()
            }
            UnsavedPrompt::Exit { dirty_count } => format!(
                "{} notes have unsaved changes. Save before quitting?",
                dirty_count
            ),
        }
    }
}

/// Modal user interaction needed by the application core.
///
/// The FLTK front-end implements this with native dialogs; tests use
/// `test_utils::ScriptedPrompter`.
pub trait Prompter {
    /// Save/Discard/Cancel question.
    fn ask_unsaved(&mut self, prompt: &UnsavedPrompt) -> Choice;

    /// Ask where to save; `None` when the user dismisses the dialog.
    fn ask_save_path(&mut self, start_dir: &Path, suggested_name: &str) -> Option<PathBuf>;

    /// Yes/no confirmation.
    fn confirm(&mut self, title: &str, question: &str) -> bool;

    /// Non-fatal error message.
    fn report_error(&mut self, message: &str);

    /// Non-fatal warning message.
    fn warn(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_messages_name_the_file() {
        let prompt = UnsavedPrompt::Modified {
            label: "notes.md".to_string(),
            externally_changed: false,
        };
        assert!(prompt.message().contains("notes.md"));
        assert_eq!(prompt.title(), "Unsaved changes");

        let prompt = UnsavedPrompt::Missing { label: "gone.md".to_string() };
        assert!(prompt.message().contains("gone.md"));
        assert_eq!(prompt.title(), "File not found");
    }

    #[test]
    fn test_exit_prompt_pluralizes() {
        assert!(UnsavedPrompt::Exit { dirty_count: 1 }.message().starts_with("One note"));
        assert!(UnsavedPrompt::Exit { dirty_count: 3 }.message().starts_with("3 notes"));
    }
}
