//! Scripted stand-ins for the dialogs and the settings store, so the session
//! lifecycle can run without a display.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::app::domain::prompt::{Choice, Prompter, UnsavedPrompt};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::session::{PersistedState, SettingsStore};

/// Answers prompts from queues and records every question asked.
///
/// Once a queue runs dry the answer is the cautious one: Cancel, no path,
/// no confirmation.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    choices: VecDeque<Choice>,
    save_paths: VecDeque<Option<PathBuf>>,
    confirmations: VecDeque<bool>,

    pub unsaved_prompts: Vec<UnsavedPrompt>,
    /// Suggested file names passed to each save-location prompt.
    pub save_prompts: Vec<String>,
    pub confirm_prompts: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn with_save_paths(mut self, paths: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
        self.save_paths.extend(paths);
        self
    }

    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(answers);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_unsaved(&mut self, prompt: &UnsavedPrompt) -> Choice {
        self.unsaved_prompts.push(prompt.clone());
        self.choices.pop_front().unwrap_or(Choice::Cancel)
    }

    fn ask_save_path(&mut self, _start_dir: &Path, suggested_name: &str) -> Option<PathBuf> {
        self.save_prompts.push(suggested_name.to_string());
        self.save_paths.pop_front().flatten()
    }

    fn confirm(&mut self, _title: &str, question: &str) -> bool {
        self.confirm_prompts.push(question.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: PersistedState,
    pub saves: usize,
    /// Make every `save` fail, as a read-only config dir would.
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> PersistedState {
        self.state.clone()
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        if self.fail_saves {
            return Err(AppError::Settings("store is read-only".to_string()));
        }
        self.state = state.clone();
        self.saves += 1;
        Ok(())
    }
}
