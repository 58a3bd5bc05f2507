//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (DocumentSession, Settings, Prompter, Messages)
//! - `controllers/` - Orchestration (TabRegistry, close reconciliation, preview)
//! - `services/` - Business operations (file I/O, session store, text_ops, templates)
//! - `infrastructure/` - Error type and logging setup
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::preview::{LayoutState, PreviewController};
pub use controllers::reconcile::{CloseAction, CloseAssessment, ExitOutcome};
pub use controllers::tabs::TabRegistry;
pub use domain::{AppSettings, Choice, DocState, DocumentId, DocumentSession, Message, Prompter, UnsavedPrompt};
pub use infrastructure::error::{AppError, Result};
pub use services::session::{JsonFileStore, OpenFileEntry, PersistedState, SettingsStore, WindowGeometry};
pub use services::text_ops::{FormatAction, TextEdit};
pub use state::{AppState, SaveOutcome};
