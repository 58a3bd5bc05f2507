//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - DocumentSession and DocumentId
//! - User preferences
//! - The prompting seam used by unsaved-change reconciliation
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod prompt;
pub mod settings;

pub use document::{DiskStamp, DocState, DocumentId, DocumentSession, SyncPoint, UNTITLED_LABEL};
pub use messages::Message;
pub use prompt::{Choice, Prompter, UnsavedPrompt};
pub use settings::AppSettings;
