//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Document file I/O and directory listing
//! - Session persistence
//! - Text operations behind the formatting shortcuts
//! - Note templates

pub mod files;
pub mod session;
pub mod templates;
pub mod text_ops;
