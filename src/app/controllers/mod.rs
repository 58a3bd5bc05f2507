//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the UI:
//! - Tab registry
//! - Close/exit reconciliation of unsaved changes
//! - Markdown preview and HTML export

pub mod preview;
pub mod reconcile;
pub mod tabs;
