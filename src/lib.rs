//! MarkPad: a tabbed markdown note editor.
//!
//! The `app` module holds everything that does not need a display: the tab
//! registry, unsaved-change reconciliation, persistence and the text routines
//! behind the formatting shortcuts. The FLTK front-end lives in `ui` and is
//! only compiled with the `gui` feature.

pub mod app;
pub mod test_utils;

#[cfg(feature = "gui")]
pub mod ui;
