//! FLTK front-end: window layout, menus, dialogs and the message dispatch
//! that drives [`crate::app::AppState`].

pub mod dialogs;
pub mod file_dialogs;
pub mod file_tree;
pub mod main_window;
pub mod menu;
pub mod prompter;
pub mod tab_bar;
pub mod view;
