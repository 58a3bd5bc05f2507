use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogOptions, FileDialogType, NativeFileChooser};

pub const MARKDOWN_FILTER: &str = "Markdown\t*.{md,markdown,mdown}";
pub const HTML_FILTER: &str = "HTML\t*.{html,htm}";
pub const IMAGE_FILTER: &str = "Images\t*.{png,jpg,jpeg,gif,svg,webp}";

fn run_chooser(mut nfc: NativeFileChooser, start_dir: &Path) -> Option<PathBuf> {
    let _ = nfc.set_directory(&start_dir);
    nfc.show(); // blocks until close
    let filename = nfc.filename();
    if filename.as_os_str().is_empty() {
        None
    } else {
        Some(filename)
    }
}

pub fn native_open_dialog(start_dir: &Path, filter: &str) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseFile);
    nfc.set_filter(filter);
    run_chooser(nfc, start_dir)
}

pub fn native_save_dialog(start_dir: &Path, suggested_name: &str, filter: &str) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
    nfc.set_filter(filter);
    nfc.set_preset_file(suggested_name);
    nfc.set_option(FileDialogOptions::SaveAsConfirm);
    run_chooser(nfc, start_dir)
}

pub fn native_dir_dialog(start_dir: &Path) -> Option<PathBuf> {
    let nfc = NativeFileChooser::new(FileDialogType::BrowseDir);
    run_chooser(nfc, start_dir)
}
