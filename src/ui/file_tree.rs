use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fltk::{app::Sender, browser::HoldBrowser, prelude::*};
use tracing::warn;

use crate::app::domain::messages::Message;
use crate::app::services::files::{DirEntryInfo, is_markdown_file, list_directory};

const PARENT_LABEL: &str = "..";

/// Sidebar listing of one folder. Folders browse, files open.
pub struct FileTree {
    pub widget: HoldBrowser,
    root: PathBuf,
    entries: Rc<RefCell<Vec<DirEntryInfo>>>,
}

impl FileTree {
    pub fn new(sender: Sender<Message>) -> Self {
        let mut widget = HoldBrowser::default();
        widget.set_text_size(13);
        let entries: Rc<RefCell<Vec<DirEntryInfo>>> = Rc::new(RefCell::new(Vec::new()));

        let cb_entries = entries.clone();
        widget.set_callback(move |b| {
            let line = b.value();
            if line <= 0 {
                return;
            }
            let entry = cb_entries.borrow().get(line as usize - 1).cloned();
            if let Some(entry) = entry {
                if entry.is_dir {
                    sender.send(Message::BrowseDirectory(entry.path));
                } else {
                    sender.send(Message::OpenPath(entry.path));
                }
            }
        });

        Self {
            widget,
            root: PathBuf::new(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Show the contents of `dir`, with a ".." row when it has a parent.
    pub fn show_dir(&mut self, dir: &Path) {
        let listed = match list_directory(dir) {
            Ok(listed) => listed,
            Err(e) => {
                warn!("Could not list folder: {}", e);
                Vec::new()
            }
        };

        let mut rows = Vec::with_capacity(listed.len() + 1);
        if let Some(parent) = dir.parent() {
            rows.push(DirEntryInfo {
                path: parent.to_path_buf(),
                name: PARENT_LABEL.to_string(),
                is_dir: true,
            });
        }
        rows.extend(listed);

        self.widget.clear();
        for row in &rows {
            let label = if row.is_dir {
                format!("@b@.{}/", row.name)
            } else if is_markdown_file(&row.path) {
                format!("@.{}", row.name)
            } else {
                format!("@i@.{}", row.name)
            };
            self.widget.add(&label);
        }
        *self.entries.borrow_mut() = rows;
        self.root = dir.to_path_buf();
        self.widget.redraw();
    }
}
