use fltk::{
    app::Sender,
    enums::{Key, Shortcut},
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::controllers::preview::LayoutState;
use crate::app::domain::messages::Message;
use crate::app::services::text_ops::FormatAction;

fn toggle_flag(on: bool) -> MenuFlag {
    if on { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle }
}

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, layout: LayoutState) {
    let s = sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNew) });
    menu.add("File/New From Template...", Shortcut::Ctrl | Shortcut::Shift | 'n', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNewFromTemplate) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Open Folder...", Shortcut::Ctrl | Shortcut::Shift | 'o', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::OpenProject) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Export to HTML...", Shortcut::Ctrl | 'e', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::ExportHtml) });
    menu.add("File/Close Tab", Shortcut::Ctrl | 'w', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabCloseActive) });
    menu.add("File/Next Tab", Shortcut::Ctrl | Key::Tab, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabNext) });
    menu.add("File/Previous Tab", Shortcut::Ctrl | Shortcut::Shift | Key::Tab, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::TabPrevious) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Edit
    menu.add("Edit/Cut", Shortcut::Ctrl | 'x', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCut) });
    menu.add("Edit/Copy", Shortcut::Ctrl | 'c', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditCopy) });
    menu.add("Edit/Paste", Shortcut::Ctrl | 'v', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::EditPaste) });

    // Format
    let formats = [
        ("Format/Bold", Shortcut::Ctrl | 'b', FormatAction::Bold),
        ("Format/Italic", Shortcut::Ctrl | 'i', FormatAction::Italic),
        ("Format/Underline", Shortcut::Ctrl | 'u', FormatAction::Underline),
        ("Format/Strikethrough", Shortcut::Ctrl | 'k', FormatAction::Strikethrough),
        ("Format/Code", Shortcut::Ctrl | '`', FormatAction::Code),
        ("Format/Quote", Shortcut::Ctrl | '\'', FormatAction::Quote),
    ];
    for (label, shortcut, action) in formats {
        menu.add(label, shortcut, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(action)) });
    }
    for level in 1..=6u8 {
        let label = format!("Format/Heading/Heading {}", level);
        let shortcut = Shortcut::Ctrl | char::from(b'0' + level);
        menu.add(&label, shortcut, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Format(FormatAction::Header(level))) });
    }
    menu.add("Format/List Item", Shortcut::Ctrl | 'l', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::InsertListItem) });
    menu.add("Format/Image...", Shortcut::Ctrl | Shortcut::Shift | 'i', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::InsertImage) });

    // View
    menu.add("View/Editor", Shortcut::Ctrl | Shortcut::Shift | 'e', toggle_flag(layout.editor_visible), { let s = *s; move |_| s.send(Message::ToggleEditor) });
    menu.add("View/Preview", Shortcut::Ctrl | Shortcut::Shift | 'p', toggle_flag(layout.preview_visible), { let s = *s; move |_| s.send(Message::TogglePreview) });

    // Help
    menu.add("Help/About MarkPad", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ShowAbout) });
}

/// Keep a toggle item's check mark in sync with state changed elsewhere.
pub fn set_menu_checkbox(menu: &MenuBar, path: &str, checked: bool) {
    let idx = menu.find_index(path);
    if idx >= 0 {
        if let Some(mut item) = menu.at(idx) {
            if checked {
                item.set();
            } else {
                item.clear();
            }
        }
    }
}
