use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use fltk::{
    browser::HoldBrowser,
    button::Button,
    enums::Event,
    prelude::*,
    window::Window,
};

use super::run_dialog;

/// Let the user pick one of `templates`. `None` when cancelled.
pub fn show_template_picker(templates: &[PathBuf]) -> Option<PathBuf> {
    let mut dialog_win = Window::default()
        .with_size(320, 300)
        .with_label("New From Template")
        .center_screen();
    dialog_win.make_modal(true);

    let mut list = HoldBrowser::new(10, 10, 300, 230, None);
    for template in templates {
        let name = template
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        list.add(&format!("@.{}", name));
    }
    if !templates.is_empty() {
        list.select(1);
    }

    let mut ok_btn = Button::default()
        .with_pos(130, 255).with_size(80, 30).with_label("Create");
    let mut cancel_btn = Button::default()
        .with_pos(220, 255).with_size(80, 30).with_label("Cancel");

    dialog_win.end();
    dialog_win.make_resizable(false);
    dialog_win.show();

    let picked: Rc<Cell<Option<usize>>> = Rc::new(Cell::new(None));

    let picked_ok = picked.clone();
    let list_ok = list.clone();
    let dialog_ok = dialog_win.clone();
    ok_btn.set_callback(move |_| {
        let line = list_ok.value();
        if line > 0 {
            picked_ok.set(Some(line as usize - 1));
            dialog_ok.clone().hide();
        }
    });

    // Double-click on a row creates right away
    let mut ok_double = ok_btn.clone();
    list.set_callback(move |_| {
        if fltk::app::event() == Event::Released && fltk::app::event_clicks() {
            ok_double.do_callback();
        }
    });

    let dialog_close = dialog_win.clone();
    cancel_btn.set_callback(move |_| {
        dialog_close.clone().hide();
    });

    run_dialog(&dialog_win);
    picked.get().and_then(|i| templates.get(i).cloned())
}
