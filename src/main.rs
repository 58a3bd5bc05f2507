use fltk::{
    app,
    enums::{CallbackTrigger, Event},
    prelude::*,
};
use tracing::info;

use mark_pad::app::domain::messages::Message;
use mark_pad::app::domain::settings::AppSettings;
use mark_pad::app::infrastructure::logging::init_logging;
use mark_pad::app::services::files::paths_from_drop;
use mark_pad::app::services::session::JsonFileStore;
use mark_pad::app::state::AppState;
use mark_pad::ui::main_window::build_main_window;
use mark_pad::ui::view::MainView;

fn main() {
    let settings = AppSettings::load();
    init_logging(&settings.log_level);

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let mut widgets = build_main_window(&sender);

    // Every keystroke syncs the editor buffer into the active session.
    widgets.text_editor.set_trigger(CallbackTrigger::Changed);
    widgets.text_editor.set_callback({
        let s = sender;
        move |_| s.send(Message::BufferEdited)
    });

    // Closing from the title bar goes through the same unsaved-changes check as File/Quit.
    widgets.wind.set_callback({
        let s = sender;
        move |_| {
            if app::event() == Event::Close {
                s.send(Message::WindowClose);
            }
        }
    });

    widgets.wind.handle({
        let s = sender;
        move |_, event| match event {
            Event::DndEnter | Event::DndDrag | Event::DndRelease => true,
            Event::Paste => {
                let paths = paths_from_drop(&app::event_text());
                if !paths.is_empty() {
                    s.send(Message::FilesDropped(paths));
                }
                true
            }
            _ => false,
        }
    });

    let store = JsonFileStore::default_location();
    let state = AppState::restore(&store, &settings);
    let mut view = MainView::new(widgets, state, &settings, store, &sender);
    view.show();
    info!("MarkPad started");

    while app.wait() {
        if let Some(msg) = receiver.recv()
            && view.handle(msg)
        {
            app.quit();
        }
    }

    info!("MarkPad closed");
}
