use fltk::{
    app::Sender,
    enums::{Align, Color},
    frame::Frame,
    group::{Flex, FlexType},
    menu::MenuBar,
    misc::HelpView,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use super::file_tree::FileTree;
use super::tab_bar::{TAB_BAR_HEIGHT, TabBar};
use crate::app::domain::messages::Message;

pub const APP_TITLE: &str = "MarkPad";
const SIDEBAR_WIDTH: i32 = 200;
const HIDDEN_HINT: &str = "Editor and preview are hidden.\nUse the View menu to show them again.";

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    pub tab_bar: TabBar,
    pub body: Flex,
    pub file_tree: FileTree,
    pub text_editor: TextEditor,
    pub preview: HelpView,
    /// Shown in place of both panes when both are hidden.
    pub hint: Frame,
}

pub fn build_main_window(sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 1000, 640, APP_TITLE);
    wind.set_xclass(APP_TITLE);

    let mut flex = Flex::new(0, 0, 1000, 640, None);
    flex.set_type(FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, 30, "");
    flex.fixed(&menu, 30);

    let tab_bar = TabBar::new(0, 30, 1000, *sender);
    flex.fixed(&tab_bar.widget, TAB_BAR_HEIGHT);

    let mut body = Flex::default();
    body.set_type(FlexType::Row);

    let file_tree = FileTree::new(*sender);
    body.fixed(&file_tree.widget, SIDEBAR_WIDTH);

    let mut text_editor = TextEditor::new(0, 0, 0, 0, "");
    text_editor.set_buffer(TextBuffer::default());
    text_editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
    text_editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));

    let preview = HelpView::new(0, 0, 0, 0, "");

    let mut hint = Frame::default().with_label(HIDDEN_HINT);
    hint.set_label_color(Color::from_rgb(120, 120, 120));
    hint.set_align(Align::Center | Align::Inside);
    hint.hide();

    body.end();
    flex.end();
    wind.resizable(&flex);
    wind.end();

    MainWidgets {
        wind,
        menu,
        tab_bar,
        body,
        file_tree,
        text_editor,
        preview,
        hint,
    }
}
