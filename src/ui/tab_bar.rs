use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app::Sender,
    draw,
    enums::{Align, Color, Event, Font},
    prelude::*,
    widget::Widget,
};

use crate::app::domain::document::{DocumentId, DocumentSession};
use crate::app::domain::messages::Message;

pub const TAB_BAR_HEIGHT: i32 = 30;

const MIN_TAB_WIDTH: i32 = 60;
const MAX_TAB_WIDTH: i32 = 200;
const CLOSE_BTN_SIZE: i32 = 14;
const CLOSE_BTN_MARGIN: i32 = 6;
const TAB_H_PADDING: i32 = 10;
const CORNER_RADIUS: i32 = 6;
const TAB_GAP: i32 = 1;
const PLUS_BTN_WIDTH: i32 = 28;
const PLUS_BTN_MARGIN: i32 = 4;

const BAR_BG: Color = Color::from_rgb(200, 200, 200);
const ACTIVE_BG: Color = Color::from_rgb(255, 255, 255);
const INACTIVE_BG: Color = Color::from_rgb(220, 220, 220);
const ACTIVE_TEXT: Color = Color::from_rgb(0, 0, 0);
const INACTIVE_TEXT: Color = Color::from_rgb(80, 80, 80);
const HOVER_BG: Color = Color::from_rgb(190, 190, 190);

struct TabInfo {
    id: DocumentId,
    label: String,
    is_dirty: bool,
    is_active: bool,
}

#[derive(Clone, Copy)]
struct TabSlot {
    x: i32,
    width: i32,
}

enum HitResult {
    Tab { index: usize, is_close: bool },
    PlusButton,
    None,
}

struct TabBarState {
    tabs: Vec<TabInfo>,
    slots: Vec<TabSlot>,
    plus_x: i32,
    hover_tab_index: Option<usize>,
    hover_close: bool,
    hover_plus: bool,
    sender: Sender<Message>,
    widget_w: i32,
}

/// Custom-drawn strip of tabs, one per open session, plus a "+" button.
pub struct TabBar {
    pub widget: Widget,
    state: Rc<RefCell<TabBarState>>,
}

impl TabBar {
    pub fn new(x: i32, y: i32, w: i32, sender: Sender<Message>) -> Self {
        let state = Rc::new(RefCell::new(TabBarState {
            tabs: Vec::new(),
            slots: Vec::new(),
            plus_x: PLUS_BTN_MARGIN,
            hover_tab_index: None,
            hover_close: false,
            hover_plus: false,
            sender,
            widget_w: w,
        }));

        let mut widget = Widget::new(x, y, w, TAB_BAR_HEIGHT, None);

        let draw_state = state.clone();
        widget.draw(move |wid| {
            let st = draw_state.borrow();
            draw_tab_bar(wid, &st);
        });

        let handle_state = state.clone();
        widget.handle(move |wid, event| handle_tab_bar(wid, event, &handle_state));

        Self { widget, state }
    }

    /// Refresh labels, dirty markers and the active tab from the registry.
    pub fn rebuild(&mut self, documents: &[DocumentSession], active_id: Option<DocumentId>) {
        let mut st = self.state.borrow_mut();
        st.widget_w = self.widget.w();
        st.tabs = documents
            .iter()
            .map(|doc| TabInfo {
                id: doc.id,
                label: doc.label().to_string(),
                is_dirty: doc.is_dirty(),
                is_active: active_id == Some(doc.id),
            })
            .collect();
        st.hover_tab_index = None;
        st.hover_close = false;
        compute_layout(&mut st);
        drop(st);
        self.widget.redraw();
    }
}

// --- Layout ---

fn compute_layout(st: &mut TabBarState) {
    st.slots.clear();
    let count = st.tabs.len() as i32;
    if count == 0 {
        st.plus_x = PLUS_BTN_MARGIN;
        return;
    }

    let fixed = PLUS_BTN_WIDTH + PLUS_BTN_MARGIN + TAB_GAP * (count - 1);
    let tab_width = ((st.widget_w - fixed) / count).clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);

    let mut cursor_x = 0;
    for _ in 0..count {
        st.slots.push(TabSlot {
            x: cursor_x,
            width: tab_width,
        });
        cursor_x += tab_width + TAB_GAP;
    }
    st.plus_x = cursor_x + PLUS_BTN_MARGIN;
}

fn close_box(slot: TabSlot, wy: i32) -> (i32, i32) {
    (
        slot.x + slot.width - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE,
        wy + (TAB_BAR_HEIGHT - CLOSE_BTN_SIZE) / 2,
    )
}

fn hit_test(st: &TabBarState, wy: i32, mx: i32, my: i32) -> HitResult {
    if my < wy || my >= wy + TAB_BAR_HEIGHT {
        return HitResult::None;
    }

    for (index, slot) in st.slots.iter().enumerate() {
        if mx >= slot.x && mx < slot.x + slot.width {
            let (close_x, close_y) = close_box(*slot, wy);
            let is_close = mx >= close_x
                && mx <= close_x + CLOSE_BTN_SIZE
                && my >= close_y
                && my <= close_y + CLOSE_BTN_SIZE;
            return HitResult::Tab { index, is_close };
        }
    }
    if mx >= st.plus_x && mx < st.plus_x + PLUS_BTN_WIDTH {
        return HitResult::PlusButton;
    }
    HitResult::None
}

// --- Drawing ---

fn truncate_to_fit(text: &str, max_width: i32) -> String {
    if max_width <= 0 {
        return String::new();
    }
    draw::set_font(Font::Helvetica, 12);
    let (tw, _) = draw::measure(text, true);
    if tw <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let chars: Vec<char> = text.chars().collect();
    for len in (1..chars.len()).rev() {
        let candidate: String = chars[..len].iter().collect();
        let full = format!("{candidate}{ellipsis}");
        let (fw, _) = draw::measure(&full, true);
        if fw <= max_width {
            return full;
        }
    }
    ellipsis.to_string()
}

fn draw_rounded_top_rect(x: i32, y: i32, w: i32, h: i32, r: i32, color: Color) {
    draw::set_draw_color(color);
    draw::draw_rectf(x, y + r, w, h - r);
    draw::draw_rectf(x + r, y, w - 2 * r, r);
    draw::draw_pie(x, y, 2 * r, 2 * r, 90.0, 180.0);
    draw::draw_pie(x + w - 2 * r, y, 2 * r, 2 * r, 0.0, 90.0);
}

fn draw_tab_bar(wid: &Widget, st: &TabBarState) {
    let wx = wid.x();
    let wy = wid.y();
    let wh = wid.h();

    draw::set_draw_color(BAR_BG);
    draw::draw_rectf(wx, wy, wid.w(), wh);

    for (index, (tab, slot)) in st.tabs.iter().zip(&st.slots).enumerate() {
        let tx = wx + slot.x;
        if tab.is_active {
            draw_rounded_top_rect(tx, wy, slot.width, wh, CORNER_RADIUS, ACTIVE_BG);
        } else {
            draw_rounded_top_rect(tx, wy + 2, slot.width, wh - 2, CORNER_RADIUS, INACTIVE_BG);
        }

        let text_color = if tab.is_active { ACTIVE_TEXT } else { INACTIVE_TEXT };
        let label = if tab.is_dirty {
            format!("{}*", tab.label)
        } else {
            tab.label.clone()
        };
        let text_width = slot.width - TAB_H_PADDING - CLOSE_BTN_MARGIN - CLOSE_BTN_SIZE - TAB_H_PADDING;
        let shown = truncate_to_fit(&label, text_width);
        draw::set_draw_color(text_color);
        draw::set_font(Font::Helvetica, 12);
        draw::draw_text(&shown, tx + TAB_H_PADDING, wy + (wh + 12) / 2);

        let (close_x, close_y) = close_box(*slot, 0);
        let close_x = wx + close_x;
        let close_y = wy + close_y;
        let hovered = st.hover_tab_index == Some(index);
        if hovered && st.hover_close {
            draw::set_draw_color(HOVER_BG);
            draw::draw_rectf(close_x - 2, close_y - 2, CLOSE_BTN_SIZE + 4, CLOSE_BTN_SIZE + 4);
        }
        draw::set_draw_color(text_color);
        draw::set_font(Font::HelveticaBold, 20);
        draw::draw_text2("\u{00d7}", close_x, close_y, CLOSE_BTN_SIZE, CLOSE_BTN_SIZE, Align::Center);
    }

    let px = wx + st.plus_x;
    let bg = if st.hover_plus { HOVER_BG } else { INACTIVE_BG };
    draw_rounded_top_rect(px, wy + 2, PLUS_BTN_WIDTH, wh - 4, CORNER_RADIUS, bg);
    draw::set_draw_color(if st.hover_plus { ACTIVE_TEXT } else { INACTIVE_TEXT });
    draw::set_font(Font::HelveticaBold, 16);
    draw::draw_text2("+", px, wy + 2, PLUS_BTN_WIDTH, wh - 4, Align::Center);
}

// --- Events ---

fn handle_tab_bar(wid: &mut Widget, event: Event, state: &Rc<RefCell<TabBarState>>) -> bool {
    match event {
        Event::Push => {
            let st = state.borrow();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();
            let button = fltk::app::event_button();
            let sender = st.sender;

            match hit_test(&st, wid.y(), mx, my) {
                HitResult::PlusButton if button == 1 => {
                    sender.send(Message::FileNew);
                    true
                }
                HitResult::Tab { index, is_close } => {
                    let id = st.tabs[index].id;
                    // Middle click closes, like a browser tab.
                    if button == 2 || (button == 1 && is_close) {
                        sender.send(Message::TabClose(id));
                    } else if button == 1 {
                        sender.send(Message::TabSelect(id));
                    }
                    true
                }
                _ => false,
            }
        }
        Event::Move | Event::Enter => {
            let mut st = state.borrow_mut();
            let mx = fltk::app::event_x() - wid.x();
            let my = fltk::app::event_y();
            let (tab, close, plus) = match hit_test(&st, wid.y(), mx, my) {
                HitResult::Tab { index, is_close } => (Some(index), is_close, false),
                HitResult::PlusButton => (None, false, true),
                HitResult::None => (None, false, false),
            };
            let changed = st.hover_tab_index != tab || st.hover_close != close || st.hover_plus != plus;
            st.hover_tab_index = tab;
            st.hover_close = close;
            st.hover_plus = plus;
            drop(st);
            if changed {
                wid.redraw();
            }
            true
        }
        Event::Leave => {
            let mut st = state.borrow_mut();
            st.hover_tab_index = None;
            st.hover_close = false;
            st.hover_plus = false;
            drop(st);
            wid.redraw();
            true
        }
        Event::Resize => {
            let mut st = state.borrow_mut();
            st.widget_w = wid.w();
            compute_layout(&mut st);
            false
        }
        _ => false,
    }
}
