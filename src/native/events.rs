use crate::input::{Keycode, PointerButton, RawInput};
use eframe::egui::{self, Context, Event, Key, MouseWheelUnit};

/// Points per wheel "line" when the platform reports pixel deltas.
const POINTS_PER_LINE: f32 = 50.0;

fn keycode(key: Key) -> Keycode {
    match key {
        Key::ArrowLeft => Keycode::Left,
        Key::ArrowRight => Keycode::Right,
        Key::ArrowUp => Keycode::Up,
        Key::ArrowDown => Keycode::Down,
        Key::Enter => Keycode::Enter,
        Key::Escape => Keycode::Escape,
        _ => Keycode::Other,
    }
}

fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Secondary => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

pub fn translate_event(event: &Event) -> Option<RawInput> {
    match event {
        Event::Key {
            key,
            pressed: true,
            repeat: false,
            ..
        } => Some(RawInput::KeyPressed(keycode(*key))),
        Event::PointerButton {
            button,
            pressed: true,
            ..
        } => Some(RawInput::PointerPressed(pointer_button(*button))),
        Event::MouseWheel { unit, delta, .. } => {
            let lines = match unit {
                MouseWheelUnit::Point => delta.y / POINTS_PER_LINE,
                MouseWheelUnit::Line | MouseWheelUnit::Page => delta.y,
            };
            (lines != 0.0).then_some(RawInput::Wheel(lines))
        }
        _ => None,
    }
}

/// This frame's events, plus a quit request if the window is being closed.
pub fn collect_frame_input(ctx: &Context) -> Vec<RawInput> {
    ctx.input(|i| {
        let mut raw: Vec<RawInput> = i.events.iter().filter_map(translate_event).collect();
        if i.viewport().close_requested() {
            raw.push(RawInput::QuitRequested);
        }
        raw
    })
}
