//! Baseview input → egui [`RawInput`].
//!
//! Pointer movement, buttons and wheel drive the knobs; modifiers are kept
//! current so Shift gives fine control. Text, clipboard and IME are not
//! translated since the editor has no text fields.

use baseview::{MouseButton, MouseEvent, ScrollDelta, WindowEvent};
use egui::{Event, Modifiers, PointerButton, Pos2, RawInput, Vec2};
use keyboard_types::Modifiers as KeyModifiers;

/// Points scrolled per wheel line.
const POINTS_PER_LINE: f32 = 24.0;

/// Input accumulated between two egui passes.
pub(super) struct InputState {
    raw: RawInput,
    /// Last pointer position in logical points.
    pointer: Pos2,
    /// Physical pixels per logical point.
    scale: f32,
    /// Viewport size in physical pixels.
    physical_size: (u32, u32),
}

impl InputState {
    pub(super) fn new(scale: f64, physical_size: (u32, u32)) -> Self {
        Self {
            raw: RawInput::default(),
            pointer: Pos2::ZERO,
            scale: scale as f32,
            physical_size,
        }
    }

    pub(super) fn physical_size(&self) -> (u32, u32) {
        self.physical_size
    }

    /// Input for the next pass, with the screen rect filled in.
    pub(super) fn take(&mut self) -> RawInput {
        let (w, h) = self.physical_size;
        self.raw.screen_rect = Some(egui::Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(w as f32 / self.scale, h as f32 / self.scale),
        ));
        self.raw.take()
    }

    fn to_points(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(x as f32 / self.scale, y as f32 / self.scale)
    }

    fn button(&mut self, button: MouseButton, pressed: bool) {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => return,
        };
        self.raw.events.push(Event::PointerButton {
            pos: self.pointer,
            button,
            pressed,
            modifiers: self.raw.modifiers,
        });
    }

    pub(super) fn mouse(&mut self, event: &MouseEvent) {
        match event {
            MouseEvent::CursorMoved {
                position,
                modifiers,
            } => {
                self.set_modifiers(*modifiers);
                self.pointer = self.to_points(position.x, position.y);
                self.raw.events.push(Event::PointerMoved(self.pointer));
            }
            MouseEvent::ButtonPressed { button, modifiers } => {
                self.set_modifiers(*modifiers);
                self.button(*button, true);
            }
            MouseEvent::ButtonReleased { button, modifiers } => {
                self.set_modifiers(*modifiers);
                self.button(*button, false);
            }
            MouseEvent::WheelScrolled { delta, .. } => {
                let delta = match *delta {
                    ScrollDelta::Lines { x, y } => Vec2::new(x, y) * POINTS_PER_LINE,
                    ScrollDelta::Pixels { x, y } => Vec2::new(x, y) / self.scale,
                };
                self.raw.events.push(Event::MouseWheel {
                    unit: egui::MouseWheelUnit::Point,
                    delta,
                    modifiers: self.raw.modifiers,
                });
            }
            MouseEvent::CursorLeft => self.raw.events.push(Event::PointerGone),
            _ => {}
        }
    }

    pub(super) fn window(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Focused => self.raw.focused = true,
            WindowEvent::Unfocused => self.raw.focused = false,
            WindowEvent::Resized(info) => {
                let size = info.physical_size();
                self.physical_size = (size.width, size.height);
            }
            _ => {}
        }
    }

    pub(super) fn set_modifiers(&mut self, modifiers: KeyModifiers) {
        self.raw.modifiers = Modifiers {
            alt: modifiers.contains(KeyModifiers::ALT),
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            shift: modifiers.contains(KeyModifiers::SHIFT),
            mac_cmd: false,
            command: modifiers.contains(KeyModifiers::META),
        };
    }
}
