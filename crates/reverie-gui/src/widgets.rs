//! Editor widgets: rotary knobs for the five controls and a preset selector.

use std::f32::consts::PI;

use egui::{Align2, Color32, FontId, Pos2, Response, Sense, Stroke, Ui, Widget, pos2, vec2};
use reverie_core::gui::ControlSurface;
use reverie_core::{Origin, ParamId, SurfaceModel};

use crate::editor::EditorState;

/// Value change per dragged point, as a fraction of the range.
const DRAG_SENSITIVITY: f32 = 0.004;
/// Shift-drag divides sensitivity by this.
const FINE_DIVISOR: f32 = 10.0;

const TRACK: Color32 = Color32::from_rgb(46, 48, 58);
const FILL: Color32 = Color32::from_rgb(126, 176, 232);
const FILL_ACTIVE: Color32 = Color32::from_rgb(160, 206, 255);
const BODY: Color32 = Color32::from_rgb(56, 58, 70);
const LABEL: Color32 = Color32::from_rgb(182, 184, 194);
const VALUE_TEXT: Color32 = Color32::from_rgb(148, 150, 162);

/// Start of the knob sweep (bottom left), radians.
const SWEEP_START: f32 = PI * 0.75;
/// Total knob sweep, radians (270°).
const SWEEP: f32 = PI * 1.5;

/// Dark theme for the editor.
pub(crate) fn apply_theme(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::dark());
}

/// The whole editor: title, preset selector, one knob per control.
pub(crate) fn reverb_panel(ui: &mut Ui, state: &mut EditorState) {
    ui.horizontal(|ui| {
        ui.heading(crate::EDITOR_TITLE);
        ui.add_space(16.0);
        preset_selector(ui, state);
    });
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        for id in ParamId::ALL {
            param_knob(ui, &mut state.surface, id);
        }
    });
}

fn preset_selector(ui: &mut Ui, state: &mut EditorState) {
    let selected_text = state
        .selected
        .and_then(|i| state.presets.get(i))
        .map_or("Presets", |p| p.name.as_str());

    let mut chosen = None;
    egui::ComboBox::from_id_salt("reverie-presets")
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for (i, preset) in state.presets.iter().enumerate() {
                let mut item = ui.selectable_label(state.selected == Some(i), &preset.name);
                if let Some(description) = &preset.description {
                    item = item.on_hover_text(description);
                }
                if item.clicked() {
                    chosen = Some(i);
                }
            }
        });

    if let Some(i) = chosen
        && let Some(preset) = state.presets.get(i)
    {
        state.surface.apply_user_snapshot(&preset.snapshot());
        state.selected = Some(i);
    }
}

/// A knob bound to one control, with the gesture protocol: begin on drag
/// start, a change per moved frame, end on release. Double-click resets to
/// the default as one complete gesture.
fn param_knob(ui: &mut Ui, surface: &mut SurfaceModel, id: ParamId) {
    let desc = id.descriptor();
    let mut value = surface.value(id);

    let response = ui.add(Knob {
        value: &mut value,
        default: desc.default,
        label: desc.label,
        text: desc.format_value(value),
        diameter: 60.0,
    });

    if response.double_clicked() {
        surface.begin_gesture(id);
        surface.set_value(id, desc.default, Origin::User);
        surface.end_gesture(id);
        return;
    }
    if response.drag_started() {
        surface.begin_gesture(id);
    }
    if response.changed() {
        surface.set_value(id, value, Origin::User);
    }
    if response.drag_stopped() {
        surface.end_gesture(id);
    }
}

/// New knob position after a vertical drag of `delta_y` points (up is
/// positive change).
fn dragged_value(value: f32, delta_y: f32, fine: bool) -> f32 {
    let sensitivity = if fine {
        DRAG_SENSITIVITY / FINE_DIVISOR
    } else {
        DRAG_SENSITIVITY
    };
    (value - delta_y * sensitivity).clamp(0.0, 1.0)
}

/// Rotary knob over `[0, 1]`.
struct Knob<'a> {
    value: &'a mut f32,
    default: f32,
    label: &'a str,
    text: String,
    diameter: f32,
}

impl Widget for Knob<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let size = vec2(self.diameter + 24.0, self.diameter + 36.0);
        let (rect, mut response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        if response.double_clicked() {
            *self.value = self.default;
            response.mark_changed();
        } else if response.dragged() {
            let fine = ui.input(|i| i.modifiers.shift);
            *self.value = dragged_value(*self.value, response.drag_delta().y, fine);
            response.mark_changed();
        }

        if !ui.is_rect_visible(rect) {
            return response;
        }

        let painter = ui.painter();
        let radius = self.diameter / 2.0 - 4.0;
        let center = pos2(rect.center().x, rect.top() + self.diameter / 2.0);
        let active = response.dragged() || response.hovered();
        let fill = if active { FILL_ACTIVE } else { FILL };

        let angle = SWEEP_START + self.value.clamp(0.0, 1.0) * SWEEP;
        draw_arc(painter, center, radius - 2.0, SWEEP_START, SWEEP_START + SWEEP, TRACK);
        if *self.value > 0.001 {
            draw_arc(painter, center, radius - 2.0, SWEEP_START, angle, fill);
        }

        painter.circle_filled(center, radius - 8.0, BODY);
        let tip = pos2(
            center.x + angle.cos() * (radius - 14.0),
            center.y + angle.sin() * (radius - 14.0),
        );
        painter.line_segment([center, tip], Stroke::new(3.0, fill));

        painter.text(
            pos2(center.x, center.y + radius + 8.0),
            Align2::CENTER_TOP,
            self.label,
            FontId::proportional(12.0),
            LABEL,
        );
        painter.text(
            pos2(center.x, center.y + radius + 22.0),
            Align2::CENTER_TOP,
            &self.text,
            FontId::proportional(11.0),
            VALUE_TEXT,
        );

        response
    }
}

fn draw_arc(painter: &egui::Painter, center: Pos2, radius: f32, from: f32, to: f32, color: Color32) {
    const SEGMENTS: usize = 32;
    let points: Vec<Pos2> = (0..=SEGMENTS)
        .map(|i| {
            let angle = from + (to - from) * i as f32 / SEGMENTS as f32;
            pos2(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
        })
        .collect();
    painter.add(egui::Shape::line(points, Stroke::new(6.0, color)));
}
