//! egui rendition of the settings panel.

use crate::panel::{self, Control, ControlKind, Effect, Field, Value};
use crate::params::Params;
use crate::patterns::PatternKind;

/// Draw the settings window and apply every edit to `params`.
///
/// Returns the effects the scene must carry out. Slider edits that need a
/// regeneration are reported once, when the drag ends.
pub fn settings_window(ctx: &egui::Context, active: PatternKind, params: &mut Params, fps: f32) -> Vec<Effect> {
    let mut effects = Vec::new();

    egui::Window::new("Settings")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("{:.0} fps", fps));
            ui.separator();

            let controls = panel::describe(active);
            let (patterns, rest): (Vec<Control>, Vec<Control>) = controls
                .into_iter()
                .partition(|c| matches!(c.field, Field::SelectPattern(_)));

            ui.horizontal_wrapped(|ui| {
                for control in &patterns {
                    let selected = control.field == Field::SelectPattern(active);
                    if ui.selectable_label(selected, control.label).clicked() {
                        effects.push(panel::apply(params, control.field, Value::Trigger));
                    }
                }
            });
            ui.separator();

            egui::CollapsingHeader::new(active.name())
                .default_open(true)
                .show(ui, |ui| {
                    for control in &rest {
                        if let Some(effect) = control_ui(ui, control, params) {
                            effects.push(effect);
                        }
                    }
                });
        });

    effects.retain(|e| *e != Effect::None);
    effects
}

fn control_ui(ui: &mut egui::Ui, control: &Control, params: &mut Params) -> Option<Effect> {
    match control.kind {
        ControlKind::Button => ui
            .button(control.label)
            .clicked()
            .then(|| panel::apply(params, control.field, Value::Trigger)),
        ControlKind::Color => {
            let Value::Color(current) = control.field.get(params) else {
                return None;
            };
            let mut rgb = current.to_array();
            let mut changed = false;
            ui.horizontal(|ui| {
                changed = ui.color_edit_button_rgb(&mut rgb).changed();
                ui.label(control.label);
            });
            changed.then(|| panel::apply(params, control.field, Value::Color(rgb.into())))
        }
        ControlKind::Slider {
            min,
            max,
            integer,
            logarithmic,
        } => {
            let Value::Number(mut value) = control.field.get(params) else {
                return None;
            };
            let mut slider = egui::Slider::new(&mut value, min..=max)
                .text(control.label)
                .logarithmic(logarithmic);
            if integer {
                slider = slider.integer();
            }
            let response = ui.add(slider);

            let mut effect = None;
            if response.changed() {
                let applied = panel::apply(params, control.field, Value::Number(value));
                // Rebuilding hundreds of thousands of points per drag step stalls the UI.
                if applied != Effect::Regenerate || !response.dragged() {
                    effect = Some(applied);
                }
            }
            if response.drag_stopped() && control.field.effect() == Effect::Regenerate {
                effect = Some(Effect::Regenerate);
            }
            effect
        }
    }
}
