use crate::animation::LidRegime;
use crate::clock::Clock;
use crate::controller::EyeController;
use crate::painter::EyeSurface;
use crate::scheduler::FrameRequester;
use crate::theme::{Color, ThemeMode, ThemePalette, ThemeVariables};

/// Live values shown in the panel.
#[derive(Clone, Copy, Debug)]
pub struct EyeReadout {
    pub regime: LidRegime,
    pub blink: f32,
    pub squint: f32,
    pub frame_count: u64,
    pub warmed_up: bool,
    pub idle: bool,
}

impl EyeReadout {
    pub fn from_controller<S, R, C>(controller: &EyeController<S, R, C>) -> Option<Self>
    where
        S: EyeSurface,
        R: FrameRequester,
        C: Clock,
    {
        let lid = controller.animation()?.lid();
        let scheduler = controller.scheduler()?;
        Some(Self {
            regime: lid.regime,
            blink: lid.blink,
            squint: lid.squint,
            frame_count: scheduler.frame_count(),
            warmed_up: scheduler.is_warmed_up(),
            idle: controller.is_idle(),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelResponse {
    /// Theme mode flipped; the host should refresh the controller palette.
    pub theme_changed: bool,
}

pub fn eye_control_panel(
    ctx: &egui::Context,
    palette: &mut ThemePalette,
    theme: &mut ThemeVariables,
    readout: Option<&EyeReadout>,
) -> PanelResponse {
    let mut response = PanelResponse::default();

    egui::SidePanel::right("eye_controls")
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading("Eye");
            ui.separator();

            match readout {
                Some(r) => {
                    ui.label(format!("Regime: {:?}", r.regime));
                    ui.add(egui::ProgressBar::new(r.blink.clamp(0.0, 1.0)).text("Blink"));
                    ui.add(egui::ProgressBar::new(r.squint.clamp(0.0, 1.0)).text("Squint"));
                    ui.label(format!(
                        "Frame {}{}",
                        r.frame_count,
                        if r.warmed_up { "" } else { " (warming up)" }
                    ));
                    if r.idle {
                        ui.label("Idle");
                    }
                }
                None => {
                    ui.label("No surface");
                }
            }

            ui.separator();

            let label = match theme.mode {
                ThemeMode::Dark => "Switch to light",
                ThemeMode::Light => "Switch to dark",
            };
            if ui.button(label).clicked() {
                theme.mode = theme.mode.toggled();
                response.theme_changed = true;
            }

            egui::CollapsingHeader::new("Palette")
                .default_open(false)
                .show(ui, |ui| {
                    color_row(ui, "Outline", &mut palette.outline);
                    color_row(ui, "Iris Inner", &mut palette.iris_start);
                    color_row(ui, "Iris Outer", &mut palette.iris_end);
                    color_row(ui, "Pupil", &mut palette.pupil);
                    color_row(ui, "Glow", &mut palette.glow);
                    color_row(ui, "Spokes", &mut palette.radial_lines);
                    color_row(ui, "Background", &mut palette.background);
                });

            ui.separator();

            if ui.button("Reset").clicked() {
                *palette = ThemePalette::resolve(&*theme);
            }
        });

    response
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) {
    ui.horizontal(|ui| {
        ui.label(label);
        color_edit_rgba(ui, color);
    });
}

fn color_edit_rgba(ui: &mut egui::Ui, color: &mut Color) {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mut rgba = egui::Color32::from_rgba_unmultiplied(
        to_u8(color.r),
        to_u8(color.g),
        to_u8(color.b),
        to_u8(color.a),
    );
    if ui.color_edit_button_srgba(&mut rgba).changed() {
        let [r, g, b, a] = rgba.to_srgba_unmultiplied();
        *color = Color::from_rgba8(r, g, b, f32::from(a) / 255.0);
    }
}
