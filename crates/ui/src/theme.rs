use bevy_egui::{egui, EguiContexts};

/// Translucent dark panels so the overlay does not hide the scene.
pub fn apply_island_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    let panel = egui::Color32::from_rgba_unmultiplied(20, 28, 40, 200);
    let inactive = egui::Color32::from_rgb(45, 62, 80);
    let hover = egui::Color32::from_rgb(60, 90, 120);
    let active = egui::Color32::from_rgb(240, 190, 90);

    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = active;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = active;

    style.visuals.window_fill = panel;
    style.visuals.window_stroke = egui::Stroke::NONE;

    let rounding = egui::CornerRadius::same(10);
    style.visuals.window_corner_radius = rounding;
    style.visuals.widgets.inactive.corner_radius = rounding;
    style.visuals.widgets.hovered.corner_radius = rounding;
    style.visuals.widgets.active.corner_radius = rounding;

    ctx.set_style(style);
}
