use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use simulation::SimulationUpdateSet;

pub mod day_night_panel;
pub mod theme;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_island_theme)
            .add_systems(
                Update,
                (
                    day_night_panel::island_overlay_ui,
                    day_night_panel::toggle_day_night_key,
                )
                    .in_set(SimulationUpdateSet::Input),
            );
    }
}
