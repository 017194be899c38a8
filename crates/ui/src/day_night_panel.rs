//! Island overlay: the day/night toggle, the current ambient track and the
//! weather readout.
//!
//! The toggle only sends `ToggleDayNight`; the clock sampler applies it, and
//! the next periodic sample may flip it back.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use simulation::ambient_audio::AmbientAudioController;
use simulation::clock_sampler::ToggleDayNight;
use simulation::environment::EnvironmentState;
use simulation::weather::{WeatherQuery, WeatherSnapshot};

// =============================================================================
// Systems
// =============================================================================

pub fn island_overlay_ui(
    mut contexts: EguiContexts,
    env: Res<EnvironmentState>,
    audio: Res<AmbientAudioController>,
    query: Res<WeatherQuery>,
    mut toggles: EventWriter<ToggleDayNight>,
) {
    egui::Window::new("Island")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(contexts.ctx_mut(), |ui| {
            ui.spacing_mut().item_spacing.y = 6.0;

            if ui.button(toggle_label(env.is_day())).clicked() {
                toggles.send(ToggleDayNight);
            }
            ui.label(audio.active_track().label());

            ui.separator();
            ui.label(weather_readout(env.weather(), *query));
        });
}

/// N flips day and night, like the button.
pub fn toggle_day_night_key(
    keys: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut toggles: EventWriter<ToggleDayNight>,
) {
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }
    if keys.just_pressed(KeyCode::KeyN) {
        toggles.send(ToggleDayNight);
    }
}

// =============================================================================
// Labels
// =============================================================================

fn toggle_label(is_day: bool) -> &'static str {
    if is_day {
        "Switch to Night"
    } else {
        "Switch to Day"
    }
}

fn weather_readout(weather: Option<&WeatherSnapshot>, query: WeatherQuery) -> String {
    if let Some(snapshot) = weather {
        let mut parts = vec![snapshot
            .description
            .clone()
            .unwrap_or_else(|| snapshot.condition.name().to_string())];
        if let Some(celsius) = snapshot.temperature_celsius() {
            parts.push(format!("{:.0}°C", celsius));
        }
        if let Some(place) = &snapshot.location_name {
            parts.push(place.clone());
        }
        return parts.join(", ");
    }
    if query.is_pending() {
        "Checking the weather...".to_string()
    } else {
        "Weather unavailable".to_string()
    }
}
