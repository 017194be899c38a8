use bevy::prelude::*;
use simulation::environment::EnvironmentState;
use std::f32::consts::PI;

/// Marker for the scene's directional light.
#[derive(Component)]
pub struct Sun;

/// Everything the sky and lights need for one side of the day/night switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPreset {
    pub sun_illuminance: f32,
    pub sun_color: Color,
    /// Elevation of the light above the horizon, radians.
    pub sun_elevation: f32,
    /// Rotation about Y, radians.
    pub sun_azimuth: f32,
    pub ambient_brightness: f32,
    pub ambient_color: Color,
    /// Sky color behind the scene.
    pub clear_color: Color,
}

impl LightingPreset {
    pub fn for_is_day(is_day: bool) -> Self {
        if is_day {
            Self {
                sun_illuminance: 10000.0,
                sun_color: Color::srgb(1.0, 0.95, 0.9), // warm white
                sun_elevation: 50.0_f32.to_radians(),
                sun_azimuth: PI / 6.0,
                ambient_brightness: 300.0,
                ambient_color: Color::srgb(0.9, 0.9, 1.0),
                clear_color: Color::srgb(0.53, 0.78, 0.94),
            }
        } else {
            Self {
                sun_illuminance: 500.0,
                sun_color: Color::srgb(0.5, 0.55, 0.8), // blue-ish moonlight
                sun_elevation: 30.0_f32.to_radians(),
                sun_azimuth: -PI / 4.0,
                ambient_brightness: 50.0,
                ambient_color: Color::srgb(0.4, 0.45, 0.7),
                clear_color: Color::srgb(0.02, 0.03, 0.09),
            }
        }
    }

    /// Light orientation. Bevy's directional light points along -Z, so a
    /// negative X rotation tilts it downward.
    pub fn sun_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.sun_azimuth, -self.sun_elevation, 0.0)
    }
}

pub fn setup_lighting(mut commands: Commands, env: Res<EnvironmentState>) {
    let preset = LightingPreset::for_is_day(env.is_day());
    commands.insert_resource(AmbientLight {
        color: preset.ambient_color,
        brightness: preset.ambient_brightness,
    });
    commands.insert_resource(ClearColor(preset.clear_color));
    commands.spawn((
        Sun,
        DirectionalLight {
            illuminance: preset.sun_illuminance,
            color: preset.sun_color,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(preset.sun_rotation()),
    ));
}

/// Switches sun, ambient light and sky between the day and night presets.
///
/// Runs only when `EnvironmentState` changed, so lighting follows both the
/// periodic sample and the manual toggle.
pub fn apply_day_night_lighting(
    env: Res<EnvironmentState>,
    mut sun_query: Query<(&mut DirectionalLight, &mut Transform), With<Sun>>,
    mut ambient: ResMut<AmbientLight>,
    mut clear_color: ResMut<ClearColor>,
) {
    let preset = LightingPreset::for_is_day(env.is_day());

    for (mut sun, mut transform) in sun_query.iter_mut() {
        sun.illuminance = preset.sun_illuminance;
        sun.color = preset.sun_color;
        transform.rotation = preset.sun_rotation();
    }

    ambient.brightness = preset.ambient_brightness;
    ambient.color = preset.ambient_color;
    clear_color.0 = preset.clear_color;
}
