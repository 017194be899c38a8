use bevy::prelude::*;

use simulation::environment::EnvironmentState;
use simulation::SimulationUpdateSet;

pub mod audio_playback;
pub mod camera;
pub mod clouds;
pub mod day_night;
pub mod input;
pub mod rain_render;
pub mod scene;

/// Everything drawn or played for the island: camera, lights, models,
/// clouds, the rain point cloud and the ambient track backend.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(audio_playback::AmbientAudioBackendPlugin)
            .add_systems(
                Startup,
                (
                    camera::setup_camera,
                    day_night::setup_lighting,
                    scene::spawn_scene,
                    clouds::spawn_clouds,
                ),
            )
            .add_systems(
                Update,
                (camera::camera_orbit_drag, camera::camera_zoom, camera::apply_orbit_camera)
                    .chain(),
            )
            .add_systems(
                Update,
                input::emit_pointer_unlock.in_set(SimulationUpdateSet::Input),
            )
            .add_systems(
                Update,
                (
                    day_night::apply_day_night_lighting,
                    clouds::sync_cloud_visibility,
                )
                    .run_if(resource_changed::<EnvironmentState>)
                    .after(SimulationUpdateSet::Environment),
            )
            .add_systems(
                Update,
                rain_render::sync_rain_mesh.after(SimulationUpdateSet::Frame),
            );
    }
}
