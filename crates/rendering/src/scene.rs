//! Static scene content: the island and the airplane circling it.

use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use simulation::config::SCENE_PLANE_SCALE;
use simulation::orbit::{OrbitalParams, Orbiter};

pub const ISLAND_MODEL: &str = "models/island.glb";
pub const AIRPLANE_MODEL: &str = "models/airplane.glb";

/// Scale of the airplane mesh inside its flight frame.
const AIRPLANE_MESH_SCALE: f32 = 0.021;

#[derive(Component)]
pub struct Island;

#[derive(Component)]
pub struct Airplane;

/// Orientation of the airplane mesh relative to its flight frame, so the
/// nose ends up on the frame's local -X axis.
pub fn airplane_mesh_transform() -> Transform {
    Transform::from_rotation(Quat::from_euler(
        EulerRot::XYZ,
        -std::f32::consts::FRAC_PI_2,
        0.0,
        -1.0,
    ))
    .with_scale(Vec3::splat(AIRPLANE_MESH_SCALE))
}

pub fn spawn_scene(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn((
        Island,
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(ISLAND_MODEL))),
        Transform::default(),
    ));

    // The flight frame carries the orbit; `drive_orbiters` only writes its
    // translation and rotation, so the scale survives.
    let params = OrbitalParams::scene();
    commands
        .spawn((
            Airplane,
            Orbiter(params),
            Transform::from_translation(params.pose_at(0.0).position)
                .with_scale(Vec3::splat(SCENE_PLANE_SCALE)),
            Visibility::default(),
        ))
        .with_children(|frame| {
            frame.spawn((
                SceneRoot(
                    asset_server.load(GltfAssetLabel::Scene(0).from_asset(AIRPLANE_MODEL)),
                ),
                airplane_mesh_transform(),
            ));
        });
}
