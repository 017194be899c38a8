//! Two soft cloud puffs above the island, hidden under a clear sky.

use bevy::prelude::*;

use simulation::environment::EnvironmentState;

/// Centers of the cloud puffs.
pub const CLOUD_POSITIONS: [Vec3; 2] = [Vec3::new(-10.0, 20.0, -5.0), Vec3::new(15.0, 22.0, 0.0)];

/// Spheres making up one puff: offset from the puff center and radius.
const PUFF_BLOBS: [(Vec3, f32); 5] = [
    (Vec3::new(0.0, 0.0, 0.0), 2.2),
    (Vec3::new(2.0, -0.3, 0.4), 1.7),
    (Vec3::new(-2.1, -0.4, -0.2), 1.6),
    (Vec3::new(0.8, 0.9, -0.6), 1.4),
    (Vec3::new(-0.9, 0.6, 0.9), 1.3),
];

#[derive(Component)]
pub struct Cloud;

pub fn cloud_visibility(show: bool) -> Visibility {
    if show {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

pub fn spawn_clouds(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    env: Res<EnvironmentState>,
) {
    let sphere = meshes.add(Sphere::new(1.0));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.85),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 1.0,
        ..default()
    });

    for center in CLOUD_POSITIONS {
        commands
            .spawn((
                Cloud,
                Transform::from_translation(center),
                cloud_visibility(env.show_clouds()),
            ))
            .with_children(|puff| {
                for (offset, radius) in PUFF_BLOBS {
                    puff.spawn((
                        Mesh3d(sphere.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::from_translation(offset).with_scale(Vec3::splat(radius)),
                    ));
                }
            });
    }
}

/// Show the clouds unless the weather explicitly reported a clear sky.
pub fn sync_cloud_visibility(
    env: Res<EnvironmentState>,
    mut clouds: Query<&mut Visibility, With<Cloud>>,
) {
    let wanted = cloud_visibility(env.show_clouds());
    for mut visibility in &mut clouds {
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clouds_hidden_only_when_not_shown() {
        assert_eq!(cloud_visibility(true), Visibility::Inherited);
        assert_eq!(cloud_visibility(false), Visibility::Hidden);
    }

    #[test]
    fn clouds_float_above_the_plane() {
        for center in CLOUD_POSITIONS {
            assert!(center.y >= 20.0);
        }
    }
}
