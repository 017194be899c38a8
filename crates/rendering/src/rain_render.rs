//! Point-cloud rendering of the rain curtain.
//!
//! The curtain entity mirrors the `RainSimulator` resource: spawned when the
//! resource appears, despawned when it goes away. The vertex buffer is only
//! rewritten when the simulator reports a dirty buffer.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;

use simulation::rain::RainSimulator;

#[derive(Component)]
pub struct RainCurtain;

/// One vertex per drop, drawn as points.
pub fn build_rain_mesh(points: Vec<[f32; 3]>) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, points)
}

pub fn sync_rain_mesh(
    mut commands: Commands,
    rain: Option<ResMut<RainSimulator>>,
    curtains: Query<(Entity, &Mesh3d), With<RainCurtain>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut rain) = rain else {
        for (entity, _) in &curtains {
            commands.entity(entity).despawn();
        }
        return;
    };

    if curtains.is_empty() {
        rain.take_dirty();
        let mesh = meshes.add(build_rain_mesh(rain.points()));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(0.75, 0.8, 0.95, 0.7),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        // Drops leave the initial bounding box as they fall.
        commands.spawn((
            RainCurtain,
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::default(),
            NoFrustumCulling,
        ));
        debug!("Rain curtain spawned with {} points", rain.count());
        return;
    }

    if !rain.take_dirty() {
        return;
    }
    for (_, mesh3d) in &curtains {
        if let Some(mesh) = meshes.get_mut(&mesh3d.0) {
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, rain.points());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use simulation::rain::RainParams;

    #[test]
    fn rain_mesh_has_one_vertex_per_drop() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sim = RainSimulator::new(RainParams::default(), &mut rng);
        let mesh = build_rain_mesh(sim.points());
        assert_eq!(mesh.count_vertices(), sim.count());
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
    }
}
