//! Rain particle simulator.
//!
//! A fixed-size curtain of drops stored as one flat `[x0, y0, z0, x1, ...]`
//! buffer so the renderer can upload it without reshaping. Each frame every
//! drop falls by `speed`; a drop that passes below the ground re-enters at the
//! top (`area .. area + 5`) in the same column. Horizontal positions are
//! chosen once at construction and never touched again, so the curtain keeps
//! its shape while it falls.
//!
//! The simulator only exists while `EnvironmentState::rain_gate()` holds
//! (night and reported rain): [`gate_rain`] inserts it as a resource when the
//! gate opens and removes it when the gate closes, so a dry or daytime scene
//! carries no buffer and does no per-frame work.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{RAIN_SPAWN_BAND, SCENE_RAIN_AREA, SCENE_RAIN_COUNT, SCENE_RAIN_SPEED};
use crate::environment::EnvironmentState;
use crate::sim_rng::SimRng;
use crate::SimulationUpdateSet;

/// Size and speed of a rain curtain. Fixed for the simulator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainParams {
    /// Number of drops.
    pub count: usize,
    /// Half-width of the square the curtain covers, and the recycle height.
    pub area: f32,
    /// World units fallen per frame.
    pub speed: f32,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            count: 5000,
            area: 30.0,
            speed: 0.5,
        }
    }
}

impl RainParams {
    /// The curtain over the island.
    pub fn scene() -> Self {
        Self {
            count: SCENE_RAIN_COUNT,
            area: SCENE_RAIN_AREA,
            speed: SCENE_RAIN_SPEED,
        }
    }
}

/// Parameters used when the gate opens.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RainSettings(pub RainParams);

impl Default for RainSettings {
    fn default() -> Self {
        Self(RainParams::scene())
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RainSimulator {
    params: RainParams,
    positions: Vec<f32>,
    dirty: bool,
}

impl RainSimulator {
    /// Scatter `params.count` drops: `x, z` uniform in `[-area, area)`,
    /// `y` uniform in `[5, area + 5)`.
    pub fn new<R: Rng + ?Sized>(params: RainParams, rng: &mut R) -> Self {
        let top = below(params.area + RAIN_SPAWN_BAND);
        let mut positions = Vec::with_capacity(params.count * 3);
        for _ in 0..params.count {
            let x = (rng.gen::<f32>() * 2.0 - 1.0) * params.area;
            let y = (rng.gen::<f32>() * params.area + RAIN_SPAWN_BAND).min(top);
            let z = (rng.gen::<f32>() * 2.0 - 1.0) * params.area;
            positions.extend_from_slice(&[x, y, z]);
        }
        Self {
            params,
            positions,
            dirty: true,
        }
    }

    /// Build from explicit positions. Returns `None` unless `positions` holds
    /// exactly `3 * params.count` floats.
    pub fn from_positions(params: RainParams, positions: Vec<f32>) -> Option<Self> {
        if positions.len() != params.count * 3 {
            return None;
        }
        Some(Self {
            params,
            positions,
            dirty: true,
        })
    }

    /// Advance every drop by one frame.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let RainParams { area, speed, .. } = self.params;
        let top = below(area + RAIN_SPAWN_BAND);
        for y in self.positions.iter_mut().skip(1).step_by(3) {
            *y -= speed;
            if *y < 0.0 {
                *y = (area + rng.gen::<f32>() * RAIN_SPAWN_BAND).min(top);
            }
        }
        self.dirty = true;
    }

    pub fn params(&self) -> RainParams {
        self.params
    }

    pub fn count(&self) -> usize {
        self.params.count
    }

    /// The flat `x, y, z` buffer.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn particle(&self, index: usize) -> Option<[f32; 3]> {
        let base = index.checked_mul(3)?;
        let p = self.positions.get(base..base.checked_add(3)?)?;
        Some([p[0], p[1], p[2]])
    }

    /// Positions grouped per drop, the layout mesh attributes want.
    pub fn points(&self) -> Vec<[f32; 3]> {
        self.positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the "buffer changed" flag. Returns whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// Largest `f32` strictly below a positive `bound`. A uniform draw close to 1
/// rounds `area + u * band` up to the bound itself.
fn below(bound: f32) -> f32 {
    if bound > 0.0 && bound.is_finite() {
        f32::from_bits(bound.to_bits() - 1)
    } else {
        bound
    }
}

/// Create or drop the simulator to follow `EnvironmentState::rain_gate()`.
pub fn gate_rain(
    mut commands: Commands,
    env: Res<EnvironmentState>,
    settings: Res<RainSettings>,
    rain: Option<Res<RainSimulator>>,
    mut rng: ResMut<SimRng>,
) {
    match (env.rain_gate(), rain.is_some()) {
        (true, false) => {
            let sim = RainSimulator::new(settings.0, &mut rng.0);
            info!(
                "Rain started: {} drops over +/-{} units",
                sim.count(),
                settings.0.area
            );
            commands.insert_resource(sim);
        }
        (false, true) => {
            info!("Rain stopped");
            commands.remove_resource::<RainSimulator>();
        }
        _ => {}
    }
}

/// Frame hook: one step per rendered frame while the simulator exists.
pub fn step_rain(mut rain: ResMut<RainSimulator>, mut rng: ResMut<SimRng>) {
    rain.step(&mut rng.0);
}

pub struct RainPlugin;

impl Plugin for RainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RainSettings>().add_systems(
            Update,
            (
                gate_rain.run_if(resource_changed::<EnvironmentState>),
                step_rain.run_if(resource_exists::<RainSimulator>),
            )
                .chain()
                .in_set(SimulationUpdateSet::Frame),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Always yields the largest value, so every uniform draw is just under 1.
    struct TopRng;

    impl RngCore for TopRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(u8::MAX);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn small() -> RainParams {
        RainParams {
            count: 4,
            area: 10.0,
            speed: 2.0,
        }
    }

    #[test]
    fn test_buffer_has_three_floats_per_drop() {
        let sim = RainSimulator::new(RainParams::default(), &mut rng());
        assert_eq!(sim.positions().len(), 5000 * 3);
        assert_eq!(sim.points().len(), 5000);
        assert_eq!(sim.count(), 5000);
    }

    #[test]
    fn test_initial_positions_in_bounds() {
        let params = RainParams::scene();
        let sim = RainSimulator::new(params, &mut rng());
        for i in 0..sim.count() {
            let [x, y, z] = sim.particle(i).unwrap();
            assert!((-params.area..params.area).contains(&x), "x={}", x);
            assert!((-params.area..params.area).contains(&z), "z={}", z);
            assert!(
                (RAIN_SPAWN_BAND..params.area + RAIN_SPAWN_BAND).contains(&y),
                "y={}",
                y
            );
        }
    }

    #[test]
    fn test_step_keeps_columns_and_height_band() {
        let params = RainParams {
            count: 200,
            area: 10.0,
            speed: 0.7,
        };
        let mut r = rng();
        let mut sim = RainSimulator::new(params, &mut r);
        let initial = sim.points();

        for _ in 0..500 {
            sim.step(&mut r);
            for (i, start) in initial.iter().enumerate() {
                let [x, y, z] = sim.particle(i).unwrap();
                assert_eq!(x, start[0]);
                assert_eq!(z, start[2]);
                assert!(y >= 0.0 && y < params.area + RAIN_SPAWN_BAND, "y={}", y);
            }
        }
    }

    #[test]
    fn test_linear_fall_without_reset() {
        let params = RainParams {
            count: 1,
            area: 10.0,
            speed: 0.5,
        };
        let y0 = 9.0_f32;
        let mut sim = RainSimulator::from_positions(params, vec![1.0, y0, -1.0]).unwrap();
        let mut r = rng();
        for k in 1..=18 {
            sim.step(&mut r);
            let y = sim.particle(0).unwrap()[1];
            assert!((y - (y0 - k as f32 * 0.5)).abs() < 1e-5, "k={} y={}", k, y);
        }
    }

    #[test]
    fn test_four_drop_scenario() {
        let positions = vec![
            0.0, 3.0, 0.0, //
            1.0, 8.0, 1.0, //
            -1.0, 9.0, -1.0, //
            2.0, 14.0, 2.0,
        ];
        let mut sim = RainSimulator::from_positions(small(), positions).unwrap();
        let mut r = rng();

        sim.step(&mut r);
        assert_eq!(sim.particle(0).unwrap()[1], 1.0);

        sim.step(&mut r);
        let y = sim.particle(0).unwrap()[1];
        assert!((10.0..15.0).contains(&y), "reset y={}", y);
        assert_eq!(sim.particle(0).unwrap()[0], 0.0);
        assert_eq!(sim.particle(0).unwrap()[2], 0.0);
    }

    #[test]
    fn test_first_reset_lands_in_top_band() {
        let mut r = rng();
        for y0 in [0.1_f32, 1.9, 2.0, 5.5, 12.3] {
            let mut sim = RainSimulator::from_positions(small(), vec![0.0, y0, 0.0].repeat(4))
                .unwrap();
            let mut prev = y0;
            loop {
                sim.step(&mut r);
                let y = sim.particle(0).unwrap()[1];
                if prev - 2.0 < 0.0 {
                    assert!((10.0..15.0).contains(&y), "y0={} y={}", y0, y);
                    break;
                }
                assert!((y - (prev - 2.0)).abs() < 1e-5);
                prev = y;
            }
        }
    }

    #[test]
    fn test_dirty_flag_roundtrip() {
        let mut sim = RainSimulator::new(small(), &mut rng());
        assert!(sim.take_dirty());
        assert!(!sim.is_dirty());
        assert!(!sim.take_dirty());
        sim.step(&mut rng());
        assert!(sim.is_dirty());
        assert!(sim.take_dirty());
    }

    #[test]
    fn test_from_positions_checks_length() {
        assert!(RainSimulator::from_positions(small(), vec![0.0; 11]).is_none());
        assert!(RainSimulator::from_positions(small(), vec![0.0; 12]).is_some());
    }

    #[test]
    fn test_particle_out_of_range_is_none() {
        let sim = RainSimulator::new(small(), &mut rng());
        assert!(sim.particle(4).is_none());
        assert!(sim.particle(usize::MAX).is_none());
    }

    #[test]
    fn test_same_seed_same_curtain() {
        let a = RainSimulator::new(RainParams::scene(), &mut rng());
        let b = RainSimulator::new(RainParams::scene(), &mut rng());
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_topmost_draw_stays_below_band_ceiling() {
        let params = RainParams::scene();
        let ceiling = params.area + RAIN_SPAWN_BAND;

        let mut sim =
            RainSimulator::from_positions(params, vec![0.0, 0.2, 0.0].repeat(params.count)).unwrap();
        sim.step(&mut TopRng);
        let y = sim.particle(0).unwrap()[1];
        assert!(y >= params.area && y < ceiling, "reset y={}", y);

        let fresh = RainSimulator::new(params, &mut TopRng);
        let [x, y, z] = fresh.particle(0).unwrap();
        assert!(y < ceiling, "initial y={}", y);
        assert!(x < params.area && z < params.area);
    }
}
