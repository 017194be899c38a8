//! Circular flight path for the airplane prop.
//!
//! The pose is a pure function of elapsed time: replaying the same timestamps
//! yields the same poses, independent of frame rate.

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;

use crate::config::{SCENE_ORBIT_HEIGHT, SCENE_ORBIT_RADIUS, SCENE_ORBIT_SPEED};
use crate::SimulationUpdateSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParams {
    /// Horizontal radius of the circle around the origin.
    pub radius: f32,
    /// Angular speed in radians per second.
    pub speed: f32,
    /// Constant flight altitude.
    pub height: f32,
}

impl Default for OrbitalParams {
    fn default() -> Self {
        Self {
            radius: 4.0,
            speed: 0.3,
            height: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPose {
    pub position: Vec3,
    /// Rotation about +Y; the nose points along the direction of travel.
    pub heading_yaw: f32,
}

impl OrbitalPose {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.heading_yaw)
    }
}

impl OrbitalParams {
    /// The loop flown over the island.
    pub fn scene() -> Self {
        Self {
            radius: SCENE_ORBIT_RADIUS,
            speed: SCENE_ORBIT_SPEED,
            height: SCENE_ORBIT_HEIGHT,
        }
    }

    /// Pose after `elapsed_secs` of flight.
    pub fn pose_at(&self, elapsed_secs: f32) -> OrbitalPose {
        self.pose_at_phase(elapsed_secs * self.speed)
    }

    /// Pose at orbit angle `t` (radians).
    pub fn pose_at_phase(&self, t: f32) -> OrbitalPose {
        OrbitalPose {
            position: Vec3::new(self.radius * t.cos(), self.height, self.radius * t.sin()),
            heading_yaw: -t + FRAC_PI_2,
        }
    }

    /// Seconds per lap, `None` for a parked orbiter.
    pub fn period_secs(&self) -> Option<f32> {
        (self.speed != 0.0).then(|| TAU / self.speed.abs())
    }
}

/// Entities whose `Transform` follows an orbit every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct Orbiter(pub OrbitalParams);

/// Frame hook: place every orbiter for the current elapsed time.
///
/// The phase is wrapped to one lap in `f64` so long sessions don't lose
/// precision in the `f32` trig.
pub fn drive_orbiters(time: Res<Time>, mut orbiters: Query<(&Orbiter, &mut Transform)>) {
    let elapsed = time.elapsed_secs_f64();
    for (orbiter, mut transform) in &mut orbiters {
        let phase = (elapsed * f64::from(orbiter.0.speed)).rem_euclid(std::f64::consts::TAU);
        let pose = orbiter.0.pose_at_phase(phase as f32);
        transform.translation = pose.position;
        transform.rotation = pose.rotation();
    }
}

pub struct OrbitPlugin;

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            drive_orbiters.in_set(SimulationUpdateSet::Frame),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_start_of_orbit() {
        let pose = OrbitalParams::scene().pose_at(0.0);
        assert!((pose.position - Vec3::new(15.0, 20.0, 0.0)).length() < EPS);
        assert!((pose.heading_yaw - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_stays_on_circle_at_constant_height() {
        let params = OrbitalParams::scene();
        for i in 0..2000 {
            let t = i as f32 * 0.173;
            let p = params.pose_at(t).position;
            let r2 = p.x * p.x + p.z * p.z;
            assert!((r2 - params.radius * params.radius).abs() < 0.05, "t={} r2={}", t, r2);
            assert_eq!(p.y, params.height);
        }
    }

    #[test]
    fn test_periodic() {
        let params = OrbitalParams {
            radius: 4.0,
            speed: 0.5,
            height: 5.0,
        };
        let period = params.period_secs().unwrap();
        assert!((period - TAU / 0.5).abs() < EPS);
        for t in [0.0_f32, 1.3, 4.0, 9.9] {
            let a = params.pose_at(t).position;
            let b = params.pose_at(t + period).position;
            assert!((a - b).length() < EPS, "t={}", t);
        }
    }

    #[test]
    fn test_heading_is_tangent_to_motion() {
        let params = OrbitalParams::default();
        for t in [0.0_f32, 0.7, 2.0, 5.5] {
            let pose = params.pose_at_phase(t);
            // Direction of travel for increasing t.
            let velocity = Vec3::new(-t.sin(), 0.0, t.cos());
            // The model's nose is local -X.
            let forward = pose.rotation() * Vec3::NEG_X;
            assert!((forward - velocity).length() < EPS, "t={}", t);
        }
    }

    #[test]
    fn test_replay_is_deterministic() {
        let params = OrbitalParams::scene();
        let times: Vec<f32> = (0..100).map(|i| i as f32 / 60.0).collect();
        let first: Vec<OrbitalPose> = times.iter().map(|&t| params.pose_at(t)).collect();
        let second: Vec<OrbitalPose> = times.iter().map(|&t| params.pose_at(t)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parked_orbiter_has_no_period() {
        let params = OrbitalParams {
            speed: 0.0,
            ..Default::default()
        };
        assert_eq!(params.period_secs(), None);
        assert_eq!(params.pose_at(100.0), params.pose_at(0.0));
    }
}
