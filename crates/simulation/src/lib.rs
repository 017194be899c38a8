use bevy::prelude::*;

pub mod ambient_audio;
pub mod async_slot;
pub mod clock_sampler;
pub mod config;
pub mod environment;
pub mod geolocation;
pub mod orbit;
pub mod rain;
pub mod sim_rng;
pub mod simulation_sets;
pub mod weather;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use simulation_sets::SimulationUpdateSet;

use config::IslandConfig;
use environment::EnvironmentState;

/// Environment model for the island scene: wall-clock day/night, the one-shot
/// weather query, the rain simulator and orbital motion.
///
/// Audio is registered separately through
/// [`ambient_audio::AmbientAudioPlugin`], parameterised over the playback
/// backend.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<IslandConfig>() {
            app.insert_resource(IslandConfig::from_env());
        }

        simulation_sets::configure_sets(app);

        // WallClock must exist before EnvironmentState takes its first sample.
        app.add_plugins((sim_rng::SimRngPlugin, clock_sampler::ClockSamplerPlugin));
        app.init_resource::<EnvironmentState>();

        app.add_plugins((
            weather::WeatherPlugin,
            rain::RainPlugin,
            orbit::OrbitPlugin,
        ));
    }
}
