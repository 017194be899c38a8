//! # TestIsland — headless integration test harness
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` + the ambient audio controller
//! (driving a [`RecordingSink`]) so tests can run the island without a
//! window, renderer, audio device or network.
//!
//! Time is stepped manually through `TimeUpdateStrategy::ManualDuration`, and
//! the wall clock is pinned to a fixed hour, so every run is reproducible.

mod queries;
mod sink;

use std::time::Duration;

use bevy::app::App;
use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

pub use sink::{RecordingSink, SinkCall};

use crate::ambient_audio::AmbientAudioPlugin;
use crate::clock_sampler::WallClock;
use crate::config::IslandConfig;
use crate::environment::DayNightChanged;
use crate::weather::{WeatherSlot, WeatherTransport};
use crate::SimulationPlugin;

/// Simulated time per frame for [`TestIsland::update`].
pub const FRAME_DT: Duration = Duration::from_millis(16);

/// Offline transport: the request stays in flight until a test answers it
/// with [`TestIsland::deliver_weather`].
fn hold_request(_url: String, _slot: WeatherSlot) {}

/// A headless Bevy App running the island simulation.
pub struct TestIsland {
    app: App,
    edge_cursor: EventCursor<DayNightChanged>,
    edges: Vec<bool>,
}

impl Default for TestIsland {
    fn default() -> Self {
        Self::new()
    }
}

impl TestIsland {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Noon, no weather key, default seed, audio unlocked.
    pub fn new() -> Self {
        Self::with_config(12, IslandConfig::default())
    }

    /// Like [`TestIsland::new`] with the wall clock pinned to `hour`.
    pub fn at_hour(hour: u32) -> Self {
        Self::with_config(hour, IslandConfig::default())
    }

    /// Full control over the starting hour and configuration.
    pub fn with_config(hour: u32, config: IslandConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME_DT));

        // Insert BEFORE SimulationPlugin so the environment is not read and
        // the first is_day sample uses the pinned hour.
        app.insert_resource(config);
        app.insert_resource(WallClock::fixed(hour));
        app.insert_resource(WeatherTransport(hold_request));

        app.add_plugins(SimulationPlugin);
        app.add_plugins(AmbientAudioPlugin::<RecordingSink>::default());

        // Run one update so Startup systems execute.
        app.update();

        let edge_cursor = app
            .world()
            .resource::<Events<DayNightChanged>>()
            .get_cursor();
        let mut island = Self {
            app,
            edge_cursor,
            edges: Vec::new(),
        };
        island.collect_edges();
        island
    }

    // -----------------------------------------------------------------------
    // Driving the app
    // -----------------------------------------------------------------------

    /// Run one frame of [`FRAME_DT`].
    pub fn update(&mut self) {
        self.step(FRAME_DT);
    }

    /// Run `n` frames of [`FRAME_DT`].
    pub fn frames(&mut self, n: u32) {
        for _ in 0..n {
            self.update();
        }
    }

    /// Advance simulated time by at least `total`, in 200 ms frames.
    pub fn advance(&mut self, total: Duration) {
        let step = Duration::from_millis(200);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.step(step);
            elapsed += step;
        }
    }

    /// Run one frame of `dt`.
    pub fn step(&mut self, dt: Duration) {
        self.app
            .insert_resource(TimeUpdateStrategy::ManualDuration(dt));
        self.app.update();
        self.collect_edges();
    }

    fn collect_edges(&mut self) {
        let events = self.app.world().resource::<Events<DayNightChanged>>();
        self.edges
            .extend(self.edge_cursor.read(events).map(|e| e.is_day));
    }

    /// Access the ECS world mutably.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
