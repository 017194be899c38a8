//! Query and input methods for `TestIsland`.

use bevy::prelude::*;

use crate::ambient_audio::{AmbientAudioController, PointerUnlock};
use crate::clock_sampler::{ToggleDayNight, WallClock};
use crate::environment::EnvironmentState;
use crate::rain::RainSimulator;
use crate::weather::{WeatherQuery, WeatherQuerySlots, WeatherResult};

use super::{RecordingSink, TestIsland};

impl TestIsland {
    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Pin the wall clock to `hour`. Picked up by the next 60 s sample.
    pub fn set_hour(&mut self, hour: u32) {
        self.world_mut()
            .resource_mut::<WallClock>()
            .set_fixed_hour(hour);
    }

    /// Queue a manual day/night toggle for the next frame.
    pub fn toggle_day_night(&mut self) {
        self.world_mut().send_event(ToggleDayNight);
    }

    /// Queue the first-interaction unlock for the next frame.
    pub fn pointer_down(&mut self) {
        self.world_mut().send_event(PointerUnlock);
    }

    /// Pretend a weather request is in flight and deliver `result` to it.
    /// The poll system consumes it on the next frame.
    pub fn inject_weather(&mut self, result: WeatherResult) {
        let world = self.world_mut();
        *world.resource_mut::<WeatherQuery>() = WeatherQuery::Fetching;
        world.resource::<WeatherQuerySlots>().weather.fill(result);
    }

    /// Answer the request the weather query already has in flight, without
    /// touching its state.
    pub fn deliver_weather(&mut self, result: WeatherResult) {
        self.resource::<WeatherQuerySlots>().weather.fill(result);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn has_resource<T: Resource>(&self) -> bool {
        self.app.world().contains_resource::<T>()
    }

    pub fn env(&self) -> &EnvironmentState {
        self.resource::<EnvironmentState>()
    }

    pub fn rain(&self) -> Option<&RainSimulator> {
        self.app.world().get_resource::<RainSimulator>()
    }

    pub fn sink(&self) -> &RecordingSink {
        self.resource::<RecordingSink>()
    }

    pub fn sink_mut(&mut self) -> Mut<'_, RecordingSink> {
        self.world_mut().resource_mut::<RecordingSink>()
    }

    pub fn audio(&self) -> &AmbientAudioController {
        self.resource::<AmbientAudioController>()
    }

    /// Every `DayNightChanged` seen so far, oldest first.
    pub fn edges(&self) -> &[bool] {
        &self.edges
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.resource::<Time>().elapsed_secs_f64()
    }
}
