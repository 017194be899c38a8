//! Live weather adapter.
//!
//! Issues one best-effort query at startup: geolocation fix first, then a
//! current-weather HTTP request keyed by the coordinates and the configured
//! API key. A successful answer is published into `EnvironmentState` exactly
//! once. Any failure (no key, no fix, network, HTTP status, bad JSON) leaves
//! the weather unset, is logged, and is never retried.

pub mod fetch;
pub mod systems;
pub mod types;

pub use fetch::{
    fetch_weather, spawn_weather_fetch, WeatherResult, WeatherSlot, WeatherTransport,
};
pub use systems::{
    begin_weather_query, poll_weather_query, weather_query_pending, WeatherQuery,
    WeatherQuerySlots,
};
pub use types::{
    parse_weather_response, weather_url, WeatherCondition, WeatherError, WeatherSnapshot,
};

use bevy::prelude::*;

use crate::SimulationUpdateSet;

pub struct WeatherPlugin;

impl Plugin for WeatherPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeatherQuery>()
            .init_resource::<WeatherQuerySlots>()
            .init_resource::<WeatherTransport>()
            .add_systems(Startup, begin_weather_query)
            .add_systems(
                Update,
                poll_weather_query
                    .run_if(weather_query_pending)
                    .in_set(SimulationUpdateSet::Environment),
            );
    }
}
