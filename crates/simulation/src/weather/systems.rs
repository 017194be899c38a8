use bevy::prelude::*;

use crate::config::IslandConfig;
use crate::environment::EnvironmentState;
use crate::geolocation::{request_fix, GeoFixSlot};

use super::fetch::{WeatherSlot, WeatherTransport};

/// Lifecycle of the one weather query this process is allowed to make.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherQuery {
    /// Startup has not run yet.
    #[default]
    NotStarted,
    /// Waiting for the geolocation provider.
    AwaitingFix,
    /// HTTP request in flight.
    Fetching,
    /// A snapshot was published. Terminal.
    Resolved,
    /// Skipped or failed. Terminal, never retried.
    Failed,
}

impl WeatherQuery {
    pub fn is_pending(self) -> bool {
        matches!(self, WeatherQuery::AwaitingFix | WeatherQuery::Fetching)
    }
}

/// Hand-off slots between the async providers and the poll system.
#[derive(Resource, Clone, Default)]
pub struct WeatherQuerySlots {
    pub fix: GeoFixSlot,
    pub weather: WeatherSlot,
}

/// Startup system: kick off the geolocation request, or give up right away
/// when there is no API key to query with.
pub fn begin_weather_query(
    config: Res<IslandConfig>,
    slots: Res<WeatherQuerySlots>,
    mut query: ResMut<WeatherQuery>,
) {
    if *query != WeatherQuery::NotStarted {
        return;
    }
    if config.weather_api_key.is_none() {
        warn!("No weather API key configured; skipping live weather");
        *query = WeatherQuery::Failed;
        return;
    }
    request_fix(&config, slots.fix.clone());
    *query = WeatherQuery::AwaitingFix;
}

/// Per-frame poll: advance the query when the geolocation fix or the HTTP
/// response arrives. Publishes at most one snapshot.
pub fn poll_weather_query(
    config: Res<IslandConfig>,
    slots: Res<WeatherQuerySlots>,
    transport: Res<WeatherTransport>,
    mut query: ResMut<WeatherQuery>,
    mut env: ResMut<EnvironmentState>,
) {
    match *query {
        WeatherQuery::AwaitingFix => {
            let Some(result) = slots.fix.take() else {
                return;
            };
            let fix = match result {
                Ok(fix) => fix,
                Err(e) => {
                    warn!("Weather skipped: {}", e);
                    *query = WeatherQuery::Failed;
                    return;
                }
            };
            let Some(api_key) = config.weather_api_key.as_deref() else {
                *query = WeatherQuery::Failed;
                return;
            };
            info!(
                "Geolocation fix {:.3}, {:.3}; querying weather",
                fix.latitude, fix.longitude
            );
            transport.fetch(fix, api_key, slots.weather.clone());
            *query = WeatherQuery::Fetching;
        }
        WeatherQuery::Fetching => {
            let Some(result) = slots.weather.take() else {
                return;
            };
            match result {
                Ok(snapshot) => {
                    info!(
                        "Weather: {} ({})",
                        snapshot.condition.name(),
                        snapshot.description.as_deref().unwrap_or("no description")
                    );
                    if !env.publish_weather(snapshot) {
                        debug!("Weather already published; keeping the first snapshot");
                    }
                    *query = WeatherQuery::Resolved;
                }
                Err(e) => {
                    warn!("Weather fetch failed: {}", e);
                    *query = WeatherQuery::Failed;
                }
            }
        }
        WeatherQuery::NotStarted | WeatherQuery::Resolved | WeatherQuery::Failed => {}
    }
}

/// Run condition: only poll while the query is still in flight.
pub fn weather_query_pending(query: Res<WeatherQuery>) -> bool {
    query.is_pending()
}
