//! Scene constants and runtime configuration.
//!
//! Compile-time tuning lives in the `pub const` items below. Values that differ
//! per deployment (weather API key, a fixed geolocation for desktop builds, the
//! rain RNG seed) are read from the environment once at startup into
//! [`IslandConfig`].

use bevy::prelude::*;

/// First hour (inclusive) that counts as daytime.
pub const DAY_START_HOUR: u32 = 6;
/// First hour (inclusive) that counts as night again.
pub const DAY_END_HOUR: u32 = 18;

/// Seconds between two wall-clock samples of the day/night flag.
pub const CLOCK_SAMPLE_PERIOD_SECS: f32 = 60.0;

/// Pause between swapping the ambient track and calling play on it again.
pub const AUDIO_SETTLE_DELAY_MS: u64 = 100;

/// Rain curtain used by the island scene.
pub const SCENE_RAIN_COUNT: usize = 8000;
pub const SCENE_RAIN_AREA: f32 = 40.0;
pub const SCENE_RAIN_SPEED: f32 = 0.7;

/// Extra height added to the initial drop position, and the width of the
/// band a recycled drop re-enters at (`area .. area + RAIN_SPAWN_BAND`).
pub const RAIN_SPAWN_BAND: f32 = 5.0;

/// Flight path of the airplane circling the island.
pub const SCENE_ORBIT_RADIUS: f32 = 15.0;
pub const SCENE_ORBIT_SPEED: f32 = 0.32;
pub const SCENE_ORBIT_HEIGHT: f32 = 20.0;
pub const SCENE_PLANE_SCALE: f32 = 4.5;

/// Current-weather endpoint queried once at startup.
pub const WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment variable names read into [`IslandConfig`].
pub const ENV_WEATHER_API_KEY: &str = "ISLAND_WEATHER_API_KEY";
pub const ENV_LATITUDE: &str = "ISLAND_LATITUDE";
pub const ENV_LONGITUDE: &str = "ISLAND_LONGITUDE";
pub const ENV_SEED: &str = "ISLAND_SEED";

/// Seed used for the rain RNG when `ISLAND_SEED` is not set.
pub const DEFAULT_SEED: u64 = 42;

/// Deployment configuration, resolved once when the plugin is built.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct IslandConfig {
    /// API key for the weather service. `None` means the weather query is skipped.
    pub weather_api_key: Option<String>,
    /// Fixed `(latitude, longitude)` used where no geolocation API exists (desktop).
    pub fixed_location: Option<(f64, f64)>,
    /// Seed for the deterministic rain RNG.
    pub seed: u64,
    /// Whether playback has to wait for a user gesture (browsers do, desktop doesn't).
    pub autoplay_requires_gesture: bool,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            fixed_location: None,
            seed: DEFAULT_SEED,
            autoplay_requires_gesture: cfg!(target_arch = "wasm32"),
        }
    }
}

impl IslandConfig {
    /// Build the configuration from process environment variables.
    ///
    /// The API key falls back to the value baked in at compile time, which is
    /// the only source available to browser builds.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let weather_api_key = lookup(ENV_WEATHER_API_KEY)
            .or_else(|| option_env!("ISLAND_WEATHER_API_KEY").map(str::to_string))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let parse_coord = |name: &str| lookup(name).and_then(|v| v.trim().parse::<f64>().ok());
        let fixed_location = match (parse_coord(ENV_LATITUDE), parse_coord(ENV_LONGITUDE)) {
            (Some(lat), Some(lon))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) =>
            {
                Some((lat, lon))
            }
            _ => None,
        };

        let seed = lookup(ENV_SEED)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);

        Self {
            weather_api_key,
            fixed_location,
            seed,
            ..Default::default()
        }
    }
}
