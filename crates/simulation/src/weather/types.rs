use serde::Deserialize;

use crate::config::WEATHER_ENDPOINT;
use crate::geolocation::GeoFix;

/// Coarse sky condition, as far as the scene cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Rain,
    /// Clouds, drizzle, snow, mist, thunderstorm, ...
    Other,
}

impl WeatherCondition {
    /// Map the service's top-level `weather[0].main` group name.
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => WeatherCondition::Clear,
            "Rain" => WeatherCondition::Rain,
            _ => WeatherCondition::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Other => "Cloudy",
        }
    }
}

/// One observation from the weather service. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    /// Free-text description, e.g. "light rain".
    pub description: Option<String>,
    pub temperature_kelvin: Option<f32>,
    /// Place name the service resolved the coordinates to.
    pub location_name: Option<String>,
}

impl WeatherSnapshot {
    pub fn new(condition: WeatherCondition) -> Self {
        Self {
            condition,
            description: None,
            temperature_kelvin: None,
            location_name: None,
        }
    }

    pub fn is_raining(&self) -> bool {
        self.condition == WeatherCondition::Rain
    }

    pub fn show_clouds(&self) -> bool {
        self.condition != WeatherCondition::Clear
    }

    pub fn temperature_celsius(&self) -> Option<f32> {
        self.temperature_kelvin.map(|k| k - 273.15)
    }
}

/// Why the one weather query produced no snapshot.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather query unavailable: {0}")]
    Unavailable(String),
    #[error("weather request failed: {0}")]
    Http(String),
    #[error("weather service answered HTTP {0}")]
    Status(u16),
    #[error("malformed weather response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather response has no condition")]
    MissingCondition,
}

// Only the fields the island reads; everything else in the document is ignored.
#[derive(Deserialize)]
struct CurrentWeatherDoc {
    #[serde(default)]
    weather: Vec<WeatherDescriptor>,
    main: Option<MainReadings>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct WeatherDescriptor {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: Option<f32>,
}

/// Extract a snapshot from a current-weather JSON document.
///
/// The condition comes from the first entry of the `weather` array; a missing
/// or empty group name fails the whole query.
pub fn parse_weather_response(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let doc: CurrentWeatherDoc = serde_json::from_str(body)?;
    let descriptor = doc
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::MissingCondition)?;
    let main = descriptor
        .main
        .filter(|m| !m.trim().is_empty())
        .ok_or(WeatherError::MissingCondition)?;

    Ok(WeatherSnapshot {
        condition: WeatherCondition::from_main(main.trim()),
        description: descriptor.description,
        temperature_kelvin: doc.main.and_then(|m| m.temp),
        location_name: doc.name.filter(|n| !n.is_empty()),
    })
}

/// Query URL for the current weather at `fix`.
pub fn weather_url(fix: GeoFix, api_key: &str) -> String {
    format!(
        "{}?lat={}&lon={}&appid={}",
        WEATHER_ENDPOINT, fix.latitude, fix.longitude, api_key
    )
}
