//! Platform transport for the single weather request.
//!
//! Desktop runs a blocking `reqwest` call on a short-lived worker thread;
//! the browser goes through `fetch()` on the JS event loop. Both deliver into
//! a [`WeatherSlot`] that the frame-side poll system drains.

use bevy::prelude::*;

use crate::async_slot::AsyncSlot;
use crate::geolocation::GeoFix;

use super::types::{weather_url, WeatherError, WeatherSnapshot};

pub type WeatherResult = Result<WeatherSnapshot, WeatherError>;
pub type WeatherSlot = AsyncSlot<WeatherResult>;

/// How the request leaves the process: gets the URL and the slot to answer
/// into. Defaults to [`spawn_weather_fetch`]; headless runs swap in a
/// transport that never touches the network.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WeatherTransport(pub fn(String, WeatherSlot));

impl Default for WeatherTransport {
    fn default() -> Self {
        Self(spawn_weather_fetch)
    }
}

impl WeatherTransport {
    pub fn fetch(&self, fix: GeoFix, api_key: &str, slot: WeatherSlot) {
        (self.0)(weather_url(fix, api_key), slot);
    }
}

/// Query the current weather at `fix`. The result lands in `slot`, usually
/// several frames later.
pub fn fetch_weather(fix: GeoFix, api_key: &str, slot: WeatherSlot) {
    WeatherTransport::default().fetch(fix, api_key, slot);
}

/// Start the request for `url` in the background. Returns immediately.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_weather_fetch(url: String, slot: WeatherSlot) {
    let worker = slot.clone();
    let spawned = std::thread::Builder::new()
        .name("weather-query".to_string())
        .spawn(move || worker.fill(fetch_weather_blocking(&url)));
    if let Err(e) = spawned {
        slot.fill(Err(WeatherError::Unavailable(format!(
            "could not start worker: {}",
            e
        ))));
    }
}

/// Start the request for `url` in the background. Returns immediately.
#[cfg(target_arch = "wasm32")]
pub fn spawn_weather_fetch(url: String, slot: WeatherSlot) {
    wasm_bindgen_futures::spawn_local(async move {
        slot.fill(web::fetch_weather(&url).await);
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_weather_blocking(url: &str) -> WeatherResult {
    let response = reqwest::blocking::get(url).map_err(|e| WeatherError::Http(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::Status(status.as_u16()));
    }
    let body = response
        .text()
        .map_err(|e| WeatherError::Http(e.to_string()))?;
    super::types::parse_weather_response(&body)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use super::WeatherResult;
    use crate::weather::types::{parse_weather_response, WeatherError};

    pub(super) async fn fetch_weather(url: &str) -> WeatherResult {
        let window = web_sys::window()
            .ok_or_else(|| WeatherError::Unavailable("window not available".to_string()))?;
        let response_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| WeatherError::Http(format!("fetch failed: {:?}", e)))?;

        let response: web_sys::Response = response_value
            .dyn_into()
            .map_err(|_| WeatherError::Http("failed to cast fetch response".to_string()))?;

        if !response.ok() {
            return Err(WeatherError::Status(response.status()));
        }

        let text_promise = response
            .text()
            .map_err(|e| WeatherError::Http(format!("response.text() failed: {:?}", e)))?;
        let text_value = JsFuture::from(text_promise)
            .await
            .map_err(|e| WeatherError::Http(format!("await response text failed: {:?}", e)))?;
        let body = text_value
            .as_string()
            .ok_or_else(|| WeatherError::Http("response text was not a string".to_string()))?;
        parse_weather_response(&body)
    }
}
