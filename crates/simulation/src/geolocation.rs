//! One-shot geolocation fix used to key the weather query.
//!
//! In the browser the fix comes from `navigator.geolocation`; the user may
//! deny it or the API may be missing. Desktop builds have no location API, so
//! the fix is read from `IslandConfig::fixed_location` instead. Every failure
//! just means "no weather query".

use crate::async_slot::AsyncSlot;
use crate::config::IslandConfig;

/// A single `(latitude, longitude)` reading in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this platform")]
    Unsupported,
    #[error("geolocation denied or unavailable: {0}")]
    Denied(String),
    #[error("no fixed location configured (set ISLAND_LATITUDE and ISLAND_LONGITUDE)")]
    Unconfigured,
}

pub type GeoFixSlot = AsyncSlot<Result<GeoFix, GeolocationError>>;

/// Ask the platform for a fix. The answer lands in `slot`, possibly on a
/// later frame.
#[cfg(not(target_arch = "wasm32"))]
pub fn request_fix(config: &IslandConfig, slot: GeoFixSlot) {
    slot.fill(fixed_fix(config));
}

/// Ask the platform for a fix. The answer lands in `slot`, possibly on a
/// later frame.
#[cfg(target_arch = "wasm32")]
pub fn request_fix(config: &IslandConfig, slot: GeoFixSlot) {
    web::request_browser_fix(config, slot);
}

/// The configured location, if any.
pub fn fixed_fix(config: &IslandConfig) -> Result<GeoFix, GeolocationError> {
    config
        .fixed_location
        .map(|(latitude, longitude)| GeoFix {
            latitude,
            longitude,
        })
        .ok_or(GeolocationError::Unconfigured)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::{fixed_fix, GeoFix, GeoFixSlot, GeolocationError};
    use crate::config::IslandConfig;

    pub(super) fn request_browser_fix(config: &IslandConfig, slot: GeoFixSlot) {
        // A configured location wins over the permission prompt.
        if let Ok(fix) = fixed_fix(config) {
            slot.fill(Ok(fix));
            return;
        }

        let Some(window) = web_sys::window() else {
            slot.fill(Err(GeolocationError::Unsupported));
            return;
        };
        let Ok(geolocation) = window.navigator().geolocation() else {
            slot.fill(Err(GeolocationError::Unsupported));
            return;
        };

        let ok_slot = slot.clone();
        let on_success = Closure::once_into_js(move |position: JsValue| {
            ok_slot.fill(read_fix(&position));
        });
        let err_slot = slot.clone();
        let on_error = Closure::once_into_js(move |error: JsValue| {
            err_slot.fill(Err(GeolocationError::Denied(read_message(&error))));
        });

        if let Err(e) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
        ) {
            slot.fill(Err(GeolocationError::Denied(format!("{:?}", e))));
        }
    }

    fn read_f64(target: &JsValue, key: &str) -> Option<f64> {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    }

    fn read_fix(position: &JsValue) -> Result<GeoFix, GeolocationError> {
        let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords"))
            .map_err(|e| GeolocationError::Denied(format!("{:?}", e)))?;
        match (read_f64(&coords, "latitude"), read_f64(&coords, "longitude")) {
            (Some(latitude), Some(longitude)) => Ok(GeoFix {
                latitude,
                longitude,
            }),
            _ => Err(GeolocationError::Denied(
                "position had no coordinates".to_string(),
            )),
        }
    }

    fn read_message(error: &JsValue) -> String {
        js_sys::Reflect::get(error, &JsValue::from_str("message"))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}
