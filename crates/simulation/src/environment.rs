//! Shared environment state: the merged day/night flag and weather snapshot.
//!
//! `EnvironmentState` is a plain resource with two independent writers, each
//! owning one field:
//!
//! - `is_day` is written only by the clock sampler
//!   ([`crate::clock_sampler`]), which also emits [`DayNightChanged`] when the
//!   value flips.
//! - `weather` is written only by the weather poll ([`crate::weather`]), at
//!   most once per process.
//!
//! Everything else (rain gate, clouds, audio, UI) reads it on its own schedule.

use bevy::prelude::*;

use crate::clock_sampler::WallClock;
use crate::weather::WeatherSnapshot;

/// Edge event fired exactly once per day/night transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayNightChanged {
    /// The new value of `EnvironmentState::is_day`.
    pub is_day: bool,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EnvironmentState {
    is_day: bool,
    weather: Option<WeatherSnapshot>,
}

impl FromWorld for EnvironmentState {
    /// The day/night flag is sampled immediately so it is defined from the
    /// first frame on.
    fn from_world(world: &mut World) -> Self {
        let is_day = match world.get_resource::<WallClock>() {
            Some(clock) => clock.is_day_now(),
            None => WallClock::default().is_day_now(),
        };
        Self::new(is_day)
    }
}

impl EnvironmentState {
    pub fn new(is_day: bool) -> Self {
        Self {
            is_day,
            weather: None,
        }
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    /// Latest weather observation, `None` until the one query succeeds.
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    /// Rain is only reported by an actual observation.
    pub fn is_raining(&self) -> bool {
        self.weather.as_ref().is_some_and(WeatherSnapshot::is_raining)
    }

    /// Clouds stay on unless the service explicitly reports clear skies.
    pub fn show_clouds(&self) -> bool {
        self.weather.as_ref().map_or(true, WeatherSnapshot::show_clouds)
    }

    /// Gate for the rain simulator: falling rain only at night during reported rain.
    pub fn rain_gate(&self) -> bool {
        !self.is_day && self.is_raining()
    }

    /// Overwrite the day/night flag. Returns `true` when the value changed.
    pub(crate) fn set_is_day(&mut self, is_day: bool) -> bool {
        let changed = self.is_day != is_day;
        self.is_day = is_day;
        changed
    }

    /// Store the weather snapshot. Returns `false` (and keeps the existing
    /// snapshot) if one was already published.
    pub(crate) fn publish_weather(&mut self, snapshot: WeatherSnapshot) -> bool {
        if self.weather.is_some() {
            return false;
        }
        self.weather = Some(snapshot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherCondition;

    #[test]
    fn test_no_weather_uses_conservative_flags() {
        let state = EnvironmentState::new(false);
        assert!(state.weather().is_none());
        assert!(!state.is_raining());
        assert!(state.show_clouds());
        assert!(!state.rain_gate());
    }

    #[test]
    fn test_rain_at_night_opens_gate() {
        let mut state = EnvironmentState::new(false);
        assert!(state.publish_weather(WeatherSnapshot::new(WeatherCondition::Rain)));
        assert!(state.is_raining());
        assert!(state.show_clouds());
        assert!(state.rain_gate());
    }

    #[test]
    fn test_rain_during_day_keeps_gate_closed() {
        let mut state = EnvironmentState::new(true);
        state.publish_weather(WeatherSnapshot::new(WeatherCondition::Rain));
        assert!(state.is_raining());
        assert!(!state.rain_gate());
    }

    #[test]
    fn test_clear_sky_hides_clouds() {
        let mut state = EnvironmentState::new(true);
        state.publish_weather(WeatherSnapshot::new(WeatherCondition::Clear));
        assert!(!state.show_clouds());
        assert!(!state.is_raining());
    }

    #[test]
    fn test_other_condition_shows_clouds_without_rain() {
        let mut state = EnvironmentState::new(true);
        state.publish_weather(WeatherSnapshot::new(WeatherCondition::Other));
        assert!(state.show_clouds());
        assert!(!state.is_raining());
    }

    #[test]
    fn test_weather_is_published_once() {
        let mut state = EnvironmentState::new(true);
        assert!(state.publish_weather(WeatherSnapshot::new(WeatherCondition::Clear)));
        assert!(!state.publish_weather(WeatherSnapshot::new(WeatherCondition::Rain)));
        assert_eq!(
            state.weather().map(|w| w.condition),
            Some(WeatherCondition::Clear)
        );
    }

    #[test]
    fn test_set_is_day_reports_changes_only() {
        let mut state = EnvironmentState::new(true);
        assert!(!state.set_is_day(true));
        assert!(state.set_is_day(false));
        assert!(!state.set_is_day(false));
        assert!(!state.is_day());
    }
}
