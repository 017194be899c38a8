//! Wall-clock day/night sampler.
//!
//! Reads the local hour on a coarse 60 s timer (independent of the frame
//! rate) and overwrites `EnvironmentState::is_day`. A flip of the value emits
//! one [`DayNightChanged`] edge event; repeated samples of the same value emit
//! nothing.
//!
//! The island also has a manual toggle ([`ToggleDayNight`]). It is applied by
//! the same system so `is_day` keeps a single writer, and like any other value
//! it is overwritten by the next periodic sample.

use bevy::prelude::*;
use chrono::Timelike;

use crate::config::{CLOCK_SAMPLE_PERIOD_SECS, DAY_END_HOUR, DAY_START_HOUR};
use crate::environment::{DayNightChanged, EnvironmentState};
use crate::SimulationUpdateSet;

/// `true` for hours in `[6, 18)`.
pub fn is_day_hour(hour: u32) -> bool {
    (DAY_START_HOUR..DAY_END_HOUR).contains(&hour)
}

/// Day/night flag for a wall-clock timestamp, using its local hour.
pub fn sample_is_day<T: Timelike>(now: &T) -> bool {
    is_day_hour(now.hour())
}

/// Where the sampler gets the current hour from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockSource {
    /// The machine's local time zone.
    #[default]
    Local,
    /// A fixed hour of day, for tests and demos.
    Fixed(u32),
}

/// The time source read by the sampler.
#[derive(Resource, Debug, Clone, Default)]
pub struct WallClock {
    source: ClockSource,
}

impl WallClock {
    pub fn local() -> Self {
        Self {
            source: ClockSource::Local,
        }
    }

    pub fn fixed(hour: u32) -> Self {
        Self {
            source: ClockSource::Fixed(hour % 24),
        }
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// Pin the clock to `hour`. Takes effect on the next sample.
    pub fn set_fixed_hour(&mut self, hour: u32) {
        self.source = ClockSource::Fixed(hour % 24);
    }

    pub fn hour_now(&self) -> u32 {
        match self.source {
            ClockSource::Local => chrono::Local::now().hour(),
            ClockSource::Fixed(hour) => hour,
        }
    }

    pub fn is_day_now(&self) -> bool {
        match self.source {
            ClockSource::Local => sample_is_day(&chrono::Local::now()),
            ClockSource::Fixed(hour) => is_day_hour(hour),
        }
    }
}

/// Request to flip day/night by hand (the UI sun/moon button).
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleDayNight;

/// Fires every `CLOCK_SAMPLE_PERIOD_SECS`.
#[derive(Resource)]
pub struct ClockSampleTimer(pub Timer);

impl Default for ClockSampleTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            CLOCK_SAMPLE_PERIOD_SECS,
            TimerMode::Repeating,
        ))
    }
}

/// Sole writer of `EnvironmentState::is_day`.
///
/// Applies pending manual toggles first, then takes a wall-clock sample if
/// the timer elapsed this frame.
pub fn update_day_night(
    time: Res<Time>,
    clock: Res<WallClock>,
    mut timer: ResMut<ClockSampleTimer>,
    mut toggles: EventReader<ToggleDayNight>,
    mut env: ResMut<EnvironmentState>,
    mut edges: EventWriter<DayNightChanged>,
) {
    for _ in toggles.read() {
        let flipped = !env.is_day();
        env.set_is_day(flipped);
        info!("Day/night toggled by hand: is_day={}", flipped);
        edges.send(DayNightChanged { is_day: flipped });
    }

    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let is_day = clock.is_day_now();
    if env.set_is_day(is_day) {
        info!(
            "Day/night changed at {:02}:00 local: is_day={}",
            clock.hour_now(),
            is_day
        );
        edges.send(DayNightChanged { is_day });
    }
}

pub struct ClockSamplerPlugin;

impl Plugin for ClockSamplerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WallClock>()
            .init_resource::<ClockSampleTimer>()
            .add_event::<ToggleDayNight>()
            .add_event::<DayNightChanged>()
            .add_systems(
                Update,
                update_day_night.in_set(SimulationUpdateSet::Environment),
            );
    }
}
