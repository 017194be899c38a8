//! Ambient track controller.
//!
//! Keeps one looping ambient track in step with the day/night flag:
//!
//! - On a [`DayNightChanged`] edge: pause, swap the source to the other
//!   track, then try to play again after a short settle delay. Calling play
//!   in the same frame as the source swap is unreliable on some backends.
//! - On startup and on the first pointer press ([`PointerUnlock`]): try to
//!   play once.
//!
//! Browsers refuse playback until the user has interacted with the page, so
//! no play attempt is made before the first pointer press there. Desktop
//! builds start unlocked. A rejected play is expected and swallowed; it is
//! retried only by the next edge or interaction, never in a loop.
//!
//! The playback primitive is abstracted behind [`PlaybackSink`], so the
//! controller runs the same against `bevy_audio` and against a recording sink
//! in tests.

use std::marker::PhantomData;
use std::time::Duration;

use bevy::prelude::*;

use crate::config::{IslandConfig, AUDIO_SETTLE_DELAY_MS};
use crate::environment::{DayNightChanged, EnvironmentState};
use crate::SimulationUpdateSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbientTrack {
    Day,
    Night,
}

impl AmbientTrack {
    pub fn for_is_day(is_day: bool) -> Self {
        if is_day {
            AmbientTrack::Day
        } else {
            AmbientTrack::Night
        }
    }

    /// Asset path relative to the `assets/` directory.
    pub fn asset_path(self) -> &'static str {
        match self {
            AmbientTrack::Day => "sound/ambient-day.ogg",
            AmbientTrack::Night => "sound/ambient-night.ogg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AmbientTrack::Day => "Day Track",
            AmbientTrack::Night => "Night Track",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Stopped,
}

/// A play call the backend refused (autoplay policy, source not ready, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);

/// The audio element the controller drives.
pub trait PlaybackSink {
    fn set_source(&mut self, track: AmbientTrack);
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
}

/// First pointer press anywhere in the window.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct PointerUnlock;

#[derive(Resource, Debug, Clone)]
pub struct AmbientAudioController {
    active_track: AmbientTrack,
    unlocked: bool,
    status: PlaybackStatus,
    interaction_seen: bool,
    /// Settle delay before resuming after a source swap.
    resume: Option<Timer>,
}

impl FromWorld for AmbientAudioController {
    fn from_world(world: &mut World) -> Self {
        let is_day = world
            .get_resource::<EnvironmentState>()
            .map_or(true, EnvironmentState::is_day);
        let requires_gesture = world
            .get_resource::<IslandConfig>()
            .map_or(cfg!(target_arch = "wasm32"), |c| c.autoplay_requires_gesture);
        Self::new(AmbientTrack::for_is_day(is_day), !requires_gesture)
    }
}

impl AmbientAudioController {
    pub fn new(track: AmbientTrack, unlocked: bool) -> Self {
        Self {
            active_track: track,
            unlocked,
            status: PlaybackStatus::Stopped,
            interaction_seen: false,
            resume: None,
        }
    }

    pub fn active_track(&self) -> AmbientTrack {
        self.active_track
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn resume_pending(&self) -> bool {
        self.resume.is_some()
    }

    /// Load the initial track and make the startup play attempt.
    pub fn start(&mut self, sink: &mut impl PlaybackSink) {
        sink.set_source(self.active_track);
        self.try_play(sink);
    }

    /// First pointer press: unlocks playback for good and tries once.
    /// Later presses are ignored. While a source swap is still settling the
    /// attempt is left to the resume timer.
    pub fn on_pointer_down(&mut self, sink: &mut impl PlaybackSink) {
        if self.interaction_seen {
            return;
        }
        self.interaction_seen = true;
        if !self.unlocked {
            info!("Audio unlocked by first interaction");
        }
        self.unlocked = true;
        if self.resume_pending() {
            return;
        }
        self.try_play(sink);
    }

    /// Day/night edge: stop, swap, and schedule the resume.
    pub fn on_day_night_edge(&mut self, is_day: bool, sink: &mut impl PlaybackSink) {
        let track = AmbientTrack::for_is_day(is_day);
        sink.pause();
        self.status = PlaybackStatus::Stopped;
        self.active_track = track;
        sink.set_source(track);
        self.resume = Some(Timer::new(
            Duration::from_millis(AUDIO_SETTLE_DELAY_MS),
            TimerMode::Once,
        ));
    }

    /// Advance the settle timer; plays once it runs out.
    pub fn tick(&mut self, delta: Duration, sink: &mut impl PlaybackSink) {
        let Some(timer) = self.resume.as_mut() else {
            return;
        };
        timer.tick(delta);
        if timer.finished() {
            self.resume = None;
            self.try_play(sink);
        }
    }

    fn try_play(&mut self, sink: &mut impl PlaybackSink) {
        if !self.unlocked {
            debug!("Ambient playback waits for the first interaction");
            return;
        }
        if self.status == PlaybackStatus::Playing {
            return;
        }
        match sink.play() {
            Ok(()) => {
                self.status = PlaybackStatus::Playing;
                debug!("Playing {}", self.active_track.label());
            }
            Err(e) => {
                self.status = PlaybackStatus::Stopped;
                debug!("Ambient playback swallowed: {}", e);
            }
        }
    }
}

/// Startup system: initial source and the startup play attempt.
pub fn start_ambient_audio<S: PlaybackSink + Resource>(
    mut controller: ResMut<AmbientAudioController>,
    mut sink: ResMut<S>,
) {
    controller.start(sink.as_mut());
}

/// Advances the settle timer, then reacts to edges and the unlock gesture.
///
/// The timer is ticked first: this frame's delta elapsed before any edge read
/// here, so a timer armed by one of them starts counting on the next frame.
pub fn drive_ambient_audio<S: PlaybackSink + Resource>(
    time: Res<Time>,
    mut edges: EventReader<DayNightChanged>,
    mut unlocks: EventReader<PointerUnlock>,
    mut controller: ResMut<AmbientAudioController>,
    mut sink: ResMut<S>,
) {
    controller.tick(time.delta(), sink.as_mut());
    for edge in edges.read() {
        controller.on_day_night_edge(edge.is_day, sink.as_mut());
    }
    if unlocks.read().count() > 0 {
        controller.on_pointer_down(sink.as_mut());
    }
}

/// Registers the controller against sink resource `S`.
pub struct AmbientAudioPlugin<S>(PhantomData<S>);

impl<S> Default for AmbientAudioPlugin<S> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<S: PlaybackSink + Resource + FromWorld> Plugin for AmbientAudioPlugin<S> {
    fn build(&self, app: &mut App) {
        app.init_resource::<S>()
            .init_resource::<AmbientAudioController>()
            .add_event::<PointerUnlock>()
            .add_systems(Startup, start_ambient_audio::<S>)
            .add_systems(
                Update,
                drive_ambient_audio::<S>.in_set(SimulationUpdateSet::Audio),
            );
    }
}
