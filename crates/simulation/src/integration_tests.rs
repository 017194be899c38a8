//! Integration tests for the island using the `TestIsland` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and the
//! ambient audio controller, and verify behavior across the clock sampler,
//! weather poll, rain gate, orbital motion and audio working together.

use std::time::Duration;

use bevy::prelude::*;

use crate::ambient_audio::{AmbientTrack, PlaybackStatus};
use crate::config::IslandConfig;
use crate::orbit::{OrbitalParams, Orbiter};
use crate::test_harness::{SinkCall, TestIsland};
use crate::weather::{WeatherCondition, WeatherError, WeatherQuery, WeatherSnapshot};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn rain() -> WeatherSnapshot {
    WeatherSnapshot::new(WeatherCondition::Rain)
}

// ===========================================================================
// 1. Startup
// ===========================================================================

#[test]
fn noon_starts_as_day_without_edges() {
    let island = TestIsland::at_hour(12);
    assert!(island.env().is_day());
    assert!(island.edges().is_empty());
}

#[test]
fn late_evening_starts_as_night() {
    let island = TestIsland::at_hour(22);
    assert!(!island.env().is_day());
    assert_eq!(island.audio().active_track(), AmbientTrack::Night);
}

#[test]
fn no_api_key_skips_the_weather_query() {
    let island = TestIsland::new();
    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Failed);
    assert!(island.env().weather().is_none());
    assert!(island.env().show_clouds());
    assert!(!island.env().is_raining());
}

// ===========================================================================
// 2. Day/night sampling
// ===========================================================================

#[test]
fn day_night_edge_fires_once_per_transition() {
    let mut island = TestIsland::at_hour(12);
    island.set_hour(20);

    island.advance(secs(30));
    assert!(island.env().is_day(), "sampled before the 60 s period");
    assert!(island.edges().is_empty());

    island.advance(secs(31));
    assert!(!island.env().is_day());
    assert_eq!(island.edges(), &[false]);

    // Three more samples of the same value: no new edges.
    island.advance(secs(180));
    assert_eq!(island.edges(), &[false]);

    island.set_hour(8);
    island.advance(secs(61));
    assert!(island.env().is_day());
    assert_eq!(island.edges(), &[false, true]);
}

#[test]
fn manual_toggle_flips_until_next_sample() {
    let mut island = TestIsland::at_hour(12);
    island.toggle_day_night();
    island.update();
    assert!(!island.env().is_day());
    assert_eq!(island.edges(), &[false]);

    // The wall clock still says noon; the next sample restores day.
    island.advance(secs(61));
    assert!(island.env().is_day());
    assert_eq!(island.edges(), &[false, true]);
}

// ===========================================================================
// 3. Weather
// ===========================================================================

fn keyed(fixed_location: Option<(f64, f64)>) -> IslandConfig {
    IslandConfig {
        weather_api_key: Some("test-key".to_string()),
        fixed_location,
        ..Default::default()
    }
}

#[test]
fn missing_location_skips_the_query() {
    let mut island = TestIsland::with_config(22, keyed(None));
    island.update();

    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Failed);
    assert!(island.env().weather().is_none());
    assert!(island.env().show_clouds());
    assert!(!island.env().is_raining());
    assert!(island.rain().is_none());
}

#[test]
fn located_query_fetches_then_publishes() {
    let mut island = TestIsland::with_config(22, keyed(Some((32.08, 34.78))));
    island.update();
    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Fetching);
    assert!(island.env().weather().is_none());

    island.frames(5);
    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Fetching);

    island.deliver_weather(Ok(rain()));
    island.update();
    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Resolved);
    assert!(island.env().is_raining());
    assert!(island.rain().is_some());
}

#[test]
fn failed_weather_query_leaves_conservative_defaults() {
    let mut island = TestIsland::at_hour(22);
    island.inject_weather(Err(WeatherError::Status(401)));
    island.update();

    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Failed);
    assert!(island.env().weather().is_none());
    assert!(!island.env().is_raining());
    assert!(island.env().show_clouds());
    assert!(island.rain().is_none());
}

#[test]
fn clear_sky_hides_clouds() {
    let mut island = TestIsland::at_hour(12);
    island.inject_weather(Ok(WeatherSnapshot::new(WeatherCondition::Clear)));
    island.update();

    assert_eq!(*island.resource::<WeatherQuery>(), WeatherQuery::Resolved);
    assert!(!island.env().show_clouds());
    assert!(!island.env().is_raining());
}

#[test]
fn weather_is_published_only_once() {
    let mut island = TestIsland::at_hour(12);
    island.inject_weather(Ok(WeatherSnapshot::new(WeatherCondition::Clear)));
    island.update();
    island.inject_weather(Ok(rain()));
    island.update();

    let condition = island.env().weather().map(|w| w.condition);
    assert_eq!(condition, Some(WeatherCondition::Clear));
}

// ===========================================================================
// 4. Rain gate
// ===========================================================================

#[test]
fn rain_at_night_creates_the_simulator() {
    let mut island = TestIsland::at_hour(22);
    assert!(island.rain().is_none());

    island.inject_weather(Ok(rain()));
    island.update();

    let sim = island.rain().expect("rain simulator after rainy night");
    assert_eq!(sim.count(), 8000);
}

#[test]
fn rain_during_day_creates_nothing() {
    let mut island = TestIsland::at_hour(12);
    island.inject_weather(Ok(rain()));
    island.frames(10);
    assert!(island.env().is_raining());
    assert!(island.rain().is_none());
}

#[test]
fn rain_stops_at_daybreak_and_returns_at_dusk() {
    let mut island = TestIsland::at_hour(22);
    island.inject_weather(Ok(rain()));
    island.update();
    assert!(island.rain().is_some());

    island.set_hour(7);
    island.advance(secs(61));
    assert!(island.env().is_day());
    assert!(island.rain().is_none());

    island.set_hour(19);
    island.advance(secs(61));
    assert!(island.rain().is_some());
}

#[test]
fn rain_falls_every_frame() {
    let mut island = TestIsland::at_hour(3);
    island.inject_weather(Ok(rain()));
    island.update();
    let before = island.rain().map(|r| r.positions().to_vec());

    island.update();
    let after = island.rain().map(|r| r.positions().to_vec());
    assert_ne!(before, after);
}

#[test]
fn same_seed_gives_same_curtain() {
    let config = IslandConfig {
        seed: 7,
        ..Default::default()
    };
    let mut a = TestIsland::with_config(23, config.clone());
    let mut b = TestIsland::with_config(23, config);
    for island in [&mut a, &mut b] {
        island.inject_weather(Ok(rain()));
        island.frames(5);
    }
    assert_eq!(
        a.rain().map(|r| r.positions().to_vec()),
        b.rain().map(|r| r.positions().to_vec())
    );
}

// ===========================================================================
// 5. Orbital motion
// ===========================================================================

#[test]
fn orbiter_follows_its_path() {
    let mut island = TestIsland::new();
    let params = OrbitalParams::scene();
    let plane = island
        .world_mut()
        .spawn((Orbiter(params), Transform::default()))
        .id();

    island.frames(90);

    let elapsed = island.elapsed_secs() as f32;
    let expected = params.pose_at(elapsed);
    let transform = *island
        .world_mut()
        .get::<Transform>(plane)
        .expect("orbiter transform");
    assert!(
        (transform.translation - expected.position).length() < 1e-3,
        "got {:?}, expected {:?}",
        transform.translation,
        expected.position
    );
    assert_eq!(transform.translation.y, params.height);
}

// ===========================================================================
// 6. Ambient audio
// ===========================================================================

#[test]
fn unlocked_audio_plays_at_startup() {
    let island = TestIsland::at_hour(12);
    assert_eq!(
        island.sink().calls,
        vec![SinkCall::Source(AmbientTrack::Day), SinkCall::Play]
    );
    assert_eq!(island.audio().status(), PlaybackStatus::Playing);
}

#[test]
fn no_playback_before_first_interaction() {
    let config = IslandConfig {
        autoplay_requires_gesture: true,
        ..Default::default()
    };
    let mut island = TestIsland::with_config(12, config);
    island.set_hour(21);
    island.advance(secs(61));
    island.frames(20);

    assert_eq!(island.edges(), &[false]);
    assert_eq!(island.sink().play_count(), 0);
    assert_eq!(island.sink().current_source(), Some(AmbientTrack::Night));

    island.pointer_down();
    island.update();
    assert_eq!(island.sink().play_count(), 1);

    island.pointer_down();
    island.update();
    assert_eq!(island.sink().play_count(), 1);
}

#[test]
fn edge_swaps_track_and_resumes() {
    let mut island = TestIsland::at_hour(12);
    island.sink_mut().calls.clear();

    island.set_hour(20);
    island.advance(secs(61));
    island.frames(10);

    assert_eq!(
        island.sink().calls,
        vec![
            SinkCall::Pause,
            SinkCall::Source(AmbientTrack::Night),
            SinkCall::Play
        ]
    );
    assert_eq!(island.audio().active_track(), AmbientTrack::Night);
}

#[test]
fn long_frames_never_play_in_the_swap_frame() {
    let mut island = TestIsland::at_hour(12);
    island.set_hour(20);
    island.sink_mut().calls.clear();

    let frame = Duration::from_millis(200);
    let mut guard = 0;
    while island.edges().is_empty() {
        island.step(frame);
        guard += 1;
        assert!(guard < 1000, "no day/night edge after {} frames", guard);
    }
    assert_eq!(
        island.sink().calls,
        vec![SinkCall::Pause, SinkCall::Source(AmbientTrack::Night)]
    );
    assert!(island.audio().resume_pending());

    island.step(frame);
    assert_eq!(island.sink().calls.last(), Some(&SinkCall::Play));
    assert_eq!(island.sink().play_count(), 1);
}

#[test]
fn unlock_in_the_swap_frame_waits_for_the_settle_delay() {
    let config = IslandConfig {
        autoplay_requires_gesture: true,
        ..Default::default()
    };
    let mut island = TestIsland::with_config(12, config);
    island.toggle_day_night();
    island.pointer_down();
    island.step(Duration::from_millis(200));
    assert_eq!(island.edges(), &[false]);
    assert_eq!(island.sink().play_count(), 0);

    island.step(Duration::from_millis(200));
    assert_eq!(island.sink().play_count(), 1);
    assert_eq!(island.audio().status(), PlaybackStatus::Playing);
}

#[test]
fn rejected_playback_is_not_retried_every_frame() {
    let mut island = TestIsland::at_hour(12);
    island.sink_mut().reject = true;
    island.toggle_day_night();
    island.frames(60);

    assert_eq!(island.sink().play_count(), 2, "startup + one after the swap");
    assert_eq!(island.audio().status(), PlaybackStatus::Stopped);
}
