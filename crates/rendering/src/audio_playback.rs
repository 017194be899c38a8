//! `bevy_audio` backend for the ambient track controller.
//!
//! [`BevyAmbientSink`] implements [`PlaybackSink`] by queueing operations;
//! [`apply_ambient_sink`] runs right after the controller and turns them
//! into one looping `AudioPlayer` entity. Until the asset has loaded there is
//! no `AudioSink` yet, so play/pause edit the entity's `PlaybackSettings`
//! instead and the sink is created in the requested state.

use bevy::audio::{AudioPlayer, AudioSink, AudioSinkPlayback, PlaybackSettings};
use bevy::prelude::*;

use simulation::ambient_audio::{
    AmbientAudioPlugin, AmbientTrack, PlaybackRejected, PlaybackSink,
};
use simulation::SimulationUpdateSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Load(AmbientTrack),
    Play,
    Pause,
}

#[derive(Resource, Debug, Default)]
pub struct BevyAmbientSink {
    track: Option<AmbientTrack>,
    player: Option<Entity>,
    pending: Vec<SinkOp>,
}

impl BevyAmbientSink {
    pub fn track(&self) -> Option<AmbientTrack> {
        self.track
    }

    pub fn pending(&self) -> &[SinkOp] {
        &self.pending
    }
}

impl PlaybackSink for BevyAmbientSink {
    fn set_source(&mut self, track: AmbientTrack) {
        self.track = Some(track);
        self.pending.push(SinkOp::Load(track));
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.track.is_none() {
            return Err(PlaybackRejected("no track loaded".to_string()));
        }
        self.pending.push(SinkOp::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.pending.push(SinkOp::Pause);
    }
}

/// Marker for the entity playing the ambient track.
#[derive(Component)]
pub struct AmbientPlayer;

pub fn apply_ambient_sink(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut sink: ResMut<BevyAmbientSink>,
    mut players: Query<(Option<&AudioSink>, &mut PlaybackSettings), With<AmbientPlayer>>,
) {
    if sink.pending.is_empty() {
        return;
    }
    let ops = std::mem::take(&mut sink.pending);
    for op in ops {
        match op {
            SinkOp::Load(track) => {
                if let Some(old) = sink.player.take() {
                    commands.entity(old).despawn();
                }
                let player = commands
                    .spawn((
                        AmbientPlayer,
                        AudioPlayer::new(asset_server.load(track.asset_path())),
                        PlaybackSettings::LOOP.paused(),
                    ))
                    .id();
                sink.player = Some(player);
                debug!("Ambient source set to {}", track.label());
            }
            SinkOp::Play | SinkOp::Pause => {
                let Some(player) = sink.player else {
                    continue;
                };
                let play = op == SinkOp::Play;
                match players.get_mut(player) {
                    Ok((Some(audio), _)) => {
                        if play {
                            audio.play();
                        } else {
                            audio.pause();
                        }
                    }
                    Ok((None, mut settings)) => settings.paused = !play,
                    // Spawned by an earlier op in this batch.
                    Err(_) => {
                        let settings = if play {
                            PlaybackSettings::LOOP
                        } else {
                            PlaybackSettings::LOOP.paused()
                        };
                        commands.entity(player).insert(settings);
                    }
                }
            }
        }
    }
}

pub struct AmbientAudioBackendPlugin;

impl Plugin for AmbientAudioBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AmbientAudioPlugin::<BevyAmbientSink>::default())
            .add_systems(PostStartup, apply_ambient_sink)
            .add_systems(
                Update,
                apply_ambient_sink.after(SimulationUpdateSet::Audio),
            );
    }
}
