//! Playback sink that records calls instead of producing sound.

use bevy::prelude::*;

use crate::ambient_audio::{AmbientTrack, PlaybackRejected, PlaybackSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    Source(AmbientTrack),
    Play,
    Pause,
}

#[derive(Resource, Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    /// Refuse every play call, like a browser before any gesture.
    pub reject: bool,
}

impl RecordingSink {
    pub fn play_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == SinkCall::Play).count()
    }

    /// The source most recently loaded.
    pub fn current_source(&self) -> Option<AmbientTrack> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::Source(track) => Some(*track),
            _ => None,
        })
    }
}

impl PlaybackSink for RecordingSink {
    fn set_source(&mut self, track: AmbientTrack) {
        self.calls.push(SinkCall::Source(track));
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.calls.push(SinkCall::Play);
        if self.reject {
            return Err(PlaybackRejected("rejected by test sink".to_string()));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(SinkCall::Pause);
    }
}
