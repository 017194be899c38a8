//! Per-frame ordering via `SystemSet` phases.
//!
//! Everything in the island runs in the `Update` schedule, once per rendered
//! frame. The phases make the read/write contract on `EnvironmentState`
//! explicit:
//!
//! ```text
//! Input  →  Environment  →  Frame  →  Audio
//! ```
//!
//! * **Input** – pointer unlock detection, manual day/night toggles.
//! * **Environment** – the only writers of `EnvironmentState`: the clock
//!   sampler (`is_day`) and the weather poll (`weather`). Each writes a
//!   disjoint field.
//! * **Frame** – per-frame animation: rain gate, rain step, orbital motion.
//!   Only reads `EnvironmentState`.
//! * **Audio** – reacts to the edge events emitted during `Environment`.

use bevy::prelude::*;

/// Ordered phases for systems running in the `Update` schedule.
///
/// Configured as a chain: `Input` → `Environment` → `Frame` → `Audio`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationUpdateSet {
    /// User input that feeds the environment (toggle, pointer unlock).
    Input,
    /// Writers of `EnvironmentState`.
    Environment,
    /// Per-frame animation driven by the render loop.
    Frame,
    /// Playback reacting to environment transitions.
    Audio,
}

pub(crate) fn configure_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SimulationUpdateSet::Input,
            SimulationUpdateSet::Environment,
            SimulationUpdateSet::Frame,
            SimulationUpdateSet::Audio,
        )
            .chain(),
    );
}
