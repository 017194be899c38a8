use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use simulation::ambient_audio::PointerUnlock;

/// Emits [`PointerUnlock`] on the first mouse press or touch anywhere in the
/// window, then stays quiet.
pub fn emit_pointer_unlock(
    buttons: Res<ButtonInput<MouseButton>>,
    mut touches: EventReader<TouchInput>,
    mut sent: Local<bool>,
    mut unlocks: EventWriter<PointerUnlock>,
) {
    let touched = touches
        .read()
        .any(|touch| touch.phase == TouchPhase::Started);
    if *sent {
        return;
    }
    if touched || buttons.get_just_pressed().next().is_some() {
        *sent = true;
        debug!("First interaction received");
        unlocks.send(PointerUnlock);
    }
}
