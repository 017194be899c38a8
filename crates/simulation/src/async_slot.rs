//! Single-value hand-off from an out-of-band task to the ECS world.
//!
//! Background work (a blocking HTTP call on a worker thread, a browser
//! promise, a geolocation callback) fills the slot once; a per-frame poll
//! system drains it. The render path never waits on the slot.

use std::sync::{Arc, Mutex};

/// Shared slot holding at most one pending value.
#[derive(Debug)]
pub struct AsyncSlot<T>(Arc<Mutex<Option<T>>>);

impl<T> Clone for AsyncSlot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for AsyncSlot<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }
}

impl<T> AsyncSlot<T> {
    /// Store `value`, replacing anything not yet taken.
    pub fn fill(&self, value: T) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = Some(value);
        }
    }

    /// Remove and return the value, if one has arrived.
    ///
    /// A poisoned lock reads as "nothing yet".
    pub fn take(&self) -> Option<T> {
        self.0.lock().ok().and_then(|mut guard| guard.take())
    }
}
