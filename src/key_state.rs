//! Edge-triggered key state machine
//!
//! Tracks the pressed/released state of every mapped key code and emits a
//! press or release only when the desired state differs from the current
//! one. State and sink live behind a single mutex so emission order always
//! matches state transitions, whichever thread drives them.

use std::collections::HashMap;

use evdev::Key;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::intent::{Input, IntentSet};
use crate::keyboard::{KeyboardError, KeySink};
use crate::keymap::{key_name, KeyMapping};

struct Inner<S> {
    /// One entry per mapped key code, `true` = pressed
    pressed: HashMap<Key, bool>,
    sink: S,
}

/// Owner of all key state and the only emitter of key events
pub struct KeyStateMachine<S: KeySink> {
    mapping: KeyMapping,
    inner: Mutex<Inner<S>>,
}

impl<S: KeySink> KeyStateMachine<S> {
    /// Create a state machine with every mapped key released
    pub fn new(mapping: KeyMapping, sink: S) -> Self {
        let pressed = mapping.keys().map(|key| (key, false)).collect();
        Self {
            mapping,
            inner: Mutex::new(Inner { pressed, sink }),
        }
    }

    pub fn mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    /// Drive one logical input towards its desired state
    ///
    /// Returns `Ok(true)` if a press or release was emitted. Unmapped inputs
    /// are ignored. On a sink error the key's state is left unchanged.
    pub fn apply_intent(&self, input: Input, desired: bool) -> Result<bool, KeyboardError> {
        let Some(key) = self.mapping.key_for(input) else {
            return Ok(false);
        };

        let mut inner = self.inner.lock();
        let Inner { pressed, sink } = &mut *inner;
        let current = pressed.entry(key).or_insert(false);

        match (desired, *current) {
            (true, false) => {
                sink.press(key)?;
                debug!("Pressing {} ({})", key_name(key), input);
                *current = true;
                Ok(true)
            }
            (false, true) => {
                sink.release(key)?;
                debug!("Releasing {} ({})", key_name(key), input);
                *current = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Apply a whole intent set, returning the number of events emitted
    ///
    /// A failing key is logged and skipped; the remaining intents still apply.
    pub fn apply(&self, intents: &IntentSet) -> usize {
        let mut emitted = 0;
        for (input, desired) in intents.iter() {
            match self.apply_intent(input, desired) {
                Ok(true) => emitted += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to update {}: {}", input, e),
            }
        }
        emitted
    }

    /// Release every pressed key
    ///
    /// Returns the number of releases emitted. Keys whose release fails stay
    /// pressed; the rest are still released and the first error is returned.
    pub fn release_all(&self) -> Result<usize, KeyboardError> {
        let mut inner = self.inner.lock();
        let Inner { pressed, sink } = &mut *inner;

        let mut released = 0;
        let mut first_err = None;
        for (&key, state) in pressed.iter_mut().filter(|(_, state)| **state) {
            match sink.release(key) {
                Ok(()) => {
                    debug!("Released {}", key_name(key));
                    *state = false;
                    released += 1;
                }
                Err(e) => {
                    warn!("Failed to release {}: {}", key_name(key), e);
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(released),
        }
    }

    /// Whether `key` is currently held
    pub fn is_pressed(&self, key: Key) -> bool {
        self.inner.lock().pressed.get(&key).copied().unwrap_or(false)
    }

    /// All currently held keys
    pub fn pressed_keys(&self) -> Vec<Key> {
        self.inner
            .lock()
            .pressed
            .iter()
            .filter(|(_, &state)| state)
            .map(|(&key, _)| key)
            .collect()
    }

    pub fn pressed_count(&self) -> usize {
        self.inner.lock().pressed.values().filter(|&&s| s).count()
    }

    /// Number of tracked key codes
    pub fn tracked_keys(&self) -> usize {
        self.inner.lock().pressed.len()
    }
}
