//! Stored keyboard macros.
//!
//! A macro is a static sequence of operations replayed by the keyboard task
//! when its `Action::Macro` key is pressed. Playback is synchronous with
//! respect to the event queue: no other key event is processed until the
//! sequence has finished.

use crate::keycode::KeyCode;

/// One step of a macro sequence
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroOperation {
    /// Register the key without releasing it
    Press(KeyCode),
    /// Release a previously pressed key
    Release(KeyCode),
    /// Press and release the key
    Tap(KeyCode),
    /// Pause playback for the given number of milliseconds
    Delay(u16),
}
