//! Runtime behavior configuration for the keyboard task.

use crate::keyboard_macro::MacroOperation;

/// Config for mouse keys
#[derive(Clone, Copy, Debug)]
pub struct MouseKeyConfig {
    /// Cursor movement per report while a direction key is held
    pub move_delta: i8,
    /// Wheel detents per report while a wheel key is held
    pub wheel_delta: i8,
}

impl Default for MouseKeyConfig {
    fn default() -> Self {
        Self {
            move_delta: 8,
            wheel_delta: 1,
        }
    }
}

/// Stored macro sequences, referenced by index from `Action::Macro`
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroConfig {
    pub sequences: &'static [&'static [MacroOperation]],
}

/// Config for the keyboard task's behaviors
#[derive(Clone, Copy, Debug, Default)]
pub struct BehaviorConfig {
    pub mouse: MouseKeyConfig,
    pub keyboard_macros: MacroConfig,
}
