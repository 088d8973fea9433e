//! Built-in layouts.
//!
//! A layout is a set of [`Layer`]s covering the full 12x7 matrix: rows 0..6
//! are the directly wired half, rows 6..12 the half behind the port
//! expander. Positions that have no switch are `NotWired` on every layer.
//!
//! [`Layer`]: crate::keymap::Layer

pub mod qwerty;

pub use qwerty::{NUM_LAYER, get_default_keymap};

/// Index of the held symbol/function layer
pub const FN_LAYER: u8 = 1;
/// Index of the toggled numpad layer
pub const NUMPAD_LAYER: u8 = 2;
