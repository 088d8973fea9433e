#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// Re-exports used by the `run_devices!` macro
pub use {embassy_futures, futures};

#[macro_use]
mod fmt;

pub mod action;
pub mod channel;
pub mod config;
pub mod debounce;
pub mod event;
pub mod hid;
pub mod input_device;
pub mod keyboard;
pub mod keyboard_macro;
pub mod keycode;
pub mod keymap;
pub mod layer_stack;
pub mod layout;
#[macro_use]
pub mod layout_macro;
pub mod matrix;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// RawMutex used by the engine's static channels
pub type RawMutex = CriticalSectionRawMutex;

/// Number of rows of the full (two-handed) key matrix.
/// Rows 0..6 are scanned by the controller itself, rows 6..12 by the
/// I2C-attached port expander on the other half.
pub const MATRIX_ROWS: usize = 12;
/// Number of columns of the full key matrix
pub const MATRIX_COLS: usize = 7;
/// Rows scanned directly via GPIO
pub const LOCAL_MATRIX_ROWS: usize = 6;
/// Rows scanned through the I2C port expander
pub const EXPANDER_MATRIX_ROWS: usize = 6;
/// Row index at which the expander's sub-matrix starts
pub const EXPANDER_ROW_OFFSET: usize = LOCAL_MATRIX_ROWS;

/// Debounce window in ms
pub const DEBOUNCE_THRESHOLD: u16 = 5;

/// Maximum number of layer activations on the stack, excluding the base
/// layer (which is always active and not stored)
pub const LAYER_STACK_DEPTH: usize = 20;

/// Size of the key event channel
pub const EVENT_CHANNEL_SIZE: usize = 16;
/// Size of the HID report channel
pub const REPORT_CHANNEL_SIZE: usize = 16;

// Engine constants are compile-time configuration: invalid values must fail
// the build, not the running firmware.
const _: () = {
    assert!(DEBOUNCE_THRESHOLD > 0);
    assert!(LAYER_STACK_DEPTH > 0);
    assert!(MATRIX_ROWS > 0 && MATRIX_COLS > 0);
    assert!(LOCAL_MATRIX_ROWS + EXPANDER_MATRIX_ROWS == MATRIX_ROWS);
};
