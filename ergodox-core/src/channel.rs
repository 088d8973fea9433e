//! Exposed channels which can be used to share data across tasks.
//!
//! Both matrix halves send into [`KEY_EVENT_CHANNEL`]; the keyboard task
//! receives from it one event at a time, so every layer mutation an event
//! causes is visible to the very next event in the queue.

use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel};

use crate::event::KeyboardEvent;
use crate::hid::Report;
use crate::{EVENT_CHANNEL_SIZE, REPORT_CHANNEL_SIZE, RawMutex};

/// Channel for key events from the matrix scanners
pub static KEY_EVENT_CHANNEL: Channel<RawMutex, KeyboardEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for keyboard reports from the keyboard task to the hid writer
pub static KEYBOARD_REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();
