use serde::{Deserialize, Serialize};

/// A debounced edge at one matrix position.
///
/// `pressed == true` is a press edge, `pressed == false` a release edge.
/// Rows cover the whole keyboard: the scanning side adds its row offset
/// before the event is sent, so the processor never needs to know which
/// electrical matrix a position belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardEvent {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
}

impl KeyboardEvent {
    pub const fn key(row: u8, col: u8, pressed: bool) -> Self {
        Self { row, col, pressed }
    }
}
