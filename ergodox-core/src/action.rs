use crate::keycode::{KeyCode, ModifierCombination};

/// A KeyAction is one entry of a layer's press or release table.
///
/// The two non-action variants are deliberately separate: `NotWired` marks a
/// matrix position that does not exist electrically on this keyboard, while
/// `Transparent` marks a wired position for which this layer defers to the
/// next active layer down the stack. The resolver treats both as
/// "keep walking", so a partially specified layer is always safe.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Position not present on the physical matrix
    NotWired,
    /// Defer to the next active layer down the stack
    Transparent,
    /// A concrete action
    Single(Action),
}

/// A single basic action that the keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// A normal key stroke: keyboard, consumer-control, system-control or
    /// mouse usage depending on the keycode's range
    Key(KeyCode),
    /// Key stroke with a modifier combination held around it
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer while the key is held; the activation is tagged with
    /// the physical position so that overlapping holds pop independently
    LayerMomentary(u8),
    /// Push a layer on one press, pop it again on the next press
    LayerToggle(u8),
    /// Replay the macro at the given index in the macro table
    Macro(u8),
}
