//! Stack of momentary/toggled layer activations.
//!
//! The base layer (layer 0) is always active and is not stored in the stack:
//! `peek` synthesizes it one slot below the deepest stored activation. Every
//! stored activation is tagged with the id of its requester, so two keys
//! holding the same layer can release in any order and each pop removes only
//! its own activation.

use heapless::Vec;

/// Identifies who pushed a layer activation.
///
/// Activations from held keys derive their id from the key's matrix position;
/// id 0 is reserved for the base layer and is never pushed or popped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivationId(u8);

impl ActivationId {
    /// Reserved id of the implicit base-layer activation
    pub const BASE: Self = Self(0);

    /// Id derived from a physical key position
    pub const fn from_position(row: u8, col: u8, cols: u8) -> Self {
        Self(row * cols + col + 1)
    }
}

/// One stored layer activation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerActivation {
    pub layer: u8,
    pub id: ActivationId,
}

/// Error returned when a push would exceed the stack capacity.
/// The stack is left unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerStackFull;

#[derive(Debug)]
pub struct LayerStack<const DEPTH: usize> {
    entries: Vec<LayerActivation, DEPTH>,
}

impl<const DEPTH: usize> Default for LayerStack<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> LayerStack<DEPTH> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Layer at `offset` slots below the top of the stack.
    ///
    /// `offset == 0` is the most recent activation. One slot below the
    /// deepest stored activation sits the implicit base layer; anything
    /// beyond that is `None`.
    pub fn peek(&self, offset: usize) -> Option<u8> {
        let len = self.entries.len();
        if offset < len {
            Some(self.entries[len - 1 - offset].layer)
        } else if offset == len {
            Some(0)
        } else {
            None
        }
    }

    /// Push an activation on top of the stack
    pub fn push(&mut self, layer: u8, id: ActivationId) -> Result<(), LayerStackFull> {
        self.entries
            .push(LayerActivation { layer, id })
            .map_err(|_| LayerStackFull)
    }

    /// Remove the topmost activation tagged with `id`, wherever it sits in
    /// the stack. Activations above it shift down one slot. Returns the layer
    /// of the removed activation, `None` if no activation carries this id.
    pub fn pop_by_id(&mut self, id: ActivationId) -> Option<u8> {
        if id == ActivationId::BASE {
            return None;
        }
        let idx = self.entries.iter().rposition(|a| a.id == id)?;
        Some(self.entries.remove(idx).layer)
    }

    /// `true` if some stored activation carries this id
    pub fn contains_id(&self, id: ActivationId) -> bool {
        self.entries.iter().any(|a| a.id == id)
    }

    /// Number of stored activations, base layer excluded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
