//! Keymap storage and layer resolution.
//!
//! Each layer carries two action tables, one consulted on press edges and one
//! on release edges. Resolution walks the activation stack from the top down
//! and takes the first entry that is neither `NotWired` nor `Transparent`;
//! the implicit base layer ends the walk.

use crate::LAYER_STACK_DEPTH;
use crate::action::{Action, KeyAction};
use crate::event::KeyboardEvent;
use crate::layer_stack::{ActivationId, LayerStack};

/// One layer of the keymap: a press table and a release table over the full
/// matrix. Most layers are symmetric (same action on both edges), but the
/// tables are kept separate so a layer can bind press and release
/// differently, the way hold-style macros need.
#[derive(Debug)]
pub struct Layer<const ROW: usize, const COL: usize> {
    pub press: [[KeyAction; COL]; ROW],
    pub release: [[KeyAction; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Layer<ROW, COL> {
    pub const fn new(
        press: [[KeyAction; COL]; ROW],
        release: [[KeyAction; COL]; ROW],
    ) -> Self {
        Self { press, release }
    }

    /// Layer using the same table for both edges
    pub const fn symmetric(actions: [[KeyAction; COL]; ROW]) -> Self {
        Self { press: actions, release: actions }
    }
}

/// A resolved action together with the layer it was found on. The layer is
/// what tags the matching release of a momentary hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resolved {
    pub layer: u8,
    pub action: Action,
}

/// KeyMap of the keyboard: the layer tables plus the runtime activation
/// stack. Shared between the matrix task and the keyboard task through a
/// `RefCell`, so all methods take `&mut self`.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    layers: &'a [Layer<ROW, COL>; NUM_LAYER],
    stack: LayerStack<LAYER_STACK_DEPTH>,
    /// Number of layer pushes dropped because the stack was full
    stack_full_drops: u16,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize>
    KeyMap<'a, ROW, COL, NUM_LAYER>
{
    pub fn new(layers: &'a [Layer<ROW, COL>; NUM_LAYER]) -> Self {
        Self {
            layers,
            stack: LayerStack::new(),
            stack_full_drops: 0,
        }
    }

    /// Resolve an event against the current activation stack.
    ///
    /// Returns `None` when every active layer defers at this position, which
    /// can only happen when the base layer itself holds `NotWired` or
    /// `Transparent` there.
    pub fn resolve(&self, event: KeyboardEvent) -> Option<Resolved> {
        let (row, col) = (event.row as usize, event.col as usize);
        let mut offset = 0;
        while let Some(layer) = self.stack.peek(offset) {
            offset += 1;
            if layer as usize >= NUM_LAYER {
                error!("layer {} out of range, skipping", layer);
                continue;
            }
            let table = if event.pressed {
                &self.layers[layer as usize].press
            } else {
                &self.layers[layer as usize].release
            };
            match table[row][col] {
                KeyAction::NotWired | KeyAction::Transparent => continue,
                KeyAction::Single(action) => return Some(Resolved { layer, action }),
            }
        }
        None
    }

    /// Push a momentary activation tagged with the holding key's id.
    /// A full stack drops the push and counts the occurrence.
    pub fn activate(&mut self, layer: u8, id: ActivationId) {
        if layer as usize >= NUM_LAYER {
            warn!("ignoring activation of undefined layer {}", layer);
            return;
        }
        if self.stack.push(layer, id).is_err() {
            self.stack_full_drops = self.stack_full_drops.saturating_add(1);
            warn!("layer stack full, dropping activation of layer {}", layer);
        }
    }

    /// Pop the activation tagged with `id`, if any
    pub fn deactivate(&mut self, id: ActivationId) {
        if self.stack.pop_by_id(id).is_none() {
            debug!("release without matching layer activation");
        }
    }

    /// Toggle: pop the activation with this id if present, push otherwise
    pub fn toggle(&mut self, layer: u8, id: ActivationId) {
        if self.stack.pop_by_id(id).is_none() {
            self.activate(layer, id);
        }
    }

    /// Layer currently on top of the stack
    pub fn current_layer(&self) -> u8 {
        self.stack.peek(0).unwrap_or(0)
    }

    /// Number of layer pushes dropped because the stack was full
    pub fn stack_full_drops(&self) -> u16 {
        self.stack_full_drops
    }
}
