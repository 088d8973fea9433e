use crate::matrix::KeyState;

pub mod default_debouncer;
pub mod fast_debouncer;

pub use default_debouncer::DefaultDebouncer;
pub use fast_debouncer::FastDebouncer;

/// Per-key debouncing over a matrix of `ROW` input lines and `COL` output
/// lines. The debouncer sees the raw pin sample for each position on every
/// scan pass and decides when a change is real.
pub trait DebouncerTrait<const ROW: usize, const COL: usize> {
    fn detect_change_with_debounce(
        &mut self,
        row_idx: usize,
        col_idx: usize,
        pin_state: bool,
        key_state: &KeyState,
    ) -> DebounceState;
}

/// Debounce state
pub enum DebounceState {
    /// The change is stable, emit the edge
    Debounced,
    /// A change is being observed but hasn't been stable long enough
    InProgress,
    /// No change against the registered key state
    Ignored,
}
