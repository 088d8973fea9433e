//! GPIO matrix scanner for the locally attached half.

pub mod expander;

use embassy_time::Timer;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::debounce::{DebounceState, DebouncerTrait};
use crate::event::KeyboardEvent;
use crate::input_device::InputDevice;

/// MatrixTrait is the trait for keyboard matrix.
///
/// A matrix scans its electrical sub-matrix and emits debounced events with
/// rows already offset into full-keyboard coordinates.
pub trait MatrixTrait: InputDevice {
    // Matrix size
    const ROW: usize;
    const COL: usize;
}

/// KeyState represents the state of a key.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState {
    // True if the key is pressed
    pub pressed: bool,
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyState {
    pub fn new() -> Self {
        KeyState { pressed: false }
    }

    pub fn toggle_pressed(&mut self) {
        self.pressed = !self.pressed;
    }
}

/// Matrix scanning the pcb wired directly to the controller.
///
/// Columns are driven, rows are read. The electrical convention is active
/// low: the selected column is pulled low and a row reading low means the
/// key at that position is down.
pub struct Matrix<
    In: InputPin,
    Out: OutputPin,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> {
    /// Row input pins
    input_pins: [In; INPUT_PIN_NUM],
    /// Column output pins
    output_pins: [Out; OUTPUT_PIN_NUM],
    /// Debouncer
    debouncer: D,
    /// Key state matrix, indexed [col][row]
    key_states: [[KeyState; INPUT_PIN_NUM]; OUTPUT_PIN_NUM],
    /// Position at which the next scan resumes: (col, row)
    scan_pos: (usize, usize),
}

impl<
    In: InputPin,
    Out: OutputPin,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    /// Create a matrix from input and output pins.
    pub fn new(input_pins: [In; INPUT_PIN_NUM], output_pins: [Out; OUTPUT_PIN_NUM], debouncer: D) -> Self {
        Matrix {
            input_pins,
            output_pins,
            debouncer,
            key_states: [[KeyState::new(); INPUT_PIN_NUM]; OUTPUT_PIN_NUM],
            scan_pos: (0, 0),
        }
    }
}

impl<
    In: InputPin,
    Out: OutputPin,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> InputDevice for Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    async fn read_event(&mut self) -> KeyboardEvent {
        loop {
            let (col_start, mut row_start) = self.scan_pos;

            for col_idx in col_start..OUTPUT_PIN_NUM {
                // Select the column, wait 1us ensuring the level settled
                if let Some(out_pin) = self.output_pins.get_mut(col_idx) {
                    out_pin.set_low().ok();
                }
                Timer::after_micros(1).await;

                for row_idx in row_start..INPUT_PIN_NUM {
                    let in_pin = self.input_pins.get_mut(row_idx).unwrap();
                    // Row reads low when the key at (row, col) is down
                    let key_active = in_pin.is_low().ok().unwrap_or_default();
                    let debounce_state = self.debouncer.detect_change_with_debounce(
                        row_idx,
                        col_idx,
                        key_active,
                        &self.key_states[col_idx][row_idx],
                    );

                    if let DebounceState::Debounced = debounce_state {
                        self.key_states[col_idx][row_idx].toggle_pressed();
                        let key_state = self.key_states[col_idx][row_idx];

                        // Resume right after this position on the next call
                        self.scan_pos = if row_idx + 1 < INPUT_PIN_NUM {
                            (col_idx, row_idx + 1)
                        } else {
                            ((col_idx + 1) % OUTPUT_PIN_NUM, 0)
                        };
                        // Deselect before handing the event out
                        if let Some(out_pin) = self.output_pins.get_mut(col_idx) {
                            out_pin.set_high().ok();
                        }
                        return KeyboardEvent::key(
                            (row_idx + ROW_OFFSET) as u8,
                            col_idx as u8,
                            key_state.pressed,
                        );
                    }
                }
                row_start = 0;

                if let Some(out_pin) = self.output_pins.get_mut(col_idx) {
                    out_pin.set_high().ok();
                }
            }
            self.scan_pos = (0, 0);
        }
    }
}

impl<
    In: InputPin,
    Out: OutputPin,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> MatrixTrait for Matrix<In, Out, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    const ROW: usize = INPUT_PIN_NUM;
    const COL: usize = OUTPUT_PIN_NUM;
}
