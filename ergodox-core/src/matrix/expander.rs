//! Matrix scanner for the half attached through an MCP23018 I2C port
//! expander.
//!
//! The expander drives the columns on port A and reads the rows on port B,
//! active low like the local matrix. Configuration registers are rewritten at
//! the start of every scan pass; that costs little on a 400kHz bus and means
//! an expander that was unplugged at boot, or power-cycled mid-session, comes
//! back on its own the next pass.

use embassy_time::Timer;
use embedded_hal_async::i2c::I2c;
use heapless::Deque;

use crate::debounce::{DebounceState, DebouncerTrait};
use crate::event::KeyboardEvent;
use crate::input_device::InputDevice;
use crate::matrix::{KeyState, MatrixTrait};

/// 7-bit bus address of the MCP23018 with all address pins grounded
pub const MCP23018_ADDR: u8 = 0x20;

// Register addresses, bank 0 layout. Port B registers sit one above their
// port A counterpart, so a two-byte payload writes both ports in one
// transaction.
const IODIRA: u8 = 0x00;
const GPPUA: u8 = 0x0C;
const GPIOA: u8 = 0x12;
const GPIOB: u8 = 0x13;
const OLATA: u8 = 0x14;

/// Capacity of the per-pass event queue
const PENDING_CAP: usize = 64;

/// Pause between scan attempts while the expander is unreachable, so an
/// unplugged half does not spin on the bus
const ERROR_RETRY_DELAY_MS: u64 = 100;

/// Matrix scanning the far half of the keyboard over I2C.
///
/// Unlike the GPIO matrix, one scan pass debounces the whole sub-matrix and
/// queues every resulting edge; `read_event` drains the queue one event per
/// call. On any bus error the sub-matrix fails safe: every key currently
/// registered as pressed is released, so a yanked cable can never leave keys
/// latched down on the host.
pub struct ExpanderMatrix<
    I2C: I2c,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> {
    bus: I2C,
    debouncer: D,
    /// Key state matrix, indexed [col][row]
    key_states: [[KeyState; INPUT_PIN_NUM]; OUTPUT_PIN_NUM],
    /// Edges detected by the last scan pass, drained by `read_event`
    pending: Deque<KeyboardEvent, PENDING_CAP>,
    /// Number of scan passes aborted by a bus error
    comm_errors: u16,
}

impl<
    I2C: I2c,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> ExpanderMatrix<I2C, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    pub fn new(bus: I2C, debouncer: D) -> Self {
        const { assert!(INPUT_PIN_NUM * OUTPUT_PIN_NUM <= PENDING_CAP) };
        const { assert!(INPUT_PIN_NUM <= 8 && OUTPUT_PIN_NUM <= 8) };
        ExpanderMatrix {
            bus,
            debouncer,
            key_states: [[KeyState::new(); INPUT_PIN_NUM]; OUTPUT_PIN_NUM],
            pending: Deque::new(),
            comm_errors: 0,
        }
    }

    /// Number of scan passes aborted by a bus error
    pub fn comm_errors(&self) -> u16 {
        self.comm_errors
    }

    /// Configure the expander: columns on port A as driven outputs (A7
    /// unused, input), rows on port B as pulled-up inputs, all outputs
    /// released high.
    async fn init(&mut self) -> Result<(), I2C::Error> {
        self.bus.write(MCP23018_ADDR, &[IODIRA, 0b1000_0000, 0b1111_1111]).await?;
        self.bus.write(MCP23018_ADDR, &[GPPUA, 0b1000_0000, 0b1111_1111]).await?;
        self.bus.write(MCP23018_ADDR, &[OLATA, 0xFF, 0xFF]).await?;
        Ok(())
    }

    /// One full scan pass: re-init, then select each column in turn and read
    /// the row byte. Every debounced edge is queued into `pending`.
    async fn scan_pass(&mut self) -> Result<(), I2C::Error> {
        // Re-init every pass so a hot-plugged or reset expander recovers
        // without host intervention
        self.init().await?;

        for col_idx in 0..OUTPUT_PIN_NUM {
            // Drive the scanned column low, leave the rest hi-Z
            self.bus
                .write(MCP23018_ADDR, &[GPIOA, 0xFF & !(1 << col_idx)])
                .await?;
            let mut data = [0u8; 1];
            self.bus.write_read(MCP23018_ADDR, &[GPIOB], &mut data).await?;

            for row_idx in 0..INPUT_PIN_NUM {
                // Row bits sit at B5..B0 for rows 0..5
                let key_active = (data[0] & (1 << (INPUT_PIN_NUM - 1 - row_idx))) == 0;
                let debounce_state = self.debouncer.detect_change_with_debounce(
                    row_idx,
                    col_idx,
                    key_active,
                    &self.key_states[col_idx][row_idx],
                );
                if let DebounceState::Debounced = debounce_state {
                    self.key_states[col_idx][row_idx].toggle_pressed();
                    let event = KeyboardEvent::key(
                        (row_idx + ROW_OFFSET) as u8,
                        col_idx as u8,
                        self.key_states[col_idx][row_idx].pressed,
                    );
                    // Capacity covers a full sub-matrix of edges, the push
                    // cannot fail while the queue is drained between passes
                    self.pending.push_back(event).ok();
                }
            }
        }

        // Release all columns
        self.bus.write(MCP23018_ADDR, &[GPIOA, 0xFF]).await?;
        Ok(())
    }

    /// Fail safe after a bus error: forget the pass in progress and emit a
    /// release for every key this half holds down.
    fn release_all(&mut self) {
        self.pending.clear();
        for row_idx in 0..INPUT_PIN_NUM {
            for col_idx in 0..OUTPUT_PIN_NUM {
                if self.key_states[col_idx][row_idx].pressed {
                    self.key_states[col_idx][row_idx].pressed = false;
                    self.pending
                        .push_back(KeyboardEvent::key(
                            (row_idx + ROW_OFFSET) as u8,
                            col_idx as u8,
                            false,
                        ))
                        .ok();
                }
            }
        }
    }
}

impl<
    I2C: I2c,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> InputDevice for ExpanderMatrix<I2C, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    async fn read_event(&mut self) -> KeyboardEvent {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            if self.scan_pass().await.is_err() {
                self.comm_errors = self.comm_errors.saturating_add(1);
                error!("i2c expander unreachable, releasing its keys");
                self.release_all();
                // Deliver queued releases right away, back off only once
                // there is nothing left to report
                if self.pending.is_empty() {
                    Timer::after_millis(ERROR_RETRY_DELAY_MS).await;
                }
            }
        }
    }
}

impl<
    I2C: I2c,
    D: DebouncerTrait<INPUT_PIN_NUM, OUTPUT_PIN_NUM>,
    const INPUT_PIN_NUM: usize,
    const OUTPUT_PIN_NUM: usize,
    const ROW_OFFSET: usize,
> MatrixTrait for ExpanderMatrix<I2C, D, INPUT_PIN_NUM, OUTPUT_PIN_NUM, ROW_OFFSET>
{
    const ROW: usize = INPUT_PIN_NUM;
    const COL: usize = OUTPUT_PIN_NUM;
}
