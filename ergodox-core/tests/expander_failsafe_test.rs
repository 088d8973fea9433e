//! Expander-half scanning over a mocked I2C bus, including the fail-safe
//! release of held keys when the bus drops.

pub mod common;

use embassy_futures::select::{Either, select};
use embassy_time::Timer;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use ergodox_core::debounce::FastDebouncer;
use ergodox_core::event::KeyboardEvent;
use ergodox_core::input_device::InputDevice;
use ergodox_core::matrix::expander::{ExpanderMatrix, MCP23018_ADDR};
use rusty_fork::rusty_fork_test;

use crate::common::block_on;

const ROWS: usize = 6;
const COLS: usize = 7;
const ROW_OFFSET: usize = 6;

// Register addresses in bank 0 layout
const IODIRA: u8 = 0x00;
const GPPUA: u8 = 0x0C;
const GPIOA: u8 = 0x12;
const GPIOB: u8 = 0x13;
const OLATA: u8 = 0x14;

fn init_transactions() -> Vec<I2cTransaction> {
    vec![
        I2cTransaction::write(MCP23018_ADDR, vec![IODIRA, 0b1000_0000, 0b1111_1111]),
        I2cTransaction::write(MCP23018_ADDR, vec![GPPUA, 0b1000_0000, 0b1111_1111]),
        I2cTransaction::write(MCP23018_ADDR, vec![OLATA, 0xFF, 0xFF]),
    ]
}

/// One clean scan pass. `pressed` lists (row, col) positions whose row bit
/// reads low while their column is selected.
fn scan_transactions(pressed: &[(usize, usize)]) -> Vec<I2cTransaction> {
    let mut transactions = Vec::new();
    transactions.extend(init_transactions());
    for col in 0..COLS {
        transactions.push(I2cTransaction::write(
            MCP23018_ADDR,
            vec![GPIOA, 0xFF & !(1 << col)],
        ));
        let mut row_byte = 0xFFu8;
        for &(r, c) in pressed {
            if c == col {
                // Rows 0..5 map to bits B5..B0
                row_byte &= !(1 << (ROWS - 1 - r));
            }
        }
        transactions.push(I2cTransaction::write_read(
            MCP23018_ADDR,
            vec![GPIOB],
            vec![row_byte],
        ));
    }
    transactions.push(I2cTransaction::write(MCP23018_ADDR, vec![GPIOA, 0xFF]));
    transactions
}

rusty_fork_test! {
    #[test]
    fn test_scan_pass_emits_presses_with_row_offset() {
        let transactions = scan_transactions(&[(0, 0), (3, 2)]);
        let mut bus = I2cMock::new(&transactions);

        let mut matrix: ExpanderMatrix<_, FastDebouncer<ROWS, COLS>, ROWS, COLS, ROW_OFFSET> =
            ExpanderMatrix::new(bus.clone(), FastDebouncer::new());

        block_on(async {
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(6, 0, true));
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(9, 2, true));
        });
        assert_eq!(matrix.comm_errors(), 0);
        bus.done();
    }

    #[test]
    fn test_bus_error_releases_all_held_keys() {
        let mut transactions = scan_transactions(&[(0, 0), (3, 2), (5, 6)]);
        // Next pass: the expander stops acknowledging
        transactions.push(
            I2cTransaction::write(MCP23018_ADDR, vec![IODIRA, 0b1000_0000, 0b1111_1111])
                .with_error(ErrorKind::Other),
        );
        let mut bus = I2cMock::new(&transactions);

        let mut matrix: ExpanderMatrix<_, FastDebouncer<ROWS, COLS>, ROWS, COLS, ROW_OFFSET> =
            ExpanderMatrix::new(bus.clone(), FastDebouncer::new());

        block_on(async {
            // The clean pass reports three presses
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(6, 0, true));
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(9, 2, true));
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(11, 6, true));

            // The failed pass releases everything this half held, in row
            // order, without touching the bus again
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(6, 0, false));
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(9, 2, false));
            assert_eq!(matrix.read_event().await, KeyboardEvent::key(11, 6, false));
        });
        assert_eq!(matrix.comm_errors(), 1);
        bus.done();
    }

    #[test]
    fn test_unreachable_expander_retries_on_a_timer() {
        // An absent half with no keys held: every attempt fails on the first
        // init write. 150ms spans the first attempt plus one 100ms backoff,
        // so exactly two attempts may touch the bus.
        let transactions = vec![
            I2cTransaction::write(MCP23018_ADDR, vec![IODIRA, 0b1000_0000, 0b1111_1111])
                .with_error(ErrorKind::Other),
            I2cTransaction::write(MCP23018_ADDR, vec![IODIRA, 0b1000_0000, 0b1111_1111])
                .with_error(ErrorKind::Other),
        ];
        let mut bus = I2cMock::new(&transactions);

        let mut matrix: ExpanderMatrix<_, FastDebouncer<ROWS, COLS>, ROWS, COLS, ROW_OFFSET> =
            ExpanderMatrix::new(bus.clone(), FastDebouncer::new());

        block_on(async {
            match select(matrix.read_event(), Timer::after_millis(150)).await {
                Either::First(event) => panic!("unexpected event {:?}", event),
                Either::Second(_) => (),
            }
        });
        assert_eq!(matrix.comm_errors(), 2);
        bus.done();
    }
}
