pub mod test_macro;

use core::cell::RefCell;
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use embassy_futures::join::join;
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, MockDriver, Timer};
use ergodox_core::channel::{KEY_EVENT_CHANNEL, KEYBOARD_REPORT_CHANNEL};
use ergodox_core::config::BehaviorConfig;
use ergodox_core::event::KeyboardEvent;
use ergodox_core::hid::Report;
use ergodox_core::input_device::Runnable;
use ergodox_core::keyboard::Keyboard;
use ergodox_core::keymap::{KeyMap, Layer};
use log::debug;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[allow(dead_code)]
pub const KC_LSHIFT: u8 = 1 << 1;
#[allow(dead_code)]
pub const KC_LCTRL: u8 = 1 << 0;

/// Polls at which `block_on` gives up. Each pending poll advances virtual
/// time by 1ms, so this is also the virtual time budget of one test.
const MAX_POLLS: usize = 120_000;

fn noop_raw_waker() -> RawWaker {
    fn clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }
    fn noop(_: *const ()) {}
    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
    RawWaker::new(core::ptr::null(), &VTABLE)
}

/// Single-future executor over the embassy mock time driver: whenever the
/// future is pending, virtual time moves 1ms so sleeping timers fire. Tests
/// never wait on wall-clock time.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut fut = pin!(fut);
    for _ in 0..MAX_POLLS {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
        MockDriver::get().advance(Duration::from_millis(1));
    }
    panic!("test did not finish within the virtual time budget");
}

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
    pub delay: u64, // Delay before this key event in milliseconds
}

/// Expected content of one 6KRO keyboard report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedReport {
    pub modifier: u8,
    pub keycodes: [u8; 6],
}

/// Run a keyboard test: feed a key event sequence with delays, verify the
/// emitted keyboard reports in order. Reports of other flavors are logged
/// and skipped.
pub async fn run_key_sequence_test<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keyboard: &mut Keyboard<'a, ROW, COL, NUM_LAYER>,
    key_sequence: &[TestKeyPress],
    expected_reports: &[ExpectedReport],
) {
    KEY_EVENT_CHANNEL.clear();
    KEYBOARD_REPORT_CHANNEL.clear();

    let io = join(
        // Send all key events with delays
        async {
            for key in key_sequence {
                Timer::after(Duration::from_millis(key.delay)).await;
                KEY_EVENT_CHANNEL
                    .send(KeyboardEvent {
                        row: key.row,
                        col: key.col,
                        pressed: key.pressed,
                    })
                    .await;
            }
        },
        // Verify reports
        async {
            let mut report_index = 0;
            for expected in expected_reports {
                loop {
                    match select(Timer::after(Duration::from_secs(5)), KEYBOARD_REPORT_CHANNEL.receive()).await {
                        Either::First(_) => panic!("timed out waiting for report #{report_index}"),
                        Either::Second(Report::KeyboardReport(report)) => {
                            assert_eq!(
                                (expected.modifier, expected.keycodes),
                                (report.modifier, report.keycodes),
                                "keyboard report #{report_index} mismatch",
                            );
                            report_index += 1;
                            break;
                        }
                        Either::Second(_) => {
                            debug!("skipping non-keyboard report");
                        }
                    }
                }
            }
        },
    );

    // The keyboard task never returns; the select ends when sending and
    // verification are both done
    match select(keyboard.run(), io).await {
        Either::First(_) => unreachable!("keyboard task returned"),
        Either::Second(_) => (),
    }
}

/// Leak a keymap into a `'static` RefCell the way firmware entry points pin
/// theirs in statics. Box::leak is acceptable in tests.
pub fn wrap_keymap<const R: usize, const C: usize, const L: usize>(
    layers: [Layer<R, C>; L],
) -> &'static RefCell<KeyMap<'static, R, C, L>> {
    let leaked_layers = Box::leak(Box::new(layers));
    Box::leak(Box::new(RefCell::new(KeyMap::new(leaked_layers))))
}

#[allow(dead_code)]
pub fn create_test_keyboard_with_config<const R: usize, const C: usize, const L: usize>(
    layers: [Layer<R, C>; L],
    config: BehaviorConfig,
) -> Keyboard<'static, R, C, L> {
    Keyboard::new(wrap_keymap(layers), config)
}

#[allow(dead_code)]
pub fn create_test_keyboard<const R: usize, const C: usize, const L: usize>(
    layers: [Layer<R, C>; L],
) -> Keyboard<'static, R, C, L> {
    create_test_keyboard_with_config(layers, BehaviorConfig::default())
}
