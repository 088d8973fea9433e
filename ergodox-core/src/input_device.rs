//! Input device traits and the glue macros that run several of them
//! concurrently against the shared event channel.

/// The trait for input devices.
///
/// An input device produces debounced [`KeyboardEvent`]s; the `run_devices!`
/// macro forwards them into the key event channel where the keyboard task
/// picks them up.
///
/// [`KeyboardEvent`]: crate::event::KeyboardEvent
pub trait InputDevice {
    /// Read the next debounced event. The returned future may scan for an
    /// unbounded time; it resolves only when an edge is detected.
    async fn read_event(&mut self) -> crate::event::KeyboardEvent;
}

/// A self-contained task that runs forever once started
pub trait Runnable {
    async fn run(&mut self);
}

/// Join an arbitrary number of futures into one.
#[macro_export]
macro_rules! join_all {
    ($fut:expr) => {
        $fut
    };
    ($f1:expr, $f2:expr) => {
        $crate::embassy_futures::join::join($f1, $f2)
    };
    ($f1:expr, $f2:expr, $f3:expr) => {
        $crate::embassy_futures::join::join3($f1, $f2, $f3)
    };
    ($f1:expr, $f2:expr, $f3:expr, $f4:expr) => {
        $crate::embassy_futures::join::join4($f1, $f2, $f3, $f4)
    };
    ($f1:expr, $f2:expr, $f3:expr, $f4:expr, $($rest:expr),+) => {{
        let head = $crate::embassy_futures::join::join4($f1, $f2, $f3, $f4);
        let tail = $crate::join_all!($($rest),+);
        $crate::embassy_futures::join::join(head, tail)
    }};
}

/// Bind input devices to event channels and run all of them.
///
/// Devices inside one group are polled together and feed the same channel,
/// so the two matrix halves share the key event channel:
///
/// ```ignore
/// run_devices! {
///     (local_matrix, expander_matrix) => KEY_EVENT_CHANNEL,
/// }
/// ```
#[macro_export]
macro_rules! run_devices {
    ( $( ( $( $dev:ident ),* ) => $channel:ident ),+ $(,)? ) => {{
        use $crate::futures::{self, future::FutureExt, select_biased};
        $crate::join_all!(
            $(
                async {
                    loop {
                        let e = select_biased! {
                            $(
                                e = $dev.read_event().fuse() => e,
                            )*
                        };
                        $channel.send(e).await;
                    }
                }
            ),+
        )
    }};
}
