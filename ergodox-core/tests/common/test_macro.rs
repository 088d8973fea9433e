extern crate ergodox_core;

#[macro_export]
macro_rules! key_sequence_test {
    (keyboard: $keyboard:expr, sequence: [$([$row:expr, $col:expr, $pressed:expr, $delay:expr]),* $(,)?], expected_reports: [$([$modifier:expr, $keys:expr]),* $(,)?]) => {
        $crate::common::block_on(async {
            let mut keyboard = $keyboard;
            let sequence = vec![
                $(
                    $crate::common::TestKeyPress {
                        row: $row,
                        col: $col,
                        pressed: $pressed,
                        delay: $delay,
                    },
                )*
            ];
            let expected_reports = vec![
                $(
                    $crate::common::ExpectedReport {
                        modifier: $modifier,
                        keycodes: $keys,
                    },
                )*
            ];

            $crate::common::run_key_sequence_test(&mut keyboard, &sequence, &expected_reports).await;
        });
    };
}

// a rust macro to map a key name to its hid usage byte
#[macro_export]
macro_rules! kc_to_u8 {
    ($key: ident) => {
        ergodox_core::keycode::KeyCode::$key as u8
    };
}
