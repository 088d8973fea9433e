//! Default QWERTY layout: base layer, held symbol/function layer, toggled
//! numpad layer.

use crate::keymap::Layer;
use crate::{MATRIX_COLS, MATRIX_ROWS, a, k, layer, m, mo, tg};

pub const NUM_LAYER: usize = 3;

/// The default keymap. Rows 0..6 are the right (local) half top to bottom,
/// rows 6..12 the left (expander) half; the last row of each half is its
/// thumb cluster.
pub const fn get_default_keymap() -> [Layer<MATRIX_ROWS, MATRIX_COLS>; NUM_LAYER] {
    [
        // Layer 0: QWERTY base
        Layer::symmetric(layer!([
            // Right half
            [k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal)],
            [k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket)],
            [k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), k!(Enter)],
            [k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), k!(RShift), a!(NotWired)],
            [k!(Up), k!(Down), k!(Left), k!(Right), k!(RGui), a!(NotWired), a!(NotWired)],
            [k!(Space), k!(Enter), k!(PageUp), k!(PageDown), mo!(1), tg!(2), a!(NotWired)],
            // Left half
            [k!(Escape), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Grave)],
            [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), a!(NotWired)],
            [k!(LCtrl), k!(A), k!(S), k!(D), k!(F), k!(G), a!(NotWired)],
            [k!(LShift), k!(Z), k!(X), k!(C), k!(V), k!(B), a!(NotWired)],
            [k!(CapsLock), k!(Backslash), k!(LGui), k!(LAlt), mo!(1), a!(NotWired), a!(NotWired)],
            [k!(Backspace), k!(Delete), k!(Home), k!(End), m!(0), a!(NotWired), a!(NotWired)]
        ])),
        // Layer 1: function keys, media and mouse keys. Held from either
        // half's mo!(1) key.
        Layer::symmetric(layer!([
            [k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12)],
            [a!(Transparent), k!(MouseBtn1), k!(MouseUp), k!(MouseBtn2), a!(Transparent), a!(Transparent), a!(Transparent)],
            [a!(Transparent), k!(MouseLeft), k!(MouseDown), k!(MouseRight), a!(Transparent), a!(Transparent), a!(Transparent)],
            [a!(Transparent), k!(MouseWheelUp), k!(MouseWheelDown), k!(MouseBtn3), a!(Transparent), a!(Transparent), a!(NotWired)],
            [k!(AudioVolUp), k!(AudioVolDown), k!(AudioMute), k!(MediaPlayPause), a!(Transparent), a!(NotWired), a!(NotWired)],
            [a!(Transparent), a!(Transparent), k!(MediaPrevTrack), k!(MediaNextTrack), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(SystemSleep)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired), a!(NotWired)]
        ])),
        // Layer 2: numpad on the right half, toggled
        Layer::symmetric(layer!([
            [a!(Transparent), k!(NumLock), k!(KpSlash), k!(KpAsterisk), k!(KpMinus), a!(Transparent), a!(Transparent)],
            [a!(Transparent), k!(Kp7), k!(Kp8), k!(Kp9), k!(KpPlus), a!(Transparent), a!(Transparent)],
            [a!(Transparent), k!(Kp4), k!(Kp5), k!(Kp6), k!(KpPlus), a!(Transparent), k!(KpEnter)],
            [a!(Transparent), k!(Kp1), k!(Kp2), k!(Kp3), k!(KpEnter), a!(Transparent), a!(NotWired)],
            [a!(Transparent), k!(Kp0), k!(KpDot), k!(KpEqual), a!(Transparent), a!(NotWired), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired), a!(NotWired)],
            [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(NotWired), a!(NotWired)]
        ])),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::Action;
    use crate::event::KeyboardEvent;
    use crate::keycode::KeyCode;
    use crate::keymap::KeyMap;
    use crate::layer_stack::ActivationId;
    use crate::layout::FN_LAYER;

    #[test]
    fn default_keymap_covers_both_halves() {
        let layers = get_default_keymap();
        let mut keymap: KeyMap<MATRIX_ROWS, MATRIX_COLS, NUM_LAYER> = KeyMap::new(&layers);

        // QWERTY home row sits on the expander half
        let resolved = keymap.resolve(KeyboardEvent::key(8, 1, true)).unwrap();
        assert_eq!(resolved.action, Action::Key(KeyCode::A));

        // The held fn layer puts F1 on the left number row
        keymap.activate(FN_LAYER, ActivationId::from_position(5, 4, MATRIX_COLS as u8));
        let resolved = keymap.resolve(KeyboardEvent::key(6, 1, true)).unwrap();
        assert_eq!(resolved.layer, FN_LAYER);
        assert_eq!(resolved.action, Action::Key(KeyCode::F1));

        // Unwired positions stay unresolved on every layer
        assert!(keymap.resolve(KeyboardEvent::key(3, 6, true)).is_none());
    }
}
