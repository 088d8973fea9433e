/// Create a layer action table in a keymap
#[macro_export]
macro_rules! layer {
    ([$([$($x: expr), +]), +]) => {
        [$([$($x), +]),+]
    };
}

/// Create a normal key. For example, `k!(A)` represents `KeyAction::Single(Action::Key(KeyCode::A))`
#[macro_export]
macro_rules! k {
    ($k: ident) => {
        $crate::action::KeyAction::Single($crate::action::Action::Key($crate::keycode::KeyCode::$k))
    };
}

/// Create a normal key with modifier action
#[macro_export]
macro_rules! wm {
    ($x: ident, $m: expr) => {
        $crate::action::KeyAction::Single($crate::action::Action::KeyWithModifier(
            $crate::keycode::KeyCode::$x,
            $m,
        ))
    };
}

/// Create a non-action entry: `a!(NotWired)` or `a!(Transparent)`
#[macro_export]
macro_rules! a {
    ($a: ident) => {
        $crate::action::KeyAction::$a
    };
}

/// Create a momentary layer action. For example, `mo!(1)` holds layer 1.
#[macro_export]
macro_rules! mo {
    ($x: literal) => {
        $crate::action::KeyAction::Single($crate::action::Action::LayerMomentary($x))
    };
}

/// Create a layer toggle action. For example, `tg!(1)` toggles layer 1.
#[macro_export]
macro_rules! tg {
    ($x: literal) => {
        $crate::action::KeyAction::Single($crate::action::Action::LayerToggle($x))
    };
}

/// Create a macro replay action. For example, `m!(0)` plays stored macro 0.
#[macro_export]
macro_rules! m {
    ($x: literal) => {
        $crate::action::KeyAction::Single($crate::action::Action::Macro($x))
    };
}
