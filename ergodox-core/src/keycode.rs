use usbd_hid::descriptor::{MediaKey, SystemControlKey};

/// Modifier combination attached to a key action, stored as the USB HID
/// modifier byte (bit 0 = LCtrl .. bit 7 = RGui).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModifierCombination(u8);

impl ModifierCombination {
    pub const NONE: Self = Self(0);
    pub const LCTRL: Self = Self(1 << 0);
    pub const LSHIFT: Self = Self(1 << 1);
    pub const LALT: Self = Self(1 << 2);
    pub const LGUI: Self = Self(1 << 3);

    /// Build a combination from individual modifier flags. `right` selects
    /// the right-hand variants of all requested modifiers.
    pub const fn new_from(right: bool, gui: bool, alt: bool, shift: bool, ctrl: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 1 << 0;
        }
        if shift {
            bits |= 1 << 1;
        }
        if alt {
            bits |= 1 << 2;
        }
        if gui {
            bits |= 1 << 3;
        }
        if right {
            bits <<= 4;
        }
        Self(bits)
    }

    /// Get modifier hid report bits from the combination
    pub const fn to_hid_modifier_bits(self) -> u8 {
        self.0
    }
}

/// KeyCode is the internal representation of all keycodes.
///
/// Codes up to `RGui` are plain HID keyboard-page usages. Consumer-control,
/// system-control and mouse keys live in crate-private ranges above 0x0100
/// and are translated to their wire representation when the report is built.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum KeyCode {
    /// Reserved, no-key.
    No = 0x0000,
    A = 0x0004,
    B = 0x0005,
    C = 0x0006,
    D = 0x0007,
    E = 0x0008,
    F = 0x0009,
    G = 0x000A,
    H = 0x000B,
    I = 0x000C,
    J = 0x000D,
    K = 0x000E,
    L = 0x000F,
    M = 0x0010,
    N = 0x0011,
    O = 0x0012,
    P = 0x0013,
    Q = 0x0014,
    R = 0x0015,
    S = 0x0016,
    T = 0x0017,
    U = 0x0018,
    V = 0x0019,
    W = 0x001A,
    X = 0x001B,
    Y = 0x001C,
    Z = 0x001D,
    Kc1 = 0x001E,
    Kc2 = 0x001F,
    Kc3 = 0x0020,
    Kc4 = 0x0021,
    Kc5 = 0x0022,
    Kc6 = 0x0023,
    Kc7 = 0x0024,
    Kc8 = 0x0025,
    Kc9 = 0x0026,
    Kc0 = 0x0027,
    Enter = 0x0028,
    Escape = 0x0029,
    Backspace = 0x002A,
    Tab = 0x002B,
    Space = 0x002C,
    Minus = 0x002D,
    Equal = 0x002E,
    LeftBracket = 0x002F,
    RightBracket = 0x0030,
    Backslash = 0x0031,
    Semicolon = 0x0033,
    Quote = 0x0034,
    Grave = 0x0035,
    Comma = 0x0036,
    Dot = 0x0037,
    Slash = 0x0038,
    CapsLock = 0x0039,
    F1 = 0x003A,
    F2 = 0x003B,
    F3 = 0x003C,
    F4 = 0x003D,
    F5 = 0x003E,
    F6 = 0x003F,
    F7 = 0x0040,
    F8 = 0x0041,
    F9 = 0x0042,
    F10 = 0x0043,
    F11 = 0x0044,
    F12 = 0x0045,
    PrintScreen = 0x0046,
    ScrollLock = 0x0047,
    Pause = 0x0048,
    Insert = 0x0049,
    Home = 0x004A,
    PageUp = 0x004B,
    Delete = 0x004C,
    End = 0x004D,
    PageDown = 0x004E,
    Right = 0x004F,
    Left = 0x0050,
    Down = 0x0051,
    Up = 0x0052,
    NumLock = 0x0053,
    KpSlash = 0x0054,
    KpAsterisk = 0x0055,
    KpMinus = 0x0056,
    KpPlus = 0x0057,
    KpEnter = 0x0058,
    Kp1 = 0x0059,
    Kp2 = 0x005A,
    Kp3 = 0x005B,
    Kp4 = 0x005C,
    Kp5 = 0x005D,
    Kp6 = 0x005E,
    Kp7 = 0x005F,
    Kp8 = 0x0060,
    Kp9 = 0x0061,
    Kp0 = 0x0062,
    KpDot = 0x0063,
    Application = 0x0065,
    KpEqual = 0x0067,
    LockingNumLock = 0x0083,
    LCtrl = 0x00E0,
    LShift = 0x00E1,
    LAlt = 0x00E2,
    LGui = 0x00E3,
    RCtrl = 0x00E4,
    RShift = 0x00E5,
    RAlt = 0x00E6,
    RGui = 0x00E7,
    // Consumer page
    AudioMute = 0x0100,
    AudioVolUp = 0x0101,
    AudioVolDown = 0x0102,
    MediaNextTrack = 0x0103,
    MediaPrevTrack = 0x0104,
    MediaStop = 0x0105,
    MediaPlayPause = 0x0106,
    // System control page
    SystemPower = 0x0120,
    SystemSleep = 0x0121,
    SystemWake = 0x0122,
    // Mouse keys
    MouseUp = 0x0140,
    MouseDown = 0x0141,
    MouseLeft = 0x0142,
    MouseRight = 0x0143,
    MouseBtn1 = 0x0144,
    MouseBtn2 = 0x0145,
    MouseBtn3 = 0x0146,
    MouseWheelUp = 0x0147,
    MouseWheelDown = 0x0148,
}

impl KeyCode {
    /// Returns `true` if the keycode is a plain keyboard-page keycode
    pub(crate) fn is_basic(self) -> bool {
        KeyCode::No <= self && self <= KeyCode::RGui
    }

    /// Returns `true` if the keycode is a modifier keycode
    pub(crate) fn is_modifier(self) -> bool {
        KeyCode::LCtrl <= self && self <= KeyCode::RGui
    }

    /// Returns the byte with the bit corresponding to the USB HID
    /// modifier bitfield set.
    pub(crate) fn as_modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self as u16 as u8 - KeyCode::LCtrl as u16 as u8)
        } else {
            0
        }
    }

    /// Returns `true` if the keycode is a system-control keycode
    pub(crate) fn is_system(self) -> bool {
        KeyCode::SystemPower <= self && self <= KeyCode::SystemWake
    }

    /// Returns `true` if the keycode is a keycode in consumer page
    pub(crate) fn is_consumer(self) -> bool {
        KeyCode::AudioMute <= self && self <= KeyCode::MediaPlayPause
    }

    /// Returns `true` if the keycode is a mouse keycode
    pub(crate) fn is_mouse_key(self) -> bool {
        KeyCode::MouseUp <= self && self <= KeyCode::MouseWheelDown
    }

    /// The keyboard-page usage byte put into the 6KRO report
    pub(crate) fn as_keyboard_usage(self) -> u8 {
        if self.is_basic() { self as u16 as u8 } else { 0 }
    }

    /// Convert a keycode to usb hid media key
    pub(crate) fn as_consumer_control_usage_id(self) -> MediaKey {
        match self {
            KeyCode::AudioMute => MediaKey::Mute,
            KeyCode::AudioVolUp => MediaKey::VolumeIncrement,
            KeyCode::AudioVolDown => MediaKey::VolumeDecrement,
            KeyCode::MediaNextTrack => MediaKey::NextTrack,
            KeyCode::MediaPrevTrack => MediaKey::PrevTrack,
            KeyCode::MediaStop => MediaKey::Stop,
            KeyCode::MediaPlayPause => MediaKey::PlayPause,
            _ => MediaKey::Zero,
        }
    }

    /// Convert a keycode to usb hid system control key
    pub(crate) fn as_system_control_usage_id(self) -> Option<SystemControlKey> {
        match self {
            KeyCode::SystemPower => Some(SystemControlKey::PowerDown),
            KeyCode::SystemSleep => Some(SystemControlKey::Sleep),
            KeyCode::SystemWake => Some(SystemControlKey::WakeUp),
            _ => None,
        }
    }
}
