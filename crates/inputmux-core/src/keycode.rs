//! Keyboard scan codes and mouse button identifiers.
//!
//! Key codes double as keyboard button indices: a keyboard exposes
//! [`KEYBOARD_BUTTON_COUNT`] buttons and `KeyCode::A as usize` is the index
//! of the `A` key.  The numeric values are the DirectInput-compatible scan
//! codes that every platform backend translates its native codes into.
//!
//! # Why scan codes? (for beginners)
//!
//! A scan code identifies a **physical key position**, not the character it
//! produces.  The key to the right of `Tab` is `KeyCode::Q` on a US layout and
//! still `KeyCode::Q` on a French AZERTY layout where it prints `A`.  Bindings
//! made against scan codes therefore survive layout changes; the character a
//! key produces is delivered separately through `InputHandler::on_unicode`.

use serde::{Deserialize, Serialize};

/// Number of buttons every keyboard exposes (one per possible scan code).
pub const KEYBOARD_BUTTON_COUNT: usize = 256;

/// Declares the [`KeyCode`] enum together with its reverse lookup table.
macro_rules! key_codes {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)+) => {
        /// Keyboard scan code.
        ///
        /// The numeric value of each variant is the button index the key occupies
        /// on a keyboard device.  [`KeyCode::Unassigned`] represents "no key".
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum KeyCode {
            $($(#[$meta])* $name = $value,)+
        }

        impl KeyCode {
            /// Every defined key code in ascending scan-code order.
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$name,)+];

            /// Looks up the key code for a raw scan code.
            ///
            /// Returns `None` for scan codes that have no assigned key.
            pub fn from_scan_code(code: u8) -> Option<KeyCode> {
                match code {
                    $($value => Some(KeyCode::$name),)+
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    Unassigned = 0x00,
    Escape = 0x01,
    Key1 = 0x02,
    Key2 = 0x03,
    Key3 = 0x04,
    Key4 = 0x05,
    Key5 = 0x06,
    Key6 = 0x07,
    Key7 = 0x08,
    Key8 = 0x09,
    Key9 = 0x0A,
    Key0 = 0x0B,
    /// `-` on the main keyboard.
    Minus = 0x0C,
    Equals = 0x0D,
    Backspace = 0x0E,
    Tab = 0x0F,
    Q = 0x10,
    W = 0x11,
    E = 0x12,
    R = 0x13,
    T = 0x14,
    Y = 0x15,
    U = 0x16,
    I = 0x17,
    O = 0x18,
    P = 0x19,
    LeftBracket = 0x1A,
    RightBracket = 0x1B,
    /// Enter on the main keyboard.
    Return = 0x1C,
    LeftControl = 0x1D,
    A = 0x1E,
    S = 0x1F,
    D = 0x20,
    F = 0x21,
    G = 0x22,
    H = 0x23,
    J = 0x24,
    K = 0x25,
    L = 0x26,
    Semicolon = 0x27,
    Apostrophe = 0x28,
    /// Accent / backquote.
    Grave = 0x29,
    LeftShift = 0x2A,
    Backslash = 0x2B,
    Z = 0x2C,
    X = 0x2D,
    C = 0x2E,
    V = 0x2F,
    B = 0x30,
    N = 0x31,
    M = 0x32,
    Comma = 0x33,
    /// `.` on the main keyboard.
    Period = 0x34,
    /// `/` on the main keyboard.
    Slash = 0x35,
    RightShift = 0x36,
    /// `*` on the numeric keypad.
    Multiply = 0x37,
    LeftAlt = 0x38,
    Space = 0x39,
    CapsLock = 0x3A,
    F1 = 0x3B,
    F2 = 0x3C,
    F3 = 0x3D,
    F4 = 0x3E,
    F5 = 0x3F,
    F6 = 0x40,
    F7 = 0x41,
    F8 = 0x42,
    F9 = 0x43,
    F10 = 0x44,
    NumLock = 0x45,
    ScrollLock = 0x46,
    Numpad7 = 0x47,
    Numpad8 = 0x48,
    Numpad9 = 0x49,
    /// `-` on the numeric keypad.
    Subtract = 0x4A,
    Numpad4 = 0x4B,
    Numpad5 = 0x4C,
    Numpad6 = 0x4D,
    /// `+` on the numeric keypad.
    Add = 0x4E,
    Numpad1 = 0x4F,
    Numpad2 = 0x50,
    Numpad3 = 0x51,
    Numpad0 = 0x52,
    /// `.` on the numeric keypad.
    Decimal = 0x53,
    /// `< > |` on UK/German keyboards.
    Oem102 = 0x56,
    F11 = 0x57,
    F12 = 0x58,
    F13 = 0x64,
    F14 = 0x65,
    F15 = 0x66,
    Kana = 0x70,
    /// `/ ?` on Brazilian keyboards.
    AbntC1 = 0x73,
    Convert = 0x79,
    NoConvert = 0x7B,
    Yen = 0x7D,
    /// Numpad `.` on Brazilian keyboards.
    AbntC2 = 0x7E,
    NumpadEquals = 0x8D,
    PrevTrack = 0x90,
    At = 0x91,
    Colon = 0x92,
    Underline = 0x93,
    Kanji = 0x94,
    Stop = 0x95,
    Ax = 0x96,
    Unlabeled = 0x97,
    NextTrack = 0x99,
    NumpadEnter = 0x9C,
    RightControl = 0x9D,
    Mute = 0xA0,
    Calculator = 0xA1,
    PlayPause = 0xA2,
    MediaStop = 0xA4,
    VolumeDown = 0xAE,
    VolumeUp = 0xB0,
    WebHome = 0xB2,
    NumpadComma = 0xB3,
    /// `/` on the numeric keypad.
    Divide = 0xB5,
    SysRq = 0xB7,
    RightAlt = 0xB8,
    Pause = 0xC5,
    Home = 0xC7,
    Up = 0xC8,
    PageUp = 0xC9,
    Left = 0xCB,
    Right = 0xCD,
    End = 0xCF,
    Down = 0xD0,
    PageDown = 0xD1,
    Insert = 0xD2,
    Delete = 0xD3,
    LeftWin = 0xDB,
    RightWin = 0xDC,
    Apps = 0xDD,
    Power = 0xDE,
    Sleep = 0xDF,
    Wake = 0xE3,
    WebSearch = 0xE5,
    WebFavorites = 0xE6,
    WebRefresh = 0xE7,
    WebStop = 0xE8,
    WebForward = 0xE9,
    WebBack = 0xEA,
    MyComputer = 0xEB,
    Mail = 0xEC,
    MediaSelect = 0xED,
}

impl KeyCode {
    /// Returns the keyboard button index this key occupies.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up the key code occupying a keyboard button index.
    ///
    /// Returns `None` when `index` is out of range or has no assigned key.
    pub fn from_index(index: usize) -> Option<KeyCode> {
        u8::try_from(index).ok().and_then(KeyCode::from_scan_code)
    }
}

/// Mouse button identifiers, used as mouse button indices.
///
/// Wheel "clicks" are exposed as two extra buttons so they can be bound to
/// digital channels like any other button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    Button3 = 3,
    Button4 = 4,
    Button5 = 5,
    Button6 = 6,
    Button7 = 7,
    WheelDown = 8,
    WheelUp = 9,
}

impl MouseButton {
    /// Number of buttons every mouse exposes.
    pub const COUNT: usize = 10;

    /// Every mouse button in index order.
    pub const ALL: [MouseButton; MouseButton::COUNT] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Button3,
        MouseButton::Button4,
        MouseButton::Button5,
        MouseButton::Button6,
        MouseButton::Button7,
        MouseButton::WheelDown,
        MouseButton::WheelUp,
    ];

    /// Returns the mouse button index of this button.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up the button at a mouse button index.
    pub fn from_index(index: usize) -> Option<MouseButton> {
        Self::ALL.get(index).copied()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
