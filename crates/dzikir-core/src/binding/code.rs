//! The canonical identity of a physical trigger.
//!
//! # Wire form
//!
//! The persisted record stores a binding as two integers: a code and an
//! [`InputKind`] ordinal.  Keyboard codes are the virtual-key code itself.
//! Mouse codes reuse the Win32 button-down message identifiers, with the two
//! extended buttons sharing `WM_XBUTTONDOWN` and therefore encoded as
//! `WM_XBUTTONDOWN + 1` and `WM_XBUTTONDOWN + 2`:
//!
//! | Button    | Wire code |
//! |-----------|-----------|
//! | Left      | `0x0201`  |
//! | Right     | `0x0204`  |
//! | Middle    | `0x0207`  |
//! | XButton1  | `0x020C`  |
//! | XButton2  | `0x020D`  |
//!
//! That arithmetic is confined to [`BindingCode::to_wire`] and
//! [`BindingCode::from_wire`]; everywhere else a button is a [`MouseButton`].

use std::fmt;

use crate::input::messages::{WM_LBUTTONDOWN, WM_MBUTTONDOWN, WM_RBUTTONDOWN, WM_XBUTTONDOWN};
use crate::input::DeviceClass;
use crate::keymap;

/// A mouse button the engine can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    XButton1,
    XButton2,
}

impl MouseButton {
    /// Returns the persisted wire code for this button.
    pub fn wire_code(self) -> i32 {
        let code = match self {
            MouseButton::Left => WM_LBUTTONDOWN,
            MouseButton::Right => WM_RBUTTONDOWN,
            MouseButton::Middle => WM_MBUTTONDOWN,
            MouseButton::XButton1 => WM_XBUTTONDOWN + 1,
            MouseButton::XButton2 => WM_XBUTTONDOWN + 2,
        };
        code as i32
    }

    /// Parses a persisted wire code; `None` for anything unrecognised.
    pub fn from_wire_code(code: i32) -> Option<Self> {
        const LEFT: i32 = WM_LBUTTONDOWN as i32;
        const RIGHT: i32 = WM_RBUTTONDOWN as i32;
        const MIDDLE: i32 = WM_MBUTTONDOWN as i32;
        const X1: i32 = WM_XBUTTONDOWN as i32 + 1;
        const X2: i32 = WM_XBUTTONDOWN as i32 + 2;

        match code {
            LEFT => Some(MouseButton::Left),
            RIGHT => Some(MouseButton::Right),
            MIDDLE => Some(MouseButton::Middle),
            X1 => Some(MouseButton::XButton1),
            X2 => Some(MouseButton::XButton2),
            _ => None,
        }
    }

    /// Human-readable name shown once the button is bound.
    pub fn display_name(self) -> &'static str {
        match self {
            MouseButton::Left => "Left Click",
            MouseButton::Right => "Right Click",
            MouseButton::Middle => "Middle Click",
            MouseButton::XButton1 => "XButton 1",
            MouseButton::XButton2 => "XButton 2",
        }
    }
}

/// Persisted ordinal describing which kind of input a wire code refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    None = 0,
    Keyboard = 1,
    Mouse = 2,
}

impl InputKind {
    /// Returns the persisted ordinal.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Parses a persisted ordinal.
    pub fn from_ordinal(value: i32) -> Option<Self> {
        match value {
            0 => Some(InputKind::None),
            1 => Some(InputKind::Keyboard),
            2 => Some(InputKind::Mouse),
            _ => None,
        }
    }
}

/// Identifies one physical trigger.
///
/// Equality is structural: `Keyboard(0x41) == Keyboard(0x41)` regardless of
/// which hook produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingCode {
    /// No trigger bound.
    #[default]
    None,
    /// A key, identified by its Windows virtual-key code.
    Keyboard(u32),
    /// A mouse button.
    Mouse(MouseButton),
}

impl BindingCode {
    /// Returns the device class that must be hooked to observe this code.
    pub fn device_class(&self) -> Option<DeviceClass> {
        match self {
            BindingCode::None => None,
            BindingCode::Keyboard(_) => Some(DeviceClass::Keyboard),
            BindingCode::Mouse(_) => Some(DeviceClass::Mouse),
        }
    }

    /// Returns the persisted input kind.
    pub fn kind(&self) -> InputKind {
        match self {
            BindingCode::None => InputKind::None,
            BindingCode::Keyboard(_) => InputKind::Keyboard,
            BindingCode::Mouse(_) => InputKind::Mouse,
        }
    }

    /// Encodes the code into its persisted `(code, kind)` pair.
    pub fn to_wire(&self) -> (i32, InputKind) {
        match *self {
            BindingCode::None => (0, InputKind::None),
            BindingCode::Keyboard(vk) => (vk as i32, InputKind::Keyboard),
            BindingCode::Mouse(button) => (button.wire_code(), InputKind::Mouse),
        }
    }

    /// Decodes a persisted `(code, kind)` pair.
    ///
    /// Pairs that cannot name a real trigger (negative key codes, unknown
    /// mouse codes) decode to [`BindingCode::None`].
    pub fn from_wire(code: i32, kind: InputKind) -> Self {
        match kind {
            InputKind::None => BindingCode::None,
            InputKind::Keyboard => u32::try_from(code)
                .map(BindingCode::Keyboard)
                .unwrap_or(BindingCode::None),
            InputKind::Mouse => MouseButton::from_wire_code(code)
                .map(BindingCode::Mouse)
                .unwrap_or(BindingCode::None),
        }
    }

    /// Human-readable name for the bound trigger.
    pub fn display_name(&self) -> String {
        match *self {
            BindingCode::None => "None".to_string(),
            BindingCode::Keyboard(vk) => keymap::key_display_name(vk),
            BindingCode::Mouse(button) => button.display_name().to_string(),
        }
    }
}

impl fmt::Display for BindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
