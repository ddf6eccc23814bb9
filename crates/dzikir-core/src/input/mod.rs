//! Raw input messages delivered by the low-level hooks.
//!
//! A low-level hook callback receives a message identifier (`wParam`) and a
//! pointer to a hook struct (`lParam`).  The infrastructure layer copies the
//! two fields the engine cares about out of that struct into a
//! [`RawInputEvent`] and hands it off; nothing here touches OS memory.
//!
//! The message identifiers are the Win32 values.  They live in
//! [`messages`] rather than being imported from the `windows` crate so that
//! the decoder compiles and is tested on every platform.

use std::fmt;

pub mod decoder;
pub mod messages;

/// The two classes of input device a hook can be installed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

impl DeviceClass {
    /// Both device classes, keyboard first.
    pub const ALL: [DeviceClass; 2] = [DeviceClass::Keyboard, DeviceClass::Mouse];
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Keyboard => f.write_str("keyboard"),
            DeviceClass::Mouse => f.write_str("mouse"),
        }
    }
}

/// A raw input message copied out of a hook callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// A `WH_KEYBOARD_LL` message.
    Keyboard {
        /// The message identifier (`WM_KEYDOWN`, `WM_SYSKEYDOWN`, ...).
        message: u32,
        /// `KBDLLHOOKSTRUCT::vkCode`.
        vk_code: u32,
    },
    /// A `WH_MOUSE_LL` message.
    Mouse {
        /// The message identifier (`WM_LBUTTONDOWN`, `WM_XBUTTONDOWN`, ...).
        message: u32,
        /// `MSLLHOOKSTRUCT::mouseData`; the high word names the extended button.
        mouse_data: u32,
    },
}

impl RawInputEvent {
    /// Returns the device class the event was captured from.
    pub fn device_class(&self) -> DeviceClass {
        match self {
            RawInputEvent::Keyboard { .. } => DeviceClass::Keyboard,
            RawInputEvent::Mouse { .. } => DeviceClass::Mouse,
        }
    }

    /// Convenience constructor for a key press.
    pub fn key_down(vk_code: u32) -> Self {
        RawInputEvent::Keyboard {
            message: messages::WM_KEYDOWN,
            vk_code,
        }
    }

    /// Convenience constructor for a mouse message without auxiliary data.
    pub fn mouse(message: u32) -> Self {
        RawInputEvent::Mouse {
            message,
            mouse_data: 0,
        }
    }

    /// Convenience constructor for an extended-button press carrying `high_word`.
    pub fn x_button_down(high_word: u16) -> Self {
        RawInputEvent::Mouse {
            message: messages::WM_XBUTTONDOWN,
            mouse_data: (high_word as u32) << 16,
        }
    }
}
