//! Decodes raw hook messages into canonical [`BindingCode`]s.
//!
//! This is the single place where a raw message becomes a binding identity.
//! The recording path ("which key did the user just press?") and the
//! production path ("does this press match a configured binding?") both call
//! [`decode`], so the two can never disagree about what a press means.
//!
//! # The extended-button ambiguity (for beginners)
//!
//! Windows reports the three standard mouse buttons with their own messages
//! (`WM_LBUTTONDOWN`, `WM_RBUTTONDOWN`, `WM_MBUTTONDOWN`), but both extended
//! "side" buttons arrive as the same `WM_XBUTTONDOWN`.  Which one was pressed
//! is stored in the high 16 bits of `MSLLHOOKSTRUCT::mouseData`:
//!
//! ```text
//! mouseData = 0x0001_0000  ──►  XButton1
//! mouseData = 0x0002_0000  ──►  XButton2
//! ```
//!
//! Any other high word is rejected rather than guessed.

use thiserror::Error;

use super::messages::{
    is_key_press, WM_LBUTTONDOWN, WM_MBUTTONDOWN, WM_RBUTTONDOWN, WM_XBUTTONDOWN, XBUTTON1,
    XBUTTON2,
};
use super::RawInputEvent;
use crate::binding::code::{BindingCode, MouseButton};

/// Reasons a raw message does not decode to a binding code.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// `WM_XBUTTONDOWN` carried a high word naming neither extended button.
    #[error("extended mouse button with unrecognised high word 0x{high_word:04X}")]
    Ambiguous { high_word: u16 },

    /// The message is not a key or button press (release, move, wheel, ...).
    #[error("message 0x{message:04X} is not a key or button press")]
    Unsupported { message: u32 },
}

/// Decodes a raw hook message into a [`BindingCode`].
///
/// Key-down and system key-down both decode to [`BindingCode::Keyboard`].
/// Button-down messages decode to [`BindingCode::Mouse`]; for
/// `WM_XBUTTONDOWN` the button is taken from the high word of `mouse_data`.
///
/// # Errors
///
/// Returns [`DecodeError::Ambiguous`] for an extended-button message whose
/// high word is neither `XBUTTON1` nor `XBUTTON2`, and
/// [`DecodeError::Unsupported`] for every message that is not a press.
pub fn decode(event: &RawInputEvent) -> Result<BindingCode, DecodeError> {
    match *event {
        RawInputEvent::Keyboard { message, vk_code } => {
            if is_key_press(message) {
                Ok(BindingCode::Keyboard(vk_code))
            } else {
                Err(DecodeError::Unsupported { message })
            }
        }
        RawInputEvent::Mouse {
            message,
            mouse_data,
        } => decode_mouse(message, mouse_data).map(BindingCode::Mouse),
    }
}

fn decode_mouse(message: u32, mouse_data: u32) -> Result<MouseButton, DecodeError> {
    match message {
        WM_LBUTTONDOWN => Ok(MouseButton::Left),
        WM_RBUTTONDOWN => Ok(MouseButton::Right),
        WM_MBUTTONDOWN => Ok(MouseButton::Middle),
        WM_XBUTTONDOWN => match high_word(mouse_data) {
            XBUTTON1 => Ok(MouseButton::XButton1),
            XBUTTON2 => Ok(MouseButton::XButton2),
            other => Err(DecodeError::Ambiguous { high_word: other }),
        },
        _ => Err(DecodeError::Unsupported { message }),
    }
}

/// Returns the high-order 16 bits of a 32-bit value (`HIWORD`).
pub fn high_word(value: u32) -> u16 {
    ((value >> 16) & 0xFFFF) as u16
}
