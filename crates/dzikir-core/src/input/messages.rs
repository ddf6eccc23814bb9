//! Win32 input message identifiers (winuser.h).
//!
//! Reference: https://learn.microsoft.com/windows/win32/inputdev/mouse-input-notifications

/// A nonsystem key was pressed.
pub const WM_KEYDOWN: u32 = 0x0100;
/// A nonsystem key was released.
pub const WM_KEYUP: u32 = 0x0101;
/// A key was pressed while ALT was held (or F10).
pub const WM_SYSKEYDOWN: u32 = 0x0104;
/// A system key was released.
pub const WM_SYSKEYUP: u32 = 0x0105;

pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
/// Either extended button went down; the high word of `mouseData` says which.
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;

/// High word of `mouseData` for the first extended button ("back").
pub const XBUTTON1: u16 = 0x0001;
/// High word of `mouseData` for the second extended button ("forward").
pub const XBUTTON2: u16 = 0x0002;

/// Returns `true` for the keyboard messages that denote a physical key press.
pub fn is_key_press(message: u32) -> bool {
    message == WM_KEYDOWN || message == WM_SYSKEYDOWN
}

/// Returns `true` for the mouse messages that denote a button press.
pub fn is_button_press(message: u32) -> bool {
    matches!(
        message,
        WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN | WM_XBUTTONDOWN
    )
}
