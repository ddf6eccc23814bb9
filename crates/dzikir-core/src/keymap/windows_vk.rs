//! Windows Virtual Key (VK) code to display-name table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//! Windows VK codes range from 0x00 to 0xFF.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  They are "virtual" because they represent *logical* keys
//! rather than physical scan codes: pressing the letter A on any keyboard layout
//! always produces `VK_A = 0x41`.
//!
//! # How this table works
//!
//! `VK_NAME_TABLE` is a compile-time constant array of 256 optional names,
//! indexed by VK code.  The names follow the `Windows.System.VirtualKey`
//! enumeration, so a binding recorded here reads the same as one shown by
//! other Windows tools.

/// Returns the name of a VK code, or `None` if the code has no name.
pub fn vk_name(vk: u8) -> Option<&'static str> {
    VK_NAME_TABLE[vk as usize]
}

/// Complete VK → name table indexed by VK code (0x00–0xFF).
const VK_NAME_TABLE: [Option<&str>; 256] = {
    let mut t: [Option<&str>; 256] = [None; 256];

    // ── Alphabet keys (VK_A=0x41 … VK_Z=0x5A) ────────────────────────────────
    t[0x41] = Some("A");
    t[0x42] = Some("B");
    t[0x43] = Some("C");
    t[0x44] = Some("D");
    t[0x45] = Some("E");
    t[0x46] = Some("F");
    t[0x47] = Some("G");
    t[0x48] = Some("H");
    t[0x49] = Some("I");
    t[0x4A] = Some("J");
    t[0x4B] = Some("K");
    t[0x4C] = Some("L");
    t[0x4D] = Some("M");
    t[0x4E] = Some("N");
    t[0x4F] = Some("O");
    t[0x50] = Some("P");
    t[0x51] = Some("Q");
    t[0x52] = Some("R");
    t[0x53] = Some("S");
    t[0x54] = Some("T");
    t[0x55] = Some("U");
    t[0x56] = Some("V");
    t[0x57] = Some("W");
    t[0x58] = Some("X");
    t[0x59] = Some("Y");
    t[0x5A] = Some("Z");

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ───────────────────────────────────
    t[0x30] = Some("Number0");
    t[0x31] = Some("Number1");
    t[0x32] = Some("Number2");
    t[0x33] = Some("Number3");
    t[0x34] = Some("Number4");
    t[0x35] = Some("Number5");
    t[0x36] = Some("Number6");
    t[0x37] = Some("Number7");
    t[0x38] = Some("Number8");
    t[0x39] = Some("Number9");

    // ── Control keys ─────────────────────────────────────────────────────────
    t[0x08] = Some("Back");         // VK_BACK
    t[0x09] = Some("Tab");          // VK_TAB
    t[0x0C] = Some("Clear");        // VK_CLEAR
    t[0x0D] = Some("Enter");        // VK_RETURN
    t[0x10] = Some("Shift");        // VK_SHIFT
    t[0x11] = Some("Control");      // VK_CONTROL
    t[0x12] = Some("Menu");         // VK_MENU (Alt)
    t[0x13] = Some("Pause");        // VK_PAUSE
    t[0x14] = Some("CapitalLock");  // VK_CAPITAL
    t[0x1B] = Some("Escape");       // VK_ESCAPE
    t[0x20] = Some("Space");        // VK_SPACE
    t[0x21] = Some("PageUp");       // VK_PRIOR
    t[0x22] = Some("PageDown");     // VK_NEXT
    t[0x23] = Some("End");          // VK_END
    t[0x24] = Some("Home");         // VK_HOME
    t[0x2C] = Some("Snapshot");     // VK_SNAPSHOT
    t[0x2D] = Some("Insert");       // VK_INSERT
    t[0x2E] = Some("Delete");       // VK_DELETE
    t[0x5D] = Some("Application");  // VK_APPS
    t[0x5F] = Some("Sleep");        // VK_SLEEP
    t[0x90] = Some("NumberKeyLock"); // VK_NUMLOCK
    t[0x91] = Some("Scroll");       // VK_SCROLL

    // ── Arrow keys ────────────────────────────────────────────────────────────
    t[0x25] = Some("Left");
    t[0x26] = Some("Up");
    t[0x27] = Some("Right");
    t[0x28] = Some("Down");

    // ── Function keys (VK_F1=0x70 … VK_F24=0x87) ─────────────────────────────
    t[0x70] = Some("F1");
    t[0x71] = Some("F2");
    t[0x72] = Some("F3");
    t[0x73] = Some("F4");
    t[0x74] = Some("F5");
    t[0x75] = Some("F6");
    t[0x76] = Some("F7");
    t[0x77] = Some("F8");
    t[0x78] = Some("F9");
    t[0x79] = Some("F10");
    t[0x7A] = Some("F11");
    t[0x7B] = Some("F12");
    t[0x7C] = Some("F13");
    t[0x7D] = Some("F14");
    t[0x7E] = Some("F15");
    t[0x7F] = Some("F16");
    t[0x80] = Some("F17");
    t[0x81] = Some("F18");
    t[0x82] = Some("F19");
    t[0x83] = Some("F20");
    t[0x84] = Some("F21");
    t[0x85] = Some("F22");
    t[0x86] = Some("F23");
    t[0x87] = Some("F24");

    // ── Numpad (VK_NUMPAD0=0x60 … VK_NUMPAD9=0x69) ───────────────────────────
    t[0x60] = Some("NumberPad0");
    t[0x61] = Some("NumberPad1");
    t[0x62] = Some("NumberPad2");
    t[0x63] = Some("NumberPad3");
    t[0x64] = Some("NumberPad4");
    t[0x65] = Some("NumberPad5");
    t[0x66] = Some("NumberPad6");
    t[0x67] = Some("NumberPad7");
    t[0x68] = Some("NumberPad8");
    t[0x69] = Some("NumberPad9");
    t[0x6A] = Some("Multiply");     // VK_MULTIPLY
    t[0x6B] = Some("Add");          // VK_ADD
    t[0x6C] = Some("Separator");    // VK_SEPARATOR
    t[0x6D] = Some("Subtract");     // VK_SUBTRACT
    t[0x6E] = Some("Decimal");      // VK_DECIMAL
    t[0x6F] = Some("Divide");       // VK_DIVIDE

    // ── Modifier keys ─────────────────────────────────────────────────────────
    t[0xA0] = Some("LeftShift");    // VK_LSHIFT
    t[0xA1] = Some("RightShift");   // VK_RSHIFT
    t[0xA2] = Some("LeftControl");  // VK_LCONTROL
    t[0xA3] = Some("RightControl"); // VK_RCONTROL
    t[0xA4] = Some("LeftMenu");     // VK_LMENU
    t[0xA5] = Some("RightMenu");    // VK_RMENU
    t[0x5B] = Some("LeftWindows");  // VK_LWIN
    t[0x5C] = Some("RightWindows"); // VK_RWIN

    // ── Browser / media keys ─────────────────────────────────────────────────
    t[0xA6] = Some("GoBack");       // VK_BROWSER_BACK
    t[0xA7] = Some("GoForward");    // VK_BROWSER_FORWARD
    t[0xA8] = Some("Refresh");      // VK_BROWSER_REFRESH
    t[0xA9] = Some("Stop");         // VK_BROWSER_STOP
    t[0xAA] = Some("Search");       // VK_BROWSER_SEARCH
    t[0xAB] = Some("Favorites");    // VK_BROWSER_FAVORITES
    t[0xAC] = Some("GoHome");       // VK_BROWSER_HOME

    t
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Pairs of (VK code, expected name) for common keys.
    const STANDARD_NAMES: &[(u8, &str)] = &[
        (0x41, "A"), (0x5A, "Z"),
        (0x30, "Number0"), (0x39, "Number9"),
        (0x70, "F1"), (0x7B, "F12"),
        (0x25, "Left"), (0x28, "Down"),
        (0x0D, "Enter"), (0x1B, "Escape"), (0x08, "Back"), (0x20, "Space"),
        (0x60, "NumberPad0"), (0x6B, "Add"),
        (0xA0, "LeftShift"), (0x5B, "LeftWindows"),
    ];

    #[test]
    fn test_standard_vk_codes_have_expected_names() {
        for &(vk, expected) in STANDARD_NAMES {
            assert_eq!(
                vk_name(vk),
                Some(expected),
                "vk_name(0x{vk:02X}) should return {expected:?}"
            );
        }
    }

    #[test]
    fn test_all_26_letter_keys_are_named() {
        for vk in 0x41u8..=0x5Au8 {
            let name = vk_name(vk).expect("letter must be named");
            assert_eq!(name.len(), 1);
            assert_eq!(name.as_bytes()[0], vk);
        }
    }

    #[test]
    fn test_mouse_and_undefined_vk_codes_have_no_name() {
        for vk in [0x00u8, 0x01, 0x02, 0x04, 0x05, 0x06, 0x07, 0x0A, 0xFF] {
            assert_eq!(vk_name(vk), None, "vk 0x{vk:02X} should be unnamed");
        }
    }

    #[test]
    fn test_vk_name_never_panics_for_any_u8() {
        for vk in 0u8..=255 {
            let _ = vk_name(vk);
        }
    }
}
