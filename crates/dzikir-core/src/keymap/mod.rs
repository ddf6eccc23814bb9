//! Display names for keyboard codes.
//!
//! Bindings are stored as Windows virtual-key codes; the UI shows the name
//! from [`windows_vk`] instead (`"Space"` rather than `32`).

pub mod windows_vk;

/// Returns the display name for a virtual-key code.
///
/// Codes without a table entry (or beyond one byte) render as `Key 0xNN`.
pub fn key_display_name(vk: u32) -> String {
    u8::try_from(vk)
        .ok()
        .and_then(windows_vk::vk_name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Key 0x{vk:02X}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_uses_table_name() {
        assert_eq!(key_display_name(0x20), "Space");
    }

    #[test]
    fn test_unknown_key_falls_back_to_hex() {
        assert_eq!(key_display_name(0x07), "Key 0x07");
        assert_eq!(key_display_name(0x1_0000), "Key 0x10000");
    }
}
