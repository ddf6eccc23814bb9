//! The persisted state line.
//!
//! State is stored as a single comma-separated line whose field order is
//! significant:
//!
//! ```text
//! idx  field                    example
//! 0    currentCount             12
//! 1    xButtonHookEnabled       True
//! 2    leftButtonHookEnabled    False
//! 3    customHookEnabled        True
//! 4    customInputCode          32
//! 5    customInputTypeOrdinal   1          (0 = None, 1 = Keyboard, 2 = Mouse)
//! 6    customInputDisplayName   Space
//! 7    selectedPresetName       SubhanAllah (33)
//! 8    soundEnabled             True
//! 9    targetCount              33
//! ```
//!
//! # Backward compatibility
//!
//! Older versions wrote fewer fields, so fields are read in groups: 0–2 when
//! at least 3 fields exist, 3–6 when at least 7 exist, 7–8 when at least 9
//! exist, and 9 when all 10 exist.  Every field is parsed on its own; a
//! malformed field keeps its default instead of failing the whole load.
//!
//! A line with a preset but no target takes the preset's target; a stored
//! target always wins.

use std::fmt;

use crate::binding::code::InputKind;
use crate::preset::Preset;

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub current_count: u64,
    pub x_button_enabled: bool,
    pub left_button_enabled: bool,
    pub custom_enabled: bool,
    /// Wire code of the custom binding (see [`crate::BindingCode::to_wire`]).
    pub custom_input_code: i32,
    pub custom_input_kind: InputKind,
    pub custom_input_name: String,
    pub selected_preset: String,
    pub sound_enabled: bool,
    pub target_count: u32,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            current_count: 0,
            x_button_enabled: false,
            left_button_enabled: false,
            custom_enabled: false,
            custom_input_code: 0,
            custom_input_kind: InputKind::None,
            custom_input_name: "None".to_string(),
            selected_preset: Preset::FreeCount.name().to_string(),
            sound_enabled: true,
            target_count: 0,
        }
    }
}

impl Record {
    /// Parses a persisted line, falling back to defaults field by field.
    ///
    /// Never fails: an empty or truncated line yields defaults for every
    /// missing field.
    pub fn parse(line: &str) -> Self {
        let mut record = Record::default();
        let line = line.trim_end_matches(['\r', '\n']);
        let parts: Vec<&str> = line.split(',').collect();

        if parts.len() < 3 {
            if !line.is_empty() {
                tracing::warn!(fields = parts.len(), "state line too short, using defaults");
            }
            return record;
        }

        assign(&mut record.current_count, 0, parts[0], parse_number);
        assign(&mut record.x_button_enabled, 1, parts[1], parse_bool);
        assign(&mut record.left_button_enabled, 2, parts[2], parse_bool);

        if parts.len() >= 7 {
            assign(&mut record.custom_enabled, 3, parts[3], parse_bool);
            assign(&mut record.custom_input_code, 4, parts[4], parse_number);
            assign(&mut record.custom_input_kind, 5, parts[5], |s| {
                parse_number(s).and_then(InputKind::from_ordinal)
            });
            record.custom_input_name = parts[6].to_string();
        }

        if parts.len() >= 9 {
            record.selected_preset = parts[7].to_string();
            assign(&mut record.sound_enabled, 8, parts[8], parse_bool);
            // Lines without field 9 take the target from the stored preset.
            if let Some(preset) = Preset::from_name(&record.selected_preset) {
                record.target_count = preset.target(0);
            }
        }

        if parts.len() >= 10 {
            assign(&mut record.target_count, 9, parts[9], parse_number);
        }

        record
    }

    /// Serializes the record into its persisted line (no trailing newline).
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{}",
            self.current_count,
            format_bool(self.x_button_enabled),
            format_bool(self.left_button_enabled),
            format_bool(self.custom_enabled),
            self.custom_input_code,
            self.custom_input_kind.ordinal(),
            sanitize(&self.custom_input_name),
            sanitize(&self.selected_preset),
            format_bool(self.sound_enabled),
            self.target_count,
        )
    }
}

fn assign<T>(slot: &mut T, index: usize, raw: &str, parse: impl FnOnce(&str) -> Option<T>) {
    match parse(raw) {
        Some(value) => *slot = value,
        None => tracing::debug!(index, raw, "skipping malformed state field"),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Commas would shift every later field, so they are written as spaces.
fn sanitize(text: &str) -> String {
    text.replace([',', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_LINE: &str = "12,True,False,True,32,1,Space,SubhanAllah (33),False,33";

    #[test]
    fn test_full_line_parses_every_field() {
        // Act
        let record = Record::parse(FULL_LINE);

        // Assert
        assert_eq!(
            record,
            Record {
                current_count: 12,
                x_button_enabled: true,
                left_button_enabled: false,
                custom_enabled: true,
                custom_input_code: 32,
                custom_input_kind: InputKind::Keyboard,
                custom_input_name: "Space".to_string(),
                selected_preset: "SubhanAllah (33)".to_string(),
                sound_enabled: false,
                target_count: 33,
            }
        );
    }

    #[test]
    fn test_full_line_round_trips_byte_for_byte() {
        assert_eq!(Record::parse(FULL_LINE).to_line(), FULL_LINE);
    }

    #[test]
    fn test_default_record_line() {
        assert_eq!(
            Record::default().to_line(),
            "0,False,False,False,0,0,None,Free Count (∞),True,0"
        );
    }

    #[test]
    fn test_three_field_line_defaults_the_rest() {
        let record = Record::parse("7,True,True");
        assert_eq!(record.current_count, 7);
        assert!(record.x_button_enabled);
        assert!(record.left_button_enabled);
        assert_eq!(
            Record {
                current_count: 0,
                x_button_enabled: false,
                left_button_enabled: false,
                ..record
            },
            Record::default()
        );
    }

    #[test]
    fn test_seven_field_line_reads_custom_binding_only() {
        let record = Record::parse("1,False,False,True,524,2,Left Click");
        assert_eq!(record.custom_input_code, 524);
        assert_eq!(record.custom_input_kind, InputKind::Mouse);
        assert_eq!(record.custom_input_name, "Left Click");
        assert_eq!(record.target_count, 0);
        assert!(record.sound_enabled);
    }

    #[test]
    fn test_partial_group_is_ignored() {
        // Five fields: the 3..=6 group needs seven, so it is skipped entirely.
        let record = Record::parse("4,True,True,True,65");
        assert!(!record.custom_enabled);
        assert_eq!(record.custom_input_code, 0);
    }

    #[test]
    fn test_malformed_field_keeps_default_without_failing_others() {
        let record = Record::parse("abc,maybe,True,True,x,9,Name,Salawat (100),yes,-4");
        assert_eq!(record.current_count, 0);
        assert!(!record.x_button_enabled);
        assert!(record.left_button_enabled);
        assert!(record.custom_enabled);
        assert_eq!(record.custom_input_code, 0);
        assert_eq!(record.custom_input_kind, InputKind::None);
        assert_eq!(record.custom_input_name, "Name");
        assert_eq!(record.selected_preset, "Salawat (100)");
        assert!(record.sound_enabled);
        // A malformed target keeps the one the preset selected.
        assert_eq!(record.target_count, 100);
    }

    #[test]
    fn test_nine_field_line_takes_target_from_preset() {
        // Arrange
        let line = "5,False,False,False,0,0,None,SubhanAllah (33),True";

        // Act
        let record = Record::parse(line);

        // Assert
        assert_eq!(record.selected_preset, "SubhanAllah (33)");
        assert_eq!(record.target_count, 33);
        assert_eq!(record.current_count, 5);
    }

    #[test]
    fn test_nine_field_line_with_custom_goal_starts_at_default_target() {
        let record = Record::parse("0,False,False,False,0,0,None,Custom Goal...,True");
        assert_eq!(record.target_count, Preset::DEFAULT_CUSTOM_TARGET);
    }

    #[test]
    fn test_nine_field_line_with_unknown_preset_stays_unbounded() {
        let record = Record::parse("0,False,False,False,0,0,None,Morning Set,True");
        assert_eq!(record.selected_preset, "Morning Set");
        assert_eq!(record.target_count, 0);
    }

    #[test]
    fn test_stored_target_overrides_preset_target() {
        let record = Record::parse("0,False,False,False,0,0,None,Tahlil (1000),True,250");
        assert_eq!(record.target_count, 250);
    }

    #[test]
    fn test_booleans_parse_case_insensitively_with_whitespace() {
        let record = Record::parse("3, true ,FALSE,false");
        assert!(record.x_button_enabled);
        assert!(!record.left_button_enabled);
    }

    #[test]
    fn test_empty_and_short_lines_yield_defaults() {
        assert_eq!(Record::parse(""), Record::default());
        assert_eq!(Record::parse("5,True"), Record::default());
    }

    #[test]
    fn test_trailing_newline_is_tolerated() {
        assert_eq!(Record::parse(&format!("{FULL_LINE}\r\n")).to_line(), FULL_LINE);
    }

    #[test]
    fn test_commas_in_names_are_sanitized_on_write() {
        let record = Record {
            custom_input_name: "Key, odd".to_string(),
            ..Record::default()
        };
        let reparsed = Record::parse(&record.to_line());
        assert_eq!(reparsed.custom_input_name, "Key  odd");
        assert_eq!(reparsed.target_count, 0);
        assert!(reparsed.sound_enabled);
    }
}
