//! Console command bridge: exposes engine operations to a line-based UI.
//!
//! Each line typed on stdin is parsed into a [`UiCommand`] and forwarded to
//! the dispatcher through an [`EngineHandle`].  Engine notifications come
//! back through [`ConsoleObserver`], which prints them.
//!
//! # Commands
//!
//! ```text
//! inc | +                 count one up
//! dec | -                 count one down
//! reset                   back to zero (timer untouched)
//! target <n>              set the goal; 0 means unbounded
//! preset <name|index>     pick a preset from `presets`
//! presets                 list presets
//! record                  bind the next key or button to the custom slot
//! cancel                  abandon recording
//! enable|disable <slot>   slot is xbutton, left or custom
//! bind <slot> key <vk>    bind a virtual-key code directly (hex with 0x)
//! bind <slot> mouse <btn> left, right, middle, x1 or x2
//! sound on|off
//! timer start|pause|reset
//! status
//! help
//! quit
//! ```
//!
//! The parser is a plain [`FromStr`] impl so it can be tested without a
//! terminal.

use std::str::FromStr;
use std::time::Duration;

use dzikir_core::{BindingCode, BindingSlot, MouseButton, Preset, RecordingState};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::collaborators::EngineObserver;
use crate::application::dispatcher::{DispatchError, EngineHandle, TimerCommand};
use crate::application::engine::EngineSnapshot;

// ── Commands ──────────────────────────────────────────────────────────────────

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Increment,
    Decrement,
    Reset,
    SetTarget(u32),
    SelectPreset(String),
    ListPresets,
    StartRecording,
    CancelRecording,
    SetEnabled(BindingSlot, bool),
    SetBinding(BindingSlot, BindingCode),
    SetSound(bool),
    Timer(TimerCommand),
    Status,
    Help,
    Quit,
}

/// Error returned for a line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl FromStr for UiCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandParseError::Empty)?;
        let head_lower = head.to_ascii_lowercase();

        let command = match head_lower.as_str() {
            "inc" | "+" => UiCommand::Increment,
            "dec" | "-" => UiCommand::Decrement,
            "reset" => UiCommand::Reset,
            "target" => {
                let value = required(words.next(), "target", "a number")?;
                let target = value
                    .parse()
                    .map_err(|_| invalid("target", value))?;
                UiCommand::SetTarget(target)
            }
            "preset" => {
                let rest: Vec<&str> = words.by_ref().collect();
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "preset",
                        expected: "a name or index",
                    });
                }
                UiCommand::SelectPreset(resolve_preset(&rest.join(" ")))
            }
            "presets" => UiCommand::ListPresets,
            "record" => UiCommand::StartRecording,
            "cancel" => UiCommand::CancelRecording,
            "enable" | "disable" => {
                let value = required(words.next(), "enable", "a slot")?;
                UiCommand::SetEnabled(parse_slot(value)?, head_lower == "enable")
            }
            "bind" => {
                let slot = parse_slot(required(words.next(), "bind", "a slot")?)?;
                let kind = required(words.next(), "bind", "`key` or `mouse`")?;
                let value = required(words.next(), "bind", "a key code or button")?;
                let code = match kind.to_ascii_lowercase().as_str() {
                    "key" => BindingCode::Keyboard(parse_vk(value)?),
                    "mouse" => BindingCode::Mouse(parse_button(value)?),
                    _ => return Err(invalid("bind", kind)),
                };
                UiCommand::SetBinding(slot, code)
            }
            "sound" => UiCommand::SetSound(parse_on_off(required(
                words.next(),
                "sound",
                "`on` or `off`",
            )?)?),
            "timer" => {
                let value = required(words.next(), "timer", "start, pause or reset")?;
                let command = match value.to_ascii_lowercase().as_str() {
                    "start" => TimerCommand::Start,
                    "pause" => TimerCommand::Pause,
                    "reset" => TimerCommand::Reset,
                    _ => return Err(invalid("timer", value)),
                };
                UiCommand::Timer(command)
            }
            "status" => UiCommand::Status,
            "help" | "?" => UiCommand::Help,
            "quit" | "exit" => UiCommand::Quit,
            _ => return Err(CommandParseError::Unknown(head.to_string())),
        };
        Ok(command)
    }
}

fn required<'a>(
    word: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandParseError> {
    word.ok_or(CommandParseError::MissingArgument { command, expected })
}

fn invalid(command: &'static str, value: &str) -> CommandParseError {
    CommandParseError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

fn parse_slot(value: &str) -> Result<BindingSlot, CommandParseError> {
    BindingSlot::ALL
        .into_iter()
        .find(|slot| slot.to_string().eq_ignore_ascii_case(value))
        .ok_or_else(|| invalid("slot", value))
}

fn parse_on_off(value: &str) -> Result<bool, CommandParseError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(invalid("sound", value)),
    }
}

fn parse_vk(value: &str) -> Result<u32, CommandParseError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    match parsed {
        Ok(vk) if vk > 0 && vk <= 0xFF => Ok(vk),
        _ => Err(invalid("key", value)),
    }
}

fn parse_button(value: &str) -> Result<MouseButton, CommandParseError> {
    match value.to_ascii_lowercase().as_str() {
        "left" => Ok(MouseButton::Left),
        "right" => Ok(MouseButton::Right),
        "middle" => Ok(MouseButton::Middle),
        "x1" | "xbutton1" => Ok(MouseButton::XButton1),
        "x2" | "xbutton2" => Ok(MouseButton::XButton2),
        _ => Err(invalid("mouse", value)),
    }
}

/// Maps a 1-based menu index to its preset name; anything else is passed
/// through as a name.
fn resolve_preset(value: &str) -> String {
    value
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| Preset::ALL.get(index))
        .map(|preset| preset.name().to_string())
        .unwrap_or_else(|| value.to_string())
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// What the console loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print; the observer reports the effect.
    Sent,
    /// Text to print.
    Text(String),
    /// Stop reading input.
    Quit,
}

/// Forwards `command` to the engine.
///
/// # Errors
///
/// Returns [`DispatchError::Closed`] once the dispatcher has stopped.
pub async fn dispatch(handle: &EngineHandle, command: UiCommand) -> Result<Reply, DispatchError> {
    match command {
        UiCommand::Increment => handle.increment()?,
        UiCommand::Decrement => handle.decrement()?,
        UiCommand::Reset => handle.reset()?,
        UiCommand::SetTarget(target) => handle.set_target(target)?,
        UiCommand::SelectPreset(name) => handle.select_preset(name)?,
        UiCommand::ListPresets => return Ok(Reply::Text(format_presets())),
        UiCommand::StartRecording => handle.start_recording()?,
        UiCommand::CancelRecording => handle.cancel_recording()?,
        UiCommand::SetEnabled(slot, enabled) => handle.set_enabled(slot, enabled)?,
        UiCommand::SetBinding(slot, code) => {
            let name = code.display_name();
            handle.set_binding(slot, code, name)?;
        }
        UiCommand::SetSound(enabled) => handle.set_sound_enabled(enabled)?,
        UiCommand::Timer(timer) => handle.timer(timer)?,
        UiCommand::Status => return Ok(Reply::Text(format_status(&handle.snapshot().await?))),
        UiCommand::Help => return Ok(Reply::Text(HELP.to_string())),
        UiCommand::Quit => {
            handle.shutdown()?;
            return Ok(Reply::Quit);
        }
    }
    Ok(Reply::Sent)
}

const HELP: &str = "commands: inc, dec, reset, target <n>, preset <name|index>, presets, \
record, cancel, enable|disable <xbutton|left|custom>, bind <slot> key <vk>|mouse <btn>, \
sound on|off, timer start|pause|reset, status, quit";

// ── Formatting ────────────────────────────────────────────────────────────────

/// Formats a duration as `hh:mm:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Formats the target, with `∞` for an unbounded counter.
pub fn format_target(target: u32) -> String {
    if target == 0 {
        "∞".to_string()
    } else {
        target.to_string()
    }
}

pub fn format_presets() -> String {
    Preset::ALL
        .iter()
        .enumerate()
        .map(|(i, preset)| format!("{:>2}. {}", i + 1, preset.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a multi-line status report.
pub fn format_status(snapshot: &EngineSnapshot) -> String {
    let mut out = format!(
        "count {} / {}  (cycle {})\npreset {}  sound {}\ntimer {} {}\n",
        snapshot.current,
        format_target(snapshot.target),
        snapshot.progress,
        snapshot.selected_preset,
        if snapshot.sound_enabled { "on" } else { "off" },
        format_elapsed(snapshot.elapsed),
        if snapshot.timer_running { "running" } else { "paused" },
    );
    for (slot, binding) in &snapshot.bindings {
        out.push_str(&format!(
            "{:<8} {:<4} {}\n",
            slot.to_string(),
            if binding.enabled { "on" } else { "off" },
            binding.display_name,
        ));
    }
    if snapshot.recording == RecordingState::Armed {
        out.push_str("recording: press any key or button\n");
    }
    let hooked: Vec<String> = snapshot
        .hooked_devices
        .iter()
        .map(ToString::to_string)
        .collect();
    out.push_str(&format!(
        "hooks {}",
        if hooked.is_empty() {
            "none".to_string()
        } else {
            hooked.join(", ")
        }
    ));
    out
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints engine notifications to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl EngineObserver for ConsoleObserver {
    fn on_counter_changed(&self, current: u64, target: u32) {
        println!("{current} / {}", format_target(target));
    }

    fn on_target_reached(&self, current: u64, target: u32) {
        println!("target reached: {current} / {target}");
    }

    fn on_cycle_reset(&self, current: u64) {
        println!("new cycle at {current}");
    }

    fn on_binding_recorded(&self, display_name: &str) {
        println!("bound: {display_name}");
    }

    fn on_recording_state(&self, state: RecordingState) {
        match state {
            RecordingState::Armed => println!("press any key or mouse button to bind it"),
            RecordingState::Cancelled => println!("recording cancelled"),
            RecordingState::Completed | RecordingState::Idle => {}
        }
    }
}

// ── Console loop ──────────────────────────────────────────────────────────────

/// Reads commands from stdin until `quit`, end of input, or the dispatcher
/// stops.
///
/// End of input does not stop the engine, so the counter keeps working when
/// stdin is closed (e.g. when started detached).
pub async fn run_console(handle: EngineHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("console input closed");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "console read failed");
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<UiCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match dispatch(&handle, command).await {
            Ok(Reply::Sent) => {}
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Quit) => return,
            Err(e) => {
                tracing::debug!(error = %e, "console stopping");
                return;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dzikir_core::{Binding, DeviceClass};

    #[test]
    fn test_parse_counting_commands() {
        assert_eq!("inc".parse(), Ok(UiCommand::Increment));
        assert_eq!("+".parse(), Ok(UiCommand::Increment));
        assert_eq!("DEC".parse(), Ok(UiCommand::Decrement));
        assert_eq!("  reset  ".parse(), Ok(UiCommand::Reset));
        assert_eq!("target 33".parse(), Ok(UiCommand::SetTarget(33)));
    }

    #[test]
    fn test_parse_target_rejects_non_numbers() {
        assert_eq!(
            "target many".parse::<UiCommand>(),
            Err(CommandParseError::InvalidArgument {
                command: "target",
                value: "many".to_string()
            })
        );
        assert!(matches!(
            "target".parse::<UiCommand>(),
            Err(CommandParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_preset_by_index_and_name() {
        assert_eq!(
            "preset 3".parse(),
            Ok(UiCommand::SelectPreset("SubhanAllah (33)".to_string()))
        );
        assert_eq!(
            "preset Istighfar (100)".parse(),
            Ok(UiCommand::SelectPreset("Istighfar (100)".to_string()))
        );
        // Out-of-range indices fall through as names.
        assert_eq!(
            "preset 99".parse(),
            Ok(UiCommand::SelectPreset("99".to_string()))
        );
    }

    #[test]
    fn test_parse_slot_commands() {
        assert_eq!(
            "enable xbutton".parse(),
            Ok(UiCommand::SetEnabled(BindingSlot::XButton, true))
        );
        assert_eq!(
            "disable Custom".parse(),
            Ok(UiCommand::SetEnabled(BindingSlot::Custom, false))
        );
        assert!("enable nose".parse::<UiCommand>().is_err());
    }

    #[test]
    fn test_parse_bind_key_and_mouse() {
        assert_eq!(
            "bind custom key 0x20".parse(),
            Ok(UiCommand::SetBinding(
                BindingSlot::Custom,
                BindingCode::Keyboard(0x20)
            ))
        );
        assert_eq!(
            "bind custom key 112".parse(),
            Ok(UiCommand::SetBinding(
                BindingSlot::Custom,
                BindingCode::Keyboard(112)
            ))
        );
        assert_eq!(
            "bind custom mouse x1".parse(),
            Ok(UiCommand::SetBinding(
                BindingSlot::Custom,
                BindingCode::Mouse(MouseButton::XButton1)
            ))
        );
        assert!("bind custom key 0".parse::<UiCommand>().is_err());
        assert!("bind custom key 0x1FF".parse::<UiCommand>().is_err());
        assert!("bind custom pedal 1".parse::<UiCommand>().is_err());
    }

    #[test]
    fn test_parse_sound_and_timer() {
        assert_eq!("sound off".parse(), Ok(UiCommand::SetSound(false)));
        assert_eq!("sound ON".parse(), Ok(UiCommand::SetSound(true)));
        assert_eq!(
            "timer pause".parse(),
            Ok(UiCommand::Timer(TimerCommand::Pause))
        );
        assert!("timer rewind".parse::<UiCommand>().is_err());
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        assert_eq!("".parse::<UiCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "jump".parse::<UiCommand>(),
            Err(CommandParseError::Unknown("jump".to_string()))
        );
    }

    #[test]
    fn test_format_elapsed_and_target() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "01:02:05");
        assert_eq!(format_target(0), "∞");
        assert_eq!(format_target(33), "33");
    }

    #[test]
    fn test_format_presets_lists_every_preset_numbered() {
        let listing = format_presets();
        assert_eq!(listing.lines().count(), Preset::ALL.len());
        assert!(listing.starts_with(" 1. Free Count (∞)"));
    }

    #[test]
    fn test_format_status_shows_bindings_and_hooks() {
        // Arrange
        let snapshot = EngineSnapshot {
            current: 12,
            target: 33,
            progress: 12,
            selected_preset: "SubhanAllah (33)".to_string(),
            sound_enabled: true,
            bindings: vec![(
                BindingSlot::Custom,
                Binding {
                    code: BindingCode::Keyboard(0x20),
                    enabled: true,
                    display_name: "Space".to_string(),
                },
            )],
            recording: RecordingState::Armed,
            timer_running: false,
            elapsed: Duration::from_secs(61),
            hooked_devices: vec![DeviceClass::Keyboard],
        };

        // Act
        let text = format_status(&snapshot);

        // Assert
        assert!(text.contains("count 12 / 33"));
        assert!(text.contains("00:01:01 paused"));
        assert!(text.contains("Space"));
        assert!(text.contains("recording"));
        assert!(text.ends_with(&format!("hooks {}", DeviceClass::Keyboard)));
    }
}
