//! # dzikir-core
//!
//! Shared library for Dzikir Counter containing the input decoder, binding
//! model, counter and recording state machines, and the persisted record
//! format.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or the file system.
//! The desktop crate supplies the Windows hooks, the serialized dispatcher
//! and the file-backed persistence around it.
//!
//! # Architecture overview (for beginners)
//!
//! Dzikir Counter is a counter that ticks up whenever a chosen key or mouse
//! button is pressed anywhere on the system, even while another window has
//! focus.  The pipeline is:
//!
//! ```text
//! raw OS message ──► decoder ──► BindingCode ──► BindingRegistry ──► Action
//!                                     │                                │
//!                                     └─► RecordingSession       CounterEngine
//! ```
//!
//! - **`input`** – Raw input messages as delivered by the low-level hooks and
//!   the pure decoder that turns them into a [`BindingCode`].
//!
//! - **`binding`** – The [`BindingCode`] identity, its persisted wire form,
//!   and the [`BindingRegistry`] holding the three configured triggers.
//!
//! - **`recording`** – The "press any key to bind it" state machine.
//!
//! - **`counter`** – Increment/decrement/reset logic with optional targets.
//!
//! - **`record`** – The flat, comma-separated persisted state line.
//!
//! - **`keymap`** – Human-readable names for Windows virtual-key codes.

pub mod binding;
pub mod counter;
pub mod input;
pub mod keymap;
pub mod preset;
pub mod record;
pub mod recording;
pub mod stopwatch;

// Re-export the most-used types at the crate root so callers can write
// `dzikir_core::BindingCode` instead of `dzikir_core::binding::code::BindingCode`.
pub use binding::code::{BindingCode, InputKind, MouseButton};
pub use binding::registry::{
    Action, Binding, BindingError, BindingFlags, BindingRegistry, BindingSlot, Trigger,
};
pub use counter::{CounterEngine, CounterEvent, CounterState, Transition};
pub use input::decoder::{decode, DecodeError};
pub use input::{DeviceClass, RawInputEvent};
pub use preset::Preset;
pub use record::Record;
pub use recording::{RecordedBinding, RecordingError, RecordingSession, RecordingState};
pub use stopwatch::Stopwatch;
