//! Binding identities and the registry of configured triggers.
//!
//! - **`code`** – [`code::BindingCode`], the canonical identity of one
//!   physical key or button, plus its persisted wire form.
//! - **`registry`** – [`registry::BindingRegistry`], the three named bindings
//!   and the rules for resolving a decoded press into counter actions.

pub mod code;
pub mod registry;
