//! Storage infrastructure: configuration and counter state on disk.
//!
//! - **`config`** – The TOML configuration file in the platform config
//!   directory, with defaults on first run.
//! - **`state_file`** – The single-line counter record, loaded at start-up
//!   and rewritten after every change.

pub mod config;
pub mod state_file;
