//! Application layer for the desktop counter.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The application layer sits between the pure core (`dzikir_core`) and the
//! infrastructure (OS hooks, files, console).  It:
//!
//! - **Orchestrates** the core state machines to fulfil a user goal (e.g.,
//!   "count every press of the bound mouse button").
//! - **Depends on abstractions** (traits) rather than concrete
//!   implementations, so hooks, sounds and storage can be swapped in tests.
//! - **Contains no OS calls and no file system access**.
//!
//! # Sub-modules
//!
//! - **`collaborators`** – The traits the engine talks to: persistence,
//!   audio, the session timer and the presentation observer.
//!
//! - **`engine`** – Owns the binding registry, counter, recording session
//!   and the set of installed interceptors.  Every input event and UI
//!   command ends up here.
//!
//! - **`dispatcher`** – Runs the engine on one Tokio task, draining hook
//!   events and UI commands in order and publishing state for persistence.

pub mod collaborators;
pub mod dispatcher;
pub mod engine;
