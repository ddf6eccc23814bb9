//! Infrastructure layer for the desktop counter.
//!
//! Contains OS-facing adapters: low-level input hooks, feedback sounds,
//! file-system storage, and the console front end.
//!
//! The `input_capture` seam (`InterceptorHost`, `EventSink`) is consumed by
//! the engine; everything else here depends on `application`, never the
//! other way round.

pub mod audio;
pub mod input_capture;
pub mod storage;
pub mod ui_bridge;
