//! Input capture infrastructure for the desktop application.
//!
//! On Windows, each installed interceptor is a low-level hook (`WH_KEYBOARD_LL`
//! or `WH_MOUSE_LL`) running on its own Win32 message-loop thread.  Captured
//! presses are copied into a [`HookEvent`] and posted to the engine's queue;
//! the engine task does all decoding and state changes.
//!
//! # Hook callback rules (for beginners)
//!
//! Windows calls a low-level hook procedure on the thread that installed it
//! and waits for it to return before the input reaches any other program.  If
//! the procedure is slow, Windows silently removes the hook.  The callback
//! therefore only copies two integers, posts them to an unbounded channel
//! (which never blocks) and returns.
//!
//! # Testability
//!
//! The [`InterceptorHost`] trait lets the engine be driven by
//! [`mock::MockInterceptorHost`] on every platform.

use std::fmt;
use std::sync::Arc;

use dzikir_core::{DeviceClass, RawInputEvent};
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc::UnboundedSender;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Identifies one installed interceptor for as long as the host lives.
///
/// Ids are never reused, so an event stamped with a disposed id can always
/// be told apart from one produced by its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u64);

impl HookId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook#{}", self.0)
    }
}

/// An immutable copy of one captured message and the hook that saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookEvent {
    pub hook: HookId,
    pub raw: RawInputEvent,
}

/// Non-blocking handle the hook callbacks post into.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<HookEvent>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<HookEvent>) -> Self {
        Self { tx }
    }

    /// Posts an event without blocking.  Returns `false` once the engine
    /// side has shut down.
    pub fn post(&self, hook: HookId, raw: RawInputEvent) -> bool {
        self.tx.send(HookEvent { hook, raw }).is_ok()
    }
}

/// Error type for input capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to install {device} hook: {reason}")]
    HookInstallFailed { device: DeviceClass, reason: String },
    #[error("failed to spawn hook thread: {0}")]
    HookThreadSpawn(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Installs and removes OS-level input interceptors.
///
/// The production implementation uses Windows hooks; tests use
/// [`mock::MockInterceptorHost`].
///
/// Both methods may block briefly: `install` waits for the hook thread to
/// report readiness and `dispose` joins it.  Implementations wrap those
/// waits in [`run_blocking`].
pub trait InterceptorHost: Send + Sync {
    /// Installs an interceptor for `device` that posts every captured press
    /// into `sink`.
    fn install(&self, device: DeviceClass, sink: EventSink) -> Result<HookId, CaptureError>;

    /// Removes the interceptor.  Unknown or already disposed ids are ignored.
    fn dispose(&self, hook: HookId);
}

/// Host used where no global capture exists; every install fails.
#[derive(Debug, Default)]
pub struct UnsupportedHost;

impl InterceptorHost for UnsupportedHost {
    fn install(&self, device: DeviceClass, _sink: EventSink) -> Result<HookId, CaptureError> {
        Err(CaptureError::UnsupportedPlatform(format!(
            "global {device} capture requires Windows"
        )))
    }

    fn dispose(&self, _hook: HookId) {}
}

/// Runs a short blocking wait without stalling other tasks.
///
/// On a multi-threaded Tokio runtime the current worker is handed over with
/// `block_in_place`; elsewhere (no runtime, or a current-thread runtime where
/// `block_in_place` would panic) `f` simply runs inline.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Returns the interceptor host for the current platform.
pub fn platform_host() -> Arc<dyn InterceptorHost> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(self::windows::WindowsInterceptorHost::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(UnsupportedHost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_sink_post_stamps_hook_id() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(tx);

        // Act
        let delivered = sink.post(HookId::new(7), RawInputEvent::key_down(0x41));

        // Assert
        assert!(delivered);
        assert_eq!(
            rx.try_recv().unwrap(),
            HookEvent {
                hook: HookId::new(7),
                raw: RawInputEvent::key_down(0x41)
            }
        );
    }

    #[test]
    fn test_sink_post_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(!EventSink::new(tx).post(HookId::new(1), RawInputEvent::key_down(0x20)));
    }

    #[test]
    fn test_unsupported_host_refuses_every_device() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let host = UnsupportedHost;
        for device in DeviceClass::ALL {
            assert!(matches!(
                host.install(device, EventSink::new(tx.clone())),
                Err(CaptureError::UnsupportedPlatform(_))
            ));
        }
    }

    #[test]
    fn test_hook_id_display() {
        assert_eq!(HookId::new(3).to_string(), "hook#3");
    }

    #[test]
    fn test_run_blocking_outside_runtime_runs_inline() {
        assert_eq!(run_blocking(|| 2 + 2), 4);
    }

    #[tokio::test]
    async fn test_run_blocking_on_current_thread_runtime_does_not_panic() {
        assert_eq!(run_blocking(|| "done"), "done");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_blocking_on_multi_thread_runtime_keeps_other_tasks_running() {
        // Arrange
        let (tx, rx) = std::sync::mpsc::channel();
        let helper = tokio::spawn(async move {
            tx.send(42).unwrap();
        });

        // Act: block this worker until the spawned task has run.
        let value = run_blocking(|| rx.recv().unwrap());

        // Assert
        assert_eq!(value, 42);
        helper.await.unwrap();
    }
}
