//! Interfaces the engine consumes and exposes.
//!
//! The engine depends only on these traits; infrastructure supplies the
//! implementations and tests supply recording doubles or `mockall` mocks.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use dzikir_core::{Record, RecordingState, Stopwatch};
use thiserror::Error;

// ── Persistence ───────────────────────────────────────────────────────────────

/// Error type for state persistence.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The platform data directory could not be determined.
    #[error("could not determine platform data directory")]
    NoPlatformDir,
}

/// Loads and saves the persisted [`Record`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Loads the stored record; a missing store yields defaults.
    async fn load(&self) -> Result<Record, PersistenceError>;

    /// Replaces the stored record.
    async fn save(&self, record: &Record) -> Result<(), PersistenceError>;
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Error type for sound playback; the engine logs and ignores it.
#[derive(Debug, Error)]
#[error("audio playback failed: {0}")]
pub struct AudioError(pub String);

/// Plays the feedback sounds.
#[cfg_attr(test, mockall::automock)]
pub trait AudioPlayer: Send + Sync {
    /// Short sound for an ordinary count change.
    fn play_tick(&self) -> Result<(), AudioError>;

    /// Sound for reaching the target.
    fn play_success(&self) -> Result<(), AudioError>;
}

// ── Session timer ─────────────────────────────────────────────────────────────

/// The session stopwatch as seen by the engine.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTimer: Send {
    fn start(&mut self);
    fn pause(&mut self);
    fn reset(&mut self);
    /// Advances the elapsed total by `delta` if running.
    fn tick(&mut self, delta: Duration);
    fn elapsed(&self) -> Duration;
    fn is_running(&self) -> bool;
}

impl SessionTimer for Stopwatch {
    fn start(&mut self) {
        Stopwatch::start(self);
    }

    fn pause(&mut self) {
        Stopwatch::pause(self);
    }

    fn reset(&mut self) {
        Stopwatch::reset(self);
    }

    fn tick(&mut self, delta: Duration) {
        Stopwatch::tick(self, delta);
    }

    fn elapsed(&self) -> Duration {
        Stopwatch::elapsed(self)
    }

    fn is_running(&self) -> bool {
        Stopwatch::is_running(self)
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Receives engine notifications for presentation.
///
/// Every method has an empty default so observers implement only what they
/// display.
pub trait EngineObserver: Send + Sync {
    fn on_counter_changed(&self, _current: u64, _target: u32) {}
    fn on_target_reached(&self, _current: u64, _target: u32) {}
    fn on_cycle_reset(&self, _current: u64) {}
    fn on_binding_recorded(&self, _display_name: &str) {}
    fn on_recording_state(&self, _state: RecordingState) {}
}

/// Observer that discards every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

impl EngineObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_implements_session_timer() {
        // Arrange
        let mut timer: Box<dyn SessionTimer> = Box::new(Stopwatch::new());

        // Act
        timer.start();
        timer.tick(Duration::from_secs(2));
        timer.pause();
        timer.tick(Duration::from_secs(2));

        // Assert
        assert_eq!(timer.elapsed(), Duration::from_secs(2));
        assert!(!timer.is_running());
    }

    #[tokio::test]
    async fn test_mock_persistence_returns_configured_record() {
        let mut persistence = MockPersistence::new();
        persistence.expect_load().returning(|| {
            Ok(Record {
                current_count: 5,
                ..Record::default()
            })
        });

        let record = persistence.load().await.unwrap();

        assert_eq!(record.current_count, 5);
    }
}
