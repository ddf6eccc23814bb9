//! RecordingSession: "press any key or button to bind it".
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//!            arm()                complete(code)
//!   Idle ───────────► Armed ─────────────────────► Completed
//!                       │
//!                       │ cancel()
//!                       └─────────────────────────► Cancelled
//! ```
//!
//! Arming suspends the [`BindingRegistry`] and snapshots its enable flags.
//! Both terminal transitions resume the registry with exactly that snapshot,
//! so a binding that was off before recording stays off and one that was on
//! comes back on.  A session is used for one attempt only; the caller drops
//! it once it reaches a terminal state.
//!
//! The session only touches the registry.  Installing the capture-all hooks
//! and disposing production hooks is the engine's job.

use thiserror::Error;
use uuid::Uuid;

use crate::binding::code::BindingCode;
use crate::binding::registry::{BindingError, BindingFlags, BindingRegistry, BindingSlot};

/// Recording state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Armed,
    Completed,
    Cancelled,
}

/// Errors returned by invalid transitions.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RecordingError {
    /// The transition requires a different state.
    #[error("recording session is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: RecordingState,
        actual: RecordingState,
    },

    /// `BindingCode::None` cannot be recorded.
    #[error("cannot record an empty binding code")]
    EmptyCode,

    /// The registry refused the recorded code.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

/// The outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBinding {
    pub code: BindingCode,
    pub display_name: String,
}

/// One recording attempt.
#[derive(Debug)]
pub struct RecordingSession {
    id: Uuid,
    state: RecordingState,
    snapshot: BindingFlags,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Creates an idle session with a fresh id for log correlation.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RecordingState::Idle,
            snapshot: BindingFlags::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == RecordingState::Armed
    }

    /// The enable flags captured when the session was armed.
    pub fn snapshot(&self) -> BindingFlags {
        self.snapshot
    }

    fn expect_state(&self, expected: RecordingState) -> Result<(), RecordingError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RecordingError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// `Idle → Armed`: suspends every binding and snapshots the enable flags.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::InvalidState`] unless the session is idle.
    pub fn arm(&mut self, registry: &mut BindingRegistry) -> Result<(), RecordingError> {
        self.expect_state(RecordingState::Idle)?;
        self.snapshot = registry.suspend();
        self.state = RecordingState::Armed;
        tracing::debug!(session = %self.id, snapshot = ?self.snapshot, "recording armed");
        Ok(())
    }

    /// `Armed → Completed`: binds `code` to the custom slot and restores the
    /// snapshotted enable flags.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::InvalidState`] unless armed, and
    /// [`RecordingError::EmptyCode`] for [`BindingCode::None`]; in both cases
    /// the registry is left untouched and the session keeps its state.
    pub fn complete(
        &mut self,
        registry: &mut BindingRegistry,
        code: BindingCode,
    ) -> Result<RecordedBinding, RecordingError> {
        self.expect_state(RecordingState::Armed)?;
        if code == BindingCode::None {
            return Err(RecordingError::EmptyCode);
        }

        let display_name = code.display_name();
        registry.set_binding(BindingSlot::Custom, code, display_name.clone())?;
        registry.resume(self.snapshot);
        self.state = RecordingState::Completed;
        tracing::debug!(session = %self.id, %code, "recording completed");

        Ok(RecordedBinding { code, display_name })
    }

    /// `Armed → Cancelled`: restores the snapshotted flags, custom slot unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`RecordingError::InvalidState`] unless armed.
    pub fn cancel(&mut self, registry: &mut BindingRegistry) -> Result<(), RecordingError> {
        self.expect_state(RecordingState::Armed)?;
        registry.resume(self.snapshot);
        self.state = RecordingState::Cancelled;
        tracing::debug!(session = %self.id, "recording cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::code::MouseButton;
    use crate::input::DeviceClass;

    fn registry_with_left_enabled() -> BindingRegistry {
        let mut registry = BindingRegistry::new();
        registry.set_enabled(BindingSlot::LeftButton, true);
        registry
    }

    #[test]
    fn test_new_session_is_idle() {
        assert_eq!(RecordingSession::new().state(), RecordingState::Idle);
    }

    #[test]
    fn test_arm_suspends_registry() {
        // Arrange
        let mut registry = registry_with_left_enabled();
        let mut session = RecordingSession::new();

        // Act
        session.arm(&mut registry).unwrap();

        // Assert
        assert!(session.is_armed());
        assert!(registry.is_suspended());
        assert!(registry
            .resolve(BindingCode::Mouse(MouseButton::Left), DeviceClass::Mouse)
            .is_empty());
    }

    #[test]
    fn test_arm_twice_is_rejected() {
        let mut registry = BindingRegistry::new();
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();
        assert_eq!(
            session.arm(&mut registry),
            Err(RecordingError::InvalidState {
                expected: RecordingState::Idle,
                actual: RecordingState::Armed
            })
        );
    }

    #[test]
    fn test_complete_binds_custom_slot_and_restores_flags() {
        // Arrange
        let mut registry = registry_with_left_enabled();
        let before = registry.flags();
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();

        // Act
        let recorded = session
            .complete(&mut registry, BindingCode::Keyboard(0x20))
            .unwrap();

        // Assert
        assert_eq!(recorded.display_name, "Space");
        assert_eq!(session.state(), RecordingState::Completed);
        assert!(!registry.is_suspended());
        assert_eq!(registry.flags(), before);
        assert_eq!(
            registry.get(BindingSlot::Custom).code,
            BindingCode::Keyboard(0x20)
        );
    }

    #[test]
    fn test_complete_does_not_force_enable_custom() {
        let mut registry = BindingRegistry::new();
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();
        session
            .complete(&mut registry, BindingCode::Mouse(MouseButton::Middle))
            .unwrap();
        assert!(!registry.get(BindingSlot::Custom).enabled);
    }

    #[test]
    fn test_complete_with_empty_code_keeps_session_armed() {
        let mut registry = BindingRegistry::new();
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();
        assert_eq!(
            session.complete(&mut registry, BindingCode::None),
            Err(RecordingError::EmptyCode)
        );
        assert!(session.is_armed());
        assert!(registry.is_suspended());
    }

    #[test]
    fn test_cancel_restores_flags_and_keeps_custom_binding() {
        // Arrange
        let mut registry = BindingRegistry::new();
        registry
            .set_binding(BindingSlot::Custom, BindingCode::Keyboard(0x41), "A")
            .unwrap();
        registry.set_enabled(BindingSlot::Custom, true);
        let before = registry.clone();
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();

        // Act
        session.cancel(&mut registry).unwrap();

        // Assert
        assert_eq!(session.state(), RecordingState::Cancelled);
        assert_eq!(registry, before);
    }

    #[test]
    fn test_cancel_when_idle_is_rejected() {
        let mut registry = BindingRegistry::new();
        let mut session = RecordingSession::new();
        assert!(session.cancel(&mut registry).is_err());
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(RecordingSession::new().id(), RecordingSession::new().id());
    }
}
