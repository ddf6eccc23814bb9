//! CounterEngine: the counter and its optional target.
//!
//! # Cycles (for beginners)
//!
//! With a target of `T`, presses count `1, 2, …, T`.  Reaching `T` raises
//! [`CounterEvent::TargetReached`]; the *next* press starts a new cycle at
//! `1` (not `0`) and raises [`CounterEvent::CycleReset`]:
//!
//! ```text
//! target = 3:   1   2   3★   1↺   2   3★   1↺ …
//!               ★ = TargetReached   ↺ = CycleReset
//! ```
//!
//! A target of `0` means unbounded.  The counter saturates at `u64::MAX`
//! instead of wrapping.

/// Notification produced by a counter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    /// The count changed (or was re-affirmed) without crossing the target.
    CounterChanged { current: u64 },
    /// The count just became equal to a bounded target.
    TargetReached { current: u64, target: u32 },
    /// A press after reaching the target started a new cycle at 1.
    CycleReset { current: u64 },
}

impl CounterEvent {
    /// Returns the count after the operation.
    pub fn current(&self) -> u64 {
        match *self {
            CounterEvent::CounterChanged { current }
            | CounterEvent::TargetReached { current, .. }
            | CounterEvent::CycleReset { current } => current,
        }
    }
}

/// Result of applying one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub event: CounterEvent,
    /// `false` when the operation left the count untouched (decrement at
    /// zero, increment at saturation).
    pub changed: bool,
}

/// Persisted counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterState {
    pub current: u64,
    /// Goal count; `0` = unbounded.
    pub target: u32,
}

/// Applies increment/decrement/reset/target operations to a [`CounterState`].
#[derive(Debug, Clone, Default)]
pub struct CounterEngine {
    state: CounterState,
}

impl CounterEngine {
    pub fn new(state: CounterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn current(&self) -> u64 {
        self.state.current
    }

    pub fn target(&self) -> u32 {
        self.state.target
    }

    fn is_bounded(&self) -> bool {
        self.state.target > 0
    }

    /// Counts one press.
    pub fn increment(&mut self) -> Transition {
        let target = self.state.target;

        if self.is_bounded() && self.state.current >= u64::from(target) {
            self.state.current = 1;
            return Transition {
                event: CounterEvent::CycleReset { current: 1 },
                changed: true,
            };
        }

        if self.state.current == u64::MAX {
            return Transition {
                event: CounterEvent::CounterChanged {
                    current: self.state.current,
                },
                changed: false,
            };
        }

        self.state.current += 1;
        let current = self.state.current;
        let event = if self.is_bounded() && current == u64::from(target) {
            CounterEvent::TargetReached { current, target }
        } else {
            CounterEvent::CounterChanged { current }
        };
        Transition {
            event,
            changed: true,
        }
    }

    /// Takes one press back.  No-op at zero.
    pub fn decrement(&mut self) -> Transition {
        let changed = self.state.current > 0;
        if changed {
            self.state.current -= 1;
        }
        Transition {
            event: CounterEvent::CounterChanged {
                current: self.state.current,
            },
            changed,
        }
    }

    /// Sets the count back to zero.
    pub fn reset(&mut self) -> Transition {
        let changed = self.state.current != 0;
        self.state.current = 0;
        Transition {
            event: CounterEvent::CounterChanged { current: 0 },
            changed,
        }
    }

    /// Sets the goal count; `0` means unbounded.  Returns `true` if it changed.
    pub fn set_target(&mut self, target: u32) -> bool {
        let changed = self.state.target != target;
        self.state.target = target;
        changed
    }

    /// Progress toward the target: `min(current, target)`, or `0` when unbounded.
    pub fn progress(&self) -> u64 {
        if self.is_bounded() {
            self.state.current.min(u64::from(self.state.target))
        } else {
            0
        }
    }

    /// Returns `true` once the current cycle has reached its target.
    pub fn is_complete(&self) -> bool {
        self.is_bounded() && self.state.current >= u64::from(self.state.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_increment_counts_up() {
        let mut engine = CounterEngine::default();
        let t = engine.increment();
        assert_eq!(t.event, CounterEvent::CounterChanged { current: 1 });
        assert!(t.changed);
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_reaching_target_emits_target_reached() {
        // Arrange
        let mut engine = CounterEngine::new(CounterState {
            current: 2,
            target: 3,
        });

        // Act
        let t = engine.increment();

        // Assert
        assert_eq!(
            t.event,
            CounterEvent::TargetReached {
                current: 3,
                target: 3
            }
        );
    }

    #[test]
    fn test_increment_past_target_wraps_to_one() {
        let mut engine = CounterEngine::new(CounterState {
            current: 3,
            target: 3,
        });
        let t = engine.increment();
        assert_eq!(t.event, CounterEvent::CycleReset { current: 1 });
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_count_above_target_wraps_after_target_lowered() {
        // A loaded count may already exceed a newly chosen target.
        let mut engine = CounterEngine::new(CounterState {
            current: 50,
            target: 0,
        });
        engine.set_target(33);
        assert_eq!(engine.increment().event, CounterEvent::CycleReset { current: 1 });
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let mut engine = CounterEngine::new(CounterState {
            current: u64::MAX,
            target: 0,
        });
        let t = engine.increment();
        assert!(!t.changed);
        assert_eq!(engine.current(), u64::MAX);
    }

    #[test]
    fn test_decrement_is_floor_at_zero() {
        let mut engine = CounterEngine::default();
        let t = engine.decrement();
        assert!(!t.changed);
        assert_eq!(t.event, CounterEvent::CounterChanged { current: 0 });
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_decrement_counts_down() {
        let mut engine = CounterEngine::new(CounterState {
            current: 5,
            target: 0,
        });
        assert!(engine.decrement().changed);
        assert_eq!(engine.current(), 4);
    }

    #[test]
    fn test_reset_sets_zero() {
        let mut engine = CounterEngine::new(CounterState {
            current: 12,
            target: 33,
        });
        let t = engine.reset();
        assert_eq!(t.event, CounterEvent::CounterChanged { current: 0 });
        assert_eq!(engine.target(), 33, "reset keeps the target");
    }

    #[test]
    fn test_progress_is_clamped_to_target() {
        let mut engine = CounterEngine::new(CounterState {
            current: 40,
            target: 33,
        });
        assert_eq!(engine.progress(), 33);
        engine.set_target(0);
        assert_eq!(engine.progress(), 0);
    }

    #[test]
    fn test_set_target_reports_change() {
        let mut engine = CounterEngine::default();
        assert!(engine.set_target(100));
        assert!(!engine.set_target(100));
    }
}
