//! Dispatcher: the engine's serialized execution context.
//!
//! Hook callbacks and the UI never touch the [`Engine`] directly.  Both post
//! messages to queues that a single Tokio task drains, so every state change
//! happens on one task in arrival order.
//!
//! ```text
//!  hook threads ──HookEvent──┐
//!                            ├──► Dispatcher::run ──► Engine ──► watch<Record> ──► writer task ──► Persistence
//!  EngineHandle ──Command────┘         ▲
//!                                timer interval
//! ```
//!
//! Saves go through a `watch` channel: the writer always sees the latest
//! record, bursts of changes collapse into one write, and a slow disk never
//! delays counting.

use std::sync::Arc;
use std::time::Duration;

use dzikir_core::{BindingCode, BindingSlot, Record};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;

use super::collaborators::Persistence;
use super::engine::{Collaborators, Engine, EngineSnapshot};
use crate::infrastructure::input_capture::{EventSink, HookEvent};

/// Error returned by [`EngineHandle`] once the dispatcher has stopped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("engine has stopped")]
    Closed,
}

/// Session timer controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
}

/// A UI intent for the engine.
#[derive(Debug)]
pub enum EngineCommand {
    Increment,
    Decrement,
    Reset,
    SetTarget(u32),
    SelectPreset(String),
    SetSoundEnabled(bool),
    StartRecording,
    CancelRecording,
    SetBinding {
        slot: BindingSlot,
        code: BindingCode,
        display_name: String,
    },
    SetEnabled {
        slot: BindingSlot,
        enabled: bool,
    },
    Timer(TimerCommand),
    Snapshot(oneshot::Sender<EngineSnapshot>),
    Shutdown,
}

/// Cloneable, non-blocking handle for sending commands to the engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn send(&self, command: EngineCommand) -> Result<(), DispatchError> {
        self.tx.send(command).map_err(|_| DispatchError::Closed)
    }

    pub fn increment(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::Increment)
    }

    pub fn decrement(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::Decrement)
    }

    pub fn reset(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::Reset)
    }

    pub fn set_target(&self, target: u32) -> Result<(), DispatchError> {
        self.send(EngineCommand::SetTarget(target))
    }

    pub fn select_preset(&self, name: impl Into<String>) -> Result<(), DispatchError> {
        self.send(EngineCommand::SelectPreset(name.into()))
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<(), DispatchError> {
        self.send(EngineCommand::SetSoundEnabled(enabled))
    }

    pub fn start_recording(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::StartRecording)
    }

    pub fn cancel_recording(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::CancelRecording)
    }

    pub fn set_binding(
        &self,
        slot: BindingSlot,
        code: BindingCode,
        display_name: impl Into<String>,
    ) -> Result<(), DispatchError> {
        self.send(EngineCommand::SetBinding {
            slot,
            code,
            display_name: display_name.into(),
        })
    }

    pub fn set_enabled(&self, slot: BindingSlot, enabled: bool) -> Result<(), DispatchError> {
        self.send(EngineCommand::SetEnabled { slot, enabled })
    }

    pub fn timer(&self, command: TimerCommand) -> Result<(), DispatchError> {
        self.send(EngineCommand::Timer(command))
    }

    /// Asks the engine for a snapshot.  Because commands are processed in
    /// order, the snapshot reflects every command sent before it.
    pub async fn snapshot(&self) -> Result<EngineSnapshot, DispatchError> {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot(tx))?;
        rx.await.map_err(|_| DispatchError::Closed)
    }

    pub fn shutdown(&self) -> Result<(), DispatchError> {
        self.send(EngineCommand::Shutdown)
    }
}

/// Owns the engine and drains its queues.
pub struct Dispatcher {
    engine: Engine,
    commands: mpsc::UnboundedReceiver<EngineCommand>,
    events: mpsc::UnboundedReceiver<HookEvent>,
    saves: watch::Sender<Record>,
    tick_interval: Duration,
}

impl Dispatcher {
    /// Builds the engine from `record` and wires its queues.
    ///
    /// Returns the dispatcher, a handle for UI commands, and the receiver
    /// the persistence writer watches.
    pub fn new(
        record: &Record,
        collaborators: Collaborators,
        tick_interval: Duration,
    ) -> (Self, EngineHandle, watch::Receiver<Record>) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (command_tx, commands) = mpsc::unbounded_channel();
        let engine = Engine::new(record, EventSink::new(event_tx), collaborators);
        let (saves, save_rx) = watch::channel(engine.to_record());

        let dispatcher = Self {
            engine,
            commands,
            events,
            saves,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
        };
        (dispatcher, EngineHandle { tx: command_tx }, save_rx)
    }

    /// Runs until [`EngineCommand::Shutdown`] arrives or every handle is
    /// dropped, then disposes all interceptors and publishes the final state.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        tracing::info!("dispatcher running");
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(EngineCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(event) = self.events.recv() => self.engine.handle_hook_event(event),
                _ = ticker.tick() => self.engine.tick_timer(self.tick_interval),
            }
            self.flush();
        }

        self.engine.shutdown();
        self.flush();
        tracing::info!("dispatcher stopped");
    }

    fn apply(&mut self, command: EngineCommand) {
        tracing::trace!(?command, "command");
        match command {
            EngineCommand::Increment => {
                self.engine.increment();
            }
            EngineCommand::Decrement => {
                self.engine.decrement();
            }
            EngineCommand::Reset => {
                self.engine.reset();
            }
            EngineCommand::SetTarget(target) => self.engine.set_target(target),
            EngineCommand::SelectPreset(name) => {
                self.engine.select_preset(&name);
            }
            EngineCommand::SetSoundEnabled(enabled) => self.engine.set_sound_enabled(enabled),
            EngineCommand::StartRecording => {
                if let Err(e) = self.engine.start_recording() {
                    tracing::warn!(error = %e, "start recording failed");
                }
            }
            EngineCommand::CancelRecording => {
                if let Err(e) = self.engine.cancel_recording() {
                    tracing::warn!(error = %e, "cancel recording failed");
                }
            }
            EngineCommand::SetBinding {
                slot,
                code,
                display_name,
            } => {
                if let Err(e) = self.engine.set_binding(slot, code, display_name) {
                    tracing::warn!(%slot, error = %e, "set binding failed");
                }
            }
            EngineCommand::SetEnabled { slot, enabled } => {
                if let Err(e) = self.engine.set_enabled(slot, enabled) {
                    tracing::warn!(%slot, error = %e, "set enabled failed");
                }
            }
            EngineCommand::Timer(TimerCommand::Start) => self.engine.start_timer(),
            EngineCommand::Timer(TimerCommand::Pause) => self.engine.pause_timer(),
            EngineCommand::Timer(TimerCommand::Reset) => self.engine.reset_timer(),
            EngineCommand::Snapshot(reply) => {
                let _ = reply.send(self.engine.snapshot());
            }
            EngineCommand::Shutdown => {}
        }
    }

    /// Publishes the record once per dirty batch.
    fn flush(&mut self) {
        if self.engine.take_dirty() {
            self.saves.send_replace(self.engine.to_record());
        }
    }
}

/// Saves every record published by the dispatcher until it stops.
///
/// A failed save is logged; the next change tries again with fresh state.
pub async fn run_persistence_writer(
    persistence: Arc<dyn Persistence>,
    mut saves: watch::Receiver<Record>,
) {
    while saves.changed().await.is_ok() {
        let record = saves.borrow_and_update().clone();
        match persistence.save(&record).await {
            Ok(()) => tracing::trace!(count = record.current_count, "state saved"),
            Err(e) => tracing::warn!(error = %e, "state save failed"),
        }
    }
    tracing::debug!("persistence writer stopped");
}
