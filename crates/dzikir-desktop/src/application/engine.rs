//! Engine: the single owner of binding, recording and counter state.
//!
//! The engine is driven from one task (see [`super::dispatcher`]), so none
//! of its state needs a lock.  It turns hook events and UI intents into
//! counter transitions, keeps the installed interceptors in line with the
//! enabled bindings, and raises a dirty flag the dispatcher turns into saves.
//!
//! # Interceptor ownership (for beginners)
//!
//! Outside a recording session there is at most one *production* interceptor
//! per device class, shared by every enabled binding that needs that class.
//! While recording, production interceptors are disposed and one *capture*
//! interceptor per device class listens for the next press instead.
//!
//! ```text
//!            start_recording()                 first decoded press
//!  production ────────────────► capture-all ─────────────────────► production
//!  hooks        (snapshot flags)   hooks      (bind custom, restore)   hooks
//! ```
//!
//! Every event carries the [`HookId`] of the interceptor that produced it.
//! Events from an id that is no longer live (already disposed, queued before
//! a switch) are dropped.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use dzikir_core::{
    decode, Action, Binding, BindingCode, BindingError, BindingFlags, BindingRegistry,
    BindingSlot, CounterEngine, CounterEvent, CounterState, DecodeError, DeviceClass, Preset,
    Record, RecordingError, RecordingSession, RecordingState, Transition,
};
use thiserror::Error;
use uuid::Uuid;

use super::collaborators::{AudioPlayer, EngineObserver, SessionTimer};
use crate::infrastructure::input_capture::{EventSink, HookEvent, HookId, InterceptorHost};

/// Error type for engine operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("a recording session is already armed")]
    AlreadyRecording,
    #[error("no recording session is armed")]
    NotRecording,
    #[error("bindings cannot be changed while a recording session is armed")]
    RecordingInProgress,
    #[error("no capture interceptor could be installed")]
    CaptureUnavailable,
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Recording(#[from] RecordingError),
}

/// Everything the engine needs from the outside world.
pub struct Collaborators {
    pub host: Arc<dyn InterceptorHost>,
    pub audio: Arc<dyn AudioPlayer>,
    pub timer: Box<dyn SessionTimer>,
    pub observer: Arc<dyn EngineObserver>,
}

/// Read-only view of the engine for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub current: u64,
    pub target: u32,
    pub progress: u64,
    pub selected_preset: String,
    pub sound_enabled: bool,
    pub bindings: Vec<(BindingSlot, Binding)>,
    pub recording: RecordingState,
    pub timer_running: bool,
    pub elapsed: Duration,
    /// Device classes with a live production interceptor.
    pub hooked_devices: Vec<DeviceClass>,
}

pub struct Engine {
    registry: BindingRegistry,
    counter: CounterEngine,
    selected_preset: String,
    sound_enabled: bool,
    recording: Option<RecordingSession>,
    production: BTreeMap<DeviceClass, HookId>,
    capture: BTreeMap<DeviceClass, HookId>,
    dirty: bool,
    sink: EventSink,
    host: Arc<dyn InterceptorHost>,
    audio: Arc<dyn AudioPlayer>,
    timer: Box<dyn SessionTimer>,
    observer: Arc<dyn EngineObserver>,
}

impl Engine {
    /// Builds an engine from a loaded record and installs the interceptors
    /// its enabled bindings need.
    pub fn new(record: &Record, sink: EventSink, collaborators: Collaborators) -> Self {
        let mut registry = BindingRegistry::new();
        let custom = BindingCode::from_wire(record.custom_input_code, record.custom_input_kind);
        if let Err(e) = registry.set_binding(
            BindingSlot::Custom,
            custom,
            record.custom_input_name.clone(),
        ) {
            tracing::warn!(error = %e, "stored custom binding rejected");
        }
        registry.apply_flags(BindingFlags {
            x_button: record.x_button_enabled,
            left_button: record.left_button_enabled,
            custom: record.custom_enabled,
        });

        let mut engine = Self {
            registry,
            counter: CounterEngine::new(CounterState {
                current: record.current_count,
                target: record.target_count,
            }),
            selected_preset: record.selected_preset.clone(),
            sound_enabled: record.sound_enabled,
            recording: None,
            production: BTreeMap::new(),
            capture: BTreeMap::new(),
            dirty: false,
            sink,
            host: collaborators.host,
            audio: collaborators.audio,
            timer: collaborators.timer,
            observer: collaborators.observer,
        };
        engine.sync_interceptors();
        tracing::info!(
            current = engine.counter.current(),
            target = engine.counter.target(),
            custom = %custom,
            "engine initialised"
        );
        engine
    }

    // ── Hook events ───────────────────────────────────────────────────────────

    /// Routes one event from an interceptor.
    pub fn handle_hook_event(&mut self, event: HookEvent) {
        let device = event.raw.device_class();

        if self.capture.get(&device) == Some(&event.hook) {
            self.handle_capture_event(event);
            return;
        }

        if self.production.get(&device) != Some(&event.hook) {
            tracing::trace!(hook = %event.hook, %device, "event from stale hook dropped");
            return;
        }

        let code = match decode(&event.raw) {
            Ok(code) => code,
            Err(e @ DecodeError::Ambiguous { .. }) => {
                tracing::debug!(error = %e, "ambiguous press dropped");
                return;
            }
            Err(e) => {
                tracing::trace!(error = %e, "non-press message dropped");
                return;
            }
        };

        for trigger in self.registry.resolve(code, device) {
            tracing::trace!(slot = %trigger.slot, action = ?trigger.action, %code, "binding fired");
            match trigger.action {
                Action::Increment => {
                    self.increment();
                }
                Action::Decrement => {
                    self.decrement();
                }
            }
        }
    }

    fn handle_capture_event(&mut self, event: HookEvent) {
        match decode(&event.raw) {
            Ok(code) => {
                if let Err(e) = self.complete_recording(code) {
                    tracing::warn!(error = %e, "recorded press rejected; still listening");
                }
            }
            Err(e) => tracing::debug!(error = %e, "undecodable press ignored while recording"),
        }
    }

    // ── Counter operations ────────────────────────────────────────────────────

    pub fn increment(&mut self) -> Transition {
        let transition = self.counter.increment();
        self.mark_dirty();
        match transition.event {
            CounterEvent::TargetReached { current, target } => {
                self.play(Sound::Success);
                self.timer.pause();
                self.observer.on_target_reached(current, target);
            }
            CounterEvent::CycleReset { current } => {
                self.play(Sound::Tick);
                self.observer.on_cycle_reset(current);
            }
            CounterEvent::CounterChanged { .. } => {
                if transition.changed {
                    self.play(Sound::Tick);
                }
            }
        }
        self.notify_counter();
        transition
    }

    pub fn decrement(&mut self) -> Transition {
        let transition = self.counter.decrement();
        self.mark_dirty();
        if transition.changed {
            self.play(Sound::Tick);
        }
        self.notify_counter();
        transition
    }

    pub fn reset(&mut self) -> Transition {
        let transition = self.counter.reset();
        self.mark_dirty();
        self.notify_counter();
        transition
    }

    /// Sets the goal count; `0` means unbounded.
    pub fn set_target(&mut self, target: u32) {
        self.counter.set_target(target);
        self.mark_dirty();
        self.notify_counter();
    }

    /// Applies a preset by display name; unknown names select Free Count.
    pub fn select_preset(&mut self, name: &str) -> Preset {
        let preset = Preset::from_name(name).unwrap_or_else(|| {
            tracing::warn!(name, "unknown preset, using free count");
            Preset::FreeCount
        });
        self.selected_preset = preset.name().to_string();
        let target = preset.target(self.counter.target());
        self.counter.set_target(target);
        self.mark_dirty();
        self.notify_counter();
        preset
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.sound_enabled != enabled {
            self.sound_enabled = enabled;
            self.mark_dirty();
        }
    }

    // ── Session timer ─────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) {
        self.timer.start();
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn tick_timer(&mut self, delta: Duration) {
        self.timer.tick(delta);
    }

    // ── Recording ─────────────────────────────────────────────────────────────

    /// Suspends every binding and installs capture-all interceptors.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyRecording`] while a session is armed, and
    /// [`EngineError::CaptureUnavailable`] when neither device could be
    /// hooked; in that case the session is cancelled and bindings restored.
    pub fn start_recording(&mut self) -> Result<Uuid, EngineError> {
        if self.recording.is_some() {
            tracing::warn!("start_recording ignored: session already armed");
            return Err(EngineError::AlreadyRecording);
        }

        let mut session = RecordingSession::new();
        session.arm(&mut self.registry)?;
        self.sync_interceptors();

        for device in DeviceClass::ALL {
            match self.host.install(device, self.sink.clone()) {
                Ok(hook) => {
                    self.capture.insert(device, hook);
                }
                Err(e) => {
                    tracing::warn!(session = %session.id(), %device, error = %e, "capture hook install failed");
                }
            }
        }

        if self.capture.is_empty() {
            session.cancel(&mut self.registry)?;
            self.sync_interceptors();
            tracing::error!(session = %session.id(), "recording cancelled: no capture hook");
            self.observer.on_recording_state(RecordingState::Cancelled);
            return Err(EngineError::CaptureUnavailable);
        }

        let id = session.id();
        tracing::info!(session = %id, "recording armed; press any key or button");
        self.recording = Some(session);
        self.observer.on_recording_state(RecordingState::Armed);
        Ok(id)
    }

    /// Abandons the armed session and restores the previous bindings.
    pub fn cancel_recording(&mut self) -> Result<(), EngineError> {
        let mut session = self.recording.take().ok_or(EngineError::NotRecording)?;
        let result = session.cancel(&mut self.registry);
        self.dispose_capture();
        self.sync_interceptors();
        result?;
        tracing::info!(session = %session.id(), "recording cancelled");
        self.observer.on_recording_state(RecordingState::Cancelled);
        Ok(())
    }

    fn complete_recording(&mut self, code: BindingCode) -> Result<(), EngineError> {
        let mut session = self.recording.take().ok_or(EngineError::NotRecording)?;
        let recorded = match session.complete(&mut self.registry, code) {
            Ok(recorded) => recorded,
            Err(e) => {
                self.recording = Some(session);
                return Err(e.into());
            }
        };
        self.dispose_capture();
        self.mark_dirty();
        self.sync_interceptors();
        tracing::info!(session = %session.id(), %code, name = %recorded.display_name, "binding recorded");
        self.observer.on_binding_recorded(&recorded.display_name);
        self.observer.on_recording_state(RecordingState::Completed);
        Ok(())
    }

    fn dispose_capture(&mut self) {
        for (_, hook) in std::mem::take(&mut self.capture) {
            self.host.dispose(hook);
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    // ── Binding configuration ─────────────────────────────────────────────────

    /// Replaces the custom binding.  Returns whether anything changed.
    pub fn set_binding(
        &mut self,
        slot: BindingSlot,
        code: BindingCode,
        display_name: impl Into<String>,
    ) -> Result<bool, EngineError> {
        if self.recording.is_some() {
            tracing::warn!(%slot, "set_binding rejected while recording");
            return Err(EngineError::RecordingInProgress);
        }
        let changed = self.registry.set_binding(slot, code, display_name)?;
        if changed {
            self.mark_dirty();
            self.sync_interceptors();
        }
        Ok(changed)
    }

    /// Enables or disables a binding.  Returns whether the flag changed.
    pub fn set_enabled(&mut self, slot: BindingSlot, enabled: bool) -> Result<bool, EngineError> {
        if self.recording.is_some() {
            tracing::warn!(%slot, "set_enabled rejected while recording");
            return Err(EngineError::RecordingInProgress);
        }
        let changed = self.registry.set_enabled(slot, enabled);
        if changed {
            tracing::info!(%slot, enabled, "binding toggled");
            self.mark_dirty();
            self.sync_interceptors();
        }
        Ok(changed)
    }

    /// Installs or disposes production interceptors so that exactly the
    /// device classes enabled bindings need are hooked.
    ///
    /// A failed install is logged and retried on the next sync.
    pub fn sync_interceptors(&mut self) {
        let required = self.registry.required_devices();
        for device in DeviceClass::ALL {
            let needed = required.contains(&device);
            match (needed, self.production.get(&device).copied()) {
                (true, None) => match self.host.install(device, self.sink.clone()) {
                    Ok(hook) => {
                        tracing::debug!(%device, %hook, "production hook installed");
                        self.production.insert(device, hook);
                    }
                    Err(e) => {
                        tracing::warn!(%device, error = %e, "hook install failed; device not captured");
                    }
                },
                (false, Some(hook)) => {
                    self.host.dispose(hook);
                    self.production.remove(&device);
                    tracing::debug!(%device, %hook, "production hook disposed");
                }
                _ => {}
            }
        }
    }

    // ── State export ──────────────────────────────────────────────────────────

    /// The persisted form of the current state.
    ///
    /// Enable flags are the configured ones even while a recording session
    /// has them suspended.
    pub fn to_record(&self) -> Record {
        let flags = self.registry.flags();
        let custom = self.registry.get(BindingSlot::Custom);
        let (custom_input_code, custom_input_kind) = custom.code.to_wire();
        Record {
            current_count: self.counter.current(),
            x_button_enabled: flags.x_button,
            left_button_enabled: flags.left_button,
            custom_enabled: flags.custom,
            custom_input_code,
            custom_input_kind,
            custom_input_name: custom.display_name.clone(),
            selected_preset: self.selected_preset.clone(),
            sound_enabled: self.sound_enabled,
            target_count: self.counter.target(),
        }
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            current: self.counter.current(),
            target: self.counter.target(),
            progress: self.counter.progress(),
            selected_preset: self.selected_preset.clone(),
            sound_enabled: self.sound_enabled,
            bindings: BindingSlot::ALL
                .into_iter()
                .map(|slot| (slot, self.registry.get(slot).clone()))
                .collect(),
            recording: self
                .recording
                .as_ref()
                .map_or(RecordingState::Idle, RecordingSession::state),
            timer_running: self.timer.is_running(),
            elapsed: self.timer.elapsed(),
            hooked_devices: self.production.keys().copied().collect(),
        }
    }

    /// Cancels any armed session and disposes every interceptor.
    pub fn shutdown(&mut self) {
        if self.recording.is_some() {
            if let Err(e) = self.cancel_recording() {
                tracing::warn!(error = %e, "cancel during shutdown failed");
            }
        }
        self.dispose_all();
        tracing::info!("engine shut down");
    }

    fn dispose_all(&mut self) {
        self.dispose_capture();
        for (_, hook) in std::mem::take(&mut self.production) {
            self.host.dispose(hook);
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn notify_counter(&self) {
        self.observer
            .on_counter_changed(self.counter.current(), self.counter.target());
    }

    fn play(&self, sound: Sound) {
        if !self.sound_enabled {
            return;
        }
        let result = match sound {
            Sound::Tick => self.audio.play_tick(),
            Sound::Success => self.audio.play_success(),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, ?sound, "sound playback failed");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[derive(Debug, Clone, Copy)]
enum Sound {
    Tick,
    Success,
}
