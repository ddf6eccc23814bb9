//! Mock interceptor host for testing.
//!
//! Records every install and dispose call, can be told to refuse
//! installation for a device class, and lets tests inject raw events through
//! the sink of a live hook exactly as a hook callback would.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dzikir_core::{DeviceClass, RawInputEvent};

use super::{CaptureError, EventSink, HookId, InterceptorHost};

#[derive(Default)]
struct MockState {
    next_id: u64,
    live: BTreeMap<HookId, (DeviceClass, EventSink)>,
    refused: BTreeSet<DeviceClass>,
    installs: Vec<DeviceClass>,
    disposals: Vec<HookId>,
}

/// A mock implementation of [`InterceptorHost`].
#[derive(Default)]
pub struct MockInterceptorHost {
    state: Mutex<MockState>,
}

impl MockInterceptorHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later install for `device` fail.
    pub fn refuse_install(&self, device: DeviceClass) {
        self.state().refused.insert(device);
    }

    /// Lets installs for `device` succeed again.
    pub fn allow_install(&self, device: DeviceClass) {
        self.state().refused.remove(&device);
    }

    /// Posts `raw` through every live hook of its device class.
    ///
    /// Returns the number of hooks that delivered it.
    pub fn inject(&self, raw: RawInputEvent) -> usize {
        let device = raw.device_class();
        let state = self.state();
        state
            .live
            .iter()
            .filter(|(_, (class, _))| *class == device)
            .filter(|(id, (_, sink))| sink.post(**id, raw))
            .count()
    }

    /// Live hook ids for `device`, oldest first.
    pub fn live_hooks(&self, device: DeviceClass) -> Vec<HookId> {
        self.state()
            .live
            .iter()
            .filter(|(_, (class, _))| *class == device)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    /// Number of successful installs for `device` so far.
    pub fn install_count(&self, device: DeviceClass) -> usize {
        self.state().installs.iter().filter(|d| **d == device).count()
    }

    /// Every id passed to `dispose`, in call order (including repeats).
    pub fn disposals(&self) -> Vec<HookId> {
        self.state().disposals.clone()
    }
}

impl InterceptorHost for MockInterceptorHost {
    fn install(&self, device: DeviceClass, sink: EventSink) -> Result<HookId, CaptureError> {
        let mut state = self.state();
        if state.refused.contains(&device) {
            return Err(CaptureError::HookInstallFailed {
                device,
                reason: "refused by mock".to_string(),
            });
        }
        state.next_id += 1;
        let id = HookId::new(state.next_id);
        state.live.insert(id, (device, sink));
        state.installs.push(device);
        Ok(id)
    }

    fn dispose(&self, hook: HookId) {
        let mut state = self.state();
        state.live.remove(&hook);
        state.disposals.push(hook);
    }
}
