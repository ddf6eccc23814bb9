//! Windows low-level keyboard and mouse hook implementation.
//!
//! Every installed interceptor gets its own thread.  That thread installs a
//! `WH_KEYBOARD_LL` or `WH_MOUSE_LL` hook and then pumps messages until
//! [`InterceptorHost::dispose`] posts `WM_QUIT` to it.  Low-level hooks are
//! called on the installing thread, so the sink the callback posts into is
//! kept in thread-local storage and no global state is shared between hooks.
//!
//! ```text
//!  install(Mouse) ──spawn──► hook thread ── SetWindowsHookExW ──► ready(tid)
//!                                 │
//!                                 ├─ GetMessageW loop ◄── WM_QUIT ── dispose()
//!                                 └─ HookGuard dropped ─► UnhookWindowsHookEx
//! ```
//!
//! `install` waits for the thread's readiness report and `dispose` joins the
//! thread; both waits go through [`run_blocking`].  If `WM_QUIT` cannot be
//! posted even after one retry, the hook stays registered so `Drop` tries
//! again.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dzikir_core::input::messages::{is_button_press, is_key_press};
use dzikir_core::{DeviceClass, RawInputEvent};
use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, HOOKPROC, KBDLLHOOKSTRUCT, MSG,
    MSLLHOOKSTRUCT, PM_NOREMOVE, WH_KEYBOARD_LL, WH_MOUSE_LL, WINDOWS_HOOK_ID, WM_QUIT, WM_USER,
};

use super::{run_blocking, CaptureError, EventSink, HookId, InterceptorHost};

thread_local! {
    /// Where the hook procedure on this thread delivers its events.
    static ROUTE: RefCell<Option<Route>> = const { RefCell::new(None) };
}

struct Route {
    hook: HookId,
    sink: EventSink,
}

/// A running hook thread owned by the host.
struct HookThread {
    device: DeviceClass,
    thread_id: u32,
    join: JoinHandle<()>,
}

/// Windows implementation of [`InterceptorHost`].
pub struct WindowsInterceptorHost {
    next_id: AtomicU64,
    hooks: Mutex<HashMap<HookId, HookThread>>,
}

impl WindowsInterceptorHost {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            hooks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WindowsInterceptorHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorHost for WindowsInterceptorHost {
    fn install(&self, device: DeviceClass, sink: EventSink) -> Result<HookId, CaptureError> {
        let hook = HookId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<u32, String>>(1);

        let join = thread::Builder::new()
            .name(format!("dzikir-{device}-hook"))
            .spawn(move || run_hook_thread(device, hook, sink, ready_tx))
            .map_err(|e| CaptureError::HookThreadSpawn(e.to_string()))?;

        let reason = match run_blocking(|| ready_rx.recv()) {
            Ok(Ok(thread_id)) => {
                self.hooks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(
                        hook,
                        HookThread {
                            device,
                            thread_id,
                            join,
                        },
                    );
                tracing::debug!(%hook, %device, thread_id, "interceptor installed");
                return Ok(hook);
            }
            Ok(Err(reason)) => reason,
            Err(_) => "hook thread exited before reporting".to_string(),
        };

        if run_blocking(|| join.join()).is_err() {
            tracing::error!(%device, "hook thread panicked during installation");
        }
        Err(CaptureError::HookInstallFailed { device, reason })
    }

    fn dispose(&self, hook: HookId) {
        let entry = self
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&hook);
        let Some(thread) = entry else {
            tracing::trace!(%hook, "dispose of unknown hook ignored");
            return;
        };

        if let Err(e) = run_blocking(|| post_quit(thread.thread_id)) {
            // Keep the entry so a later dispose (or Drop) can try again.
            tracing::error!(%hook, error = ?e, "failed to post WM_QUIT to hook thread");
            self.hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(hook, thread);
            return;
        }

        let device = thread.device;
        if run_blocking(|| thread.join.join()).is_err() {
            tracing::error!(%hook, %device, "hook thread panicked");
        } else {
            tracing::debug!(%hook, %device, "interceptor disposed");
        }
    }
}

impl Drop for WindowsInterceptorHost {
    fn drop(&mut self) {
        let ids: Vec<HookId> = self
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        for id in ids {
            self.dispose(id);
        }
    }
}

/// Posts `WM_QUIT` to `thread_id`, retrying once after a short pause.
fn post_quit(thread_id: u32) -> windows::core::Result<()> {
    // SAFETY: posting a message to a thread id has no memory-safety
    // requirements; the queue was created before the id was reported.
    let first = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
    if first.is_ok() {
        return first;
    }
    thread::sleep(QUIT_RETRY_DELAY);
    // SAFETY: as above.
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
}

const QUIT_RETRY_DELAY: Duration = Duration::from_millis(20);

// ── Hook thread ───────────────────────────────────────────────────────────────

/// Entry point of a dedicated hook thread.
fn run_hook_thread(
    device: DeviceClass,
    hook: HookId,
    sink: EventSink,
    ready: SyncSender<Result<u32, String>>,
) {
    // SAFETY: trivially safe Win32 query.
    let thread_id = unsafe { GetCurrentThreadId() };

    // Create the message queue now so a WM_QUIT posted right after install
    // cannot be lost.
    let mut msg = MSG::default();
    // SAFETY: `msg` is a valid, writable MSG for the duration of the call.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    ROUTE.with(|route| *route.borrow_mut() = Some(Route { hook, sink }));

    let guard = match HookGuard::install(device) {
        Ok(guard) => guard,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    if ready.send(Ok(thread_id)).is_err() {
        return;
    }

    pump_messages();

    drop(guard);
    ROUTE.with(|route| route.borrow_mut().take());
}

/// Blocks until `WM_QUIT` arrives.  `GetMessageW` returns -1 on error, which
/// also ends the loop.
fn pump_messages() {
    let mut msg = MSG::default();
    // SAFETY: standard Win32 GetMessage/DispatchMessage loop on the thread
    // that owns the queue.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
    }
}

/// Owns an installed hook handle and unhooks it on drop.
struct HookGuard {
    handle: HHOOK,
    device: DeviceClass,
}

impl HookGuard {
    fn install(device: DeviceClass) -> windows::core::Result<Self> {
        let (kind, callback): (WINDOWS_HOOK_ID, HOOKPROC) = match device {
            DeviceClass::Keyboard => (WH_KEYBOARD_LL, Some(keyboard_hook_proc)),
            DeviceClass::Mouse => (WH_MOUSE_LL, Some(mouse_hook_proc)),
        };
        // SAFETY: a null module name returns the handle of this executable.
        let module = unsafe { GetModuleHandleW(None)? };
        // SAFETY: the callback has the HOOKPROC signature and this thread
        // runs a message loop for as long as the hook is installed.
        let handle = unsafe { SetWindowsHookExW(kind, callback, Some(HINSTANCE(module.0)), 0)? };
        tracing::info!(%device, "hook installed");
        Ok(Self { handle, device })
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        // SAFETY: `handle` came from SetWindowsHookExW on this thread and is
        // unhooked exactly once.
        match unsafe { UnhookWindowsHookEx(self.handle) } {
            Ok(()) => tracing::info!(device = %self.device, "hook uninstalled"),
            Err(e) => tracing::error!(device = %self.device, error = ?e, "failed to unhook"),
        }
    }
}

// ── Hook procedures ───────────────────────────────────────────────────────────

/// Posts `raw` to this thread's sink; panics never cross the FFI boundary.
fn forward(raw: RawInputEvent) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ROUTE.with(|route| {
            if let Some(route) = route.borrow().as_ref() {
                route.sink.post(route.hook, raw);
            }
        })
    }));
    if result.is_err() {
        tracing::error!("panic in hook callback suppressed");
    }
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread; `l_param` points to a
/// `KBDLLHOOKSTRUCT` when `n_code == HC_ACTION`.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    let message = w_param.0 as u32;
    if n_code == HC_ACTION as i32 && is_key_press(message) {
        // SAFETY: see function docs.
        let info = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
        forward(RawInputEvent::Keyboard {
            message,
            vk_code: info.vkCode,
        });
    }
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread; `l_param` points to a
/// `MSLLHOOKSTRUCT` when `n_code == HC_ACTION`.
unsafe extern "system" fn mouse_hook_proc(n_code: i32, w_param: WPARAM, l_param: LPARAM) -> LRESULT {
    let message = w_param.0 as u32;
    if n_code == HC_ACTION as i32 && is_button_press(message) {
        // SAFETY: see function docs.
        let info = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        forward(RawInputEvent::Mouse {
            message,
            mouse_data: info.mouseData,
        });
    }
    CallNextHookEx(None, n_code, w_param, l_param)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_keeps_entry_when_quit_cannot_be_posted() {
        // Arrange: thread id 0 never has a message queue, so posting fails.
        let host = WindowsInterceptorHost::new();
        let hook = HookId::new(99);
        host.hooks.lock().unwrap().insert(
            hook,
            HookThread {
                device: DeviceClass::Mouse,
                thread_id: 0,
                join: thread::spawn(|| {}),
            },
        );

        // Act
        host.dispose(hook);

        // Assert
        assert!(host.hooks.lock().unwrap().contains_key(&hook));
    }

    #[test]
    fn test_dispose_of_unknown_hook_is_ignored() {
        let host = WindowsInterceptorHost::new();

        host.dispose(HookId::new(1));

        assert!(host.hooks.lock().unwrap().is_empty());
    }
}
