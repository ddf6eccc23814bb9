//! Feedback sounds.
//!
//! [`SystemAudioPlayer`] owns a dedicated `audio` thread that receives play
//! requests over a channel, so the dispatcher never waits on the sound
//! device.  A new request while a sound is still playing simply queues
//! behind it; the OS call returns immediately on Windows anyway.
//!
//! On Windows the two sounds are the system "default" and "asterisk" beeps.
//! Elsewhere playback is only logged.
//!
//! TODO: play bundled `pop.mp3` / `success.mp3` clips through `rodio` on the
//! audio thread, which would also give non-Windows builds real sound.

use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;

use crate::application::collaborators::{AudioError, AudioPlayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sound {
    Tick,
    Success,
}

/// [`AudioPlayer`] backed by the platform's system sounds.
pub struct SystemAudioPlayer {
    tx: Mutex<Option<Sender<Sound>>>,
}

impl SystemAudioPlayer {
    pub fn new() -> Self {
        Self {
            tx: Mutex::new(None),
        }
    }

    /// Spawns the audio thread on first use and returns its sender.
    fn sender(&self) -> Result<Sender<Sound>, AudioError> {
        let mut guard = self
            .tx
            .lock()
            .map_err(|e| AudioError(format!("audio lock poisoned: {e}")))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<Sound>();
        thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || {
                for sound in rx {
                    if let Err(e) = play(sound) {
                        tracing::debug!(?sound, error = %e, "system sound failed");
                    }
                }
            })
            .map_err(|e| AudioError(format!("failed to spawn audio thread: {e}")))?;

        *guard = Some(tx.clone());
        Ok(tx)
    }

    fn request(&self, sound: Sound) -> Result<(), AudioError> {
        let tx = self.sender()?;
        if tx.send(sound).is_err() {
            // The thread died; drop the sender so the next call respawns it.
            if let Ok(mut guard) = self.tx.lock() {
                *guard = None;
            }
            return Err(AudioError("audio thread stopped".to_string()));
        }
        Ok(())
    }
}

impl Default for SystemAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for SystemAudioPlayer {
    fn play_tick(&self) -> Result<(), AudioError> {
        self.request(Sound::Tick)
    }

    fn play_success(&self) -> Result<(), AudioError> {
        self.request(Sound::Success)
    }
}

#[cfg(target_os = "windows")]
fn play(sound: Sound) -> Result<(), AudioError> {
    use windows::Win32::UI::WindowsAndMessaging::{MessageBeep, MB_ICONASTERISK, MB_OK};

    let style = match sound {
        Sound::Tick => MB_OK,
        Sound::Success => MB_ICONASTERISK,
    };
    // SAFETY: MessageBeep only queues a system sound; it takes no pointers.
    unsafe { MessageBeep(style) }.map_err(|e| AudioError(e.to_string()))
}

#[cfg(not(target_os = "windows"))]
fn play(sound: Sound) -> Result<(), AudioError> {
    tracing::trace!(?sound, "sound");
    Ok(())
}
