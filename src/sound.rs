//! Sound module for matched letters.
//!
//! Sounds are played one at a time on a worker thread so painting never waits
//! on audio. A request that arrives while a sound is playing replaces any
//! request still waiting, so only the newest one is played next.

use parking_lot::{Condvar, Mutex};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("failed to play {}", .0.display())]
    PlaybackFailed(PathBuf),
    #[error("sound queue is closed")]
    Closed,
}

/// Something that can play a sound file to completion.
#[cfg_attr(not(windows), allow(dead_code))]
pub trait Playback: Send + 'static {
    /// Plays `path` and returns once playback has finished.
    fn play_sync(&self, path: &Path) -> Result<(), SoundError>;
}

/// Plays `.wav` files through the Windows multimedia API.
#[cfg(windows)]
pub struct SystemPlayback;

#[cfg(windows)]
impl Playback for SystemPlayback {
    fn play_sync(&self, path: &Path) -> Result<(), SoundError> {
        use std::os::windows::ffi::OsStrExt;
        use windows::core::PCWSTR;
        use windows::Win32::Media::Audio::{PlaySoundW, SND_FILENAME, SND_NODEFAULT, SND_SYNC};

        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let played = unsafe {
            PlaySoundW(
                PCWSTR(wide.as_ptr()),
                None,
                SND_FILENAME | SND_SYNC | SND_NODEFAULT,
            )
        };

        if played.as_bool() {
            Ok(())
        } else {
            Err(SoundError::PlaybackFailed(path.to_path_buf()))
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Default)]
struct Mailbox {
    pending: Option<PathBuf>,
    closed: bool,
}

#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Default)]
struct Shared {
    mailbox: Mutex<Mailbox>,
    wakeup: Condvar,
}

/// Ordered, non-overlapping playback on a background thread.
#[cfg_attr(not(windows), allow(dead_code))]
pub struct SoundQueue {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl SoundQueue {
    /// Starts the worker thread.
    pub fn new<P: Playback>(backend: P) -> Self {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || worker_loop(&worker_shared, &backend));

        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Queues `path`, replacing a request that has not started yet.
    pub fn play(&self, path: PathBuf) -> Result<(), SoundError> {
        {
            let mut mailbox = self.shared.mailbox.lock();
            if mailbox.closed {
                return Err(SoundError::Closed);
            }
            log::debug!("Queueing sound {}", path.display());
            if let Some(old) = mailbox.pending.replace(path) {
                log::debug!("Superseded sound {}", old.display());
            }
        }
        self.shared.wakeup.notify_one();
        Ok(())
    }

    /// Stops accepting requests and waits for the worker.
    ///
    /// A request that is already queued is still played.
    pub fn close(&mut self) {
        self.shared.mailbox.lock().closed = true;
        self.shared.wakeup.notify_one();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Sound worker panicked");
            }
        }
    }
}

impl Drop for SoundQueue {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn worker_loop<P: Playback>(shared: &Shared, backend: &P) {
    loop {
        let path = {
            let mut mailbox = shared.mailbox.lock();
            loop {
                if let Some(path) = mailbox.pending.take() {
                    break path;
                }
                if mailbox.closed {
                    return;
                }
                shared.wakeup.wait(&mut mailbox);
            }
        };

        if let Err(e) = backend.play_sync(&path) {
            log::warn!("{}", e);
        }
    }
}
