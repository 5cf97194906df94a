//! Service thread
//!
//! Runs a `RepositoryManager` on a dedicated thread. Watch callbacks only
//! post `ServiceMessage`s into the channel; the loop blocks until the next
//! message or the earliest retry deadline, whichever comes first.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::application::manager::RepositoryManager;
use crate::domain::ports::{Clock, FileSystem, RawEvent, WatchBackend};
use crate::error::ChangeLoggerResult;
use crate::infrastructure::{LocalFs, NotifyBackend, StorageLayout, SystemClock};

/// Name of the service thread
pub const SERVICE_THREAD_NAME: &str = "changelogger";

/// Input of the service loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceMessage {
    /// Raw event from the folder subscription of a repository
    Folder {
        repository: String,
        generation: u64,
        event: RawEvent,
    },
    /// The configuration file was touched
    ConfigTouched,
    Shutdown,
}

/// Event loop around a manager
pub struct ChangeLoggerService<FS, W, C>
where
    FS: FileSystem,
    W: WatchBackend,
    C: Clock,
{
    manager: RepositoryManager<FS, W, C>,
    inbox: Receiver<ServiceMessage>,
}

impl<FS, W, C> ChangeLoggerService<FS, W, C>
where
    FS: FileSystem,
    W: WatchBackend,
    C: Clock,
{
    pub fn new(manager: RepositoryManager<FS, W, C>, inbox: Receiver<ServiceMessage>) -> Self {
        Self { manager, inbox }
    }

    /// Run until a `Shutdown` message arrives.
    pub fn run(mut self) {
        self.manager.start(Instant::now());

        loop {
            let message = match self.manager.next_deadline() {
                None => match self.inbox.recv() {
                    Ok(message) => Some(message),
                    Err(_) => break,
                },
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match self.inbox.recv_timeout(timeout) {
                        Ok(message) => Some(message),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            };

            if let Some(message) = message {
                if !self.manager.handle(message, Instant::now()) {
                    break;
                }
            }
            self.manager.tick(Instant::now());
        }

        self.manager.shutdown();
    }
}

/// Handle to a running service. Dropping it stops the service.
pub struct ServiceHandle {
    outbox: Sender<ServiceMessage>,
    thread: Option<JoinHandle<()>>,
}

impl ServiceHandle {
    /// Stop the service and wait for its thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.outbox.send(ServiceMessage::Shutdown);
        if thread.join().is_err() {
            tracing::warn!("service thread panicked");
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the service on the local disk with `notify` watches.
pub fn start(layout: StorageLayout) -> ChangeLoggerResult<ServiceHandle> {
    start_with(LocalFs::new(), NotifyBackend::new(), SystemClock, layout)
}

/// Start the service with explicit collaborators.
pub fn start_with<FS, W, C>(
    fs: FS,
    backend: W,
    clock: C,
    layout: StorageLayout,
) -> ChangeLoggerResult<ServiceHandle>
where
    FS: FileSystem + Send + 'static,
    W: WatchBackend + Send + 'static,
    C: Clock + Send + 'static,
{
    let (outbox, inbox) = mpsc::channel();
    let manager = RepositoryManager::new(fs, backend, clock, layout, outbox.clone());
    let service = ChangeLoggerService::new(manager, inbox);

    let thread = thread::Builder::new()
        .name(SERVICE_THREAD_NAME.to_string())
        .spawn(move || service.run())?;

    Ok(ServiceHandle {
        outbox,
        thread: Some(thread),
    })
}
