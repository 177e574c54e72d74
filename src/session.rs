//! Session state owned by the UI thread and the channel background work
//! uses to hand results back to it.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::codecs::CodecCatalog;
use crate::models::VideoMetadata;

/// Metadata and the catalog derived from it. Never mutated once built.
#[derive(Debug, Default, PartialEq)]
pub struct Snapshot {
    pub video: VideoMetadata,
    pub catalog: CodecCatalog,
}

#[derive(Debug, Default)]
pub struct Session {
    current: Option<Arc<Snapshot>>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new fetch. Results from earlier fetches become stale.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Swaps in a new snapshot if it belongs to the latest fetch.
    pub fn accept(&mut self, generation: u64, snapshot: Snapshot) -> Option<Arc<Snapshot>> {
        if !self.is_current(generation) {
            log::debug!(
                "dropping stale fetch {} (current is {})",
                generation,
                self.generation
            );
            return None;
        }
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }
}

/// Sends messages to the UI thread and wakes it up.
pub struct Courier<T> {
    tx: Sender<T>,
    repaint: Option<egui::Context>,
}

impl<T> Clone for Courier<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            repaint: self.repaint.clone(),
        }
    }
}

impl<T> Courier<T> {
    pub fn channel(repaint: Option<egui::Context>) -> (Self, Receiver<T>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx, repaint }, rx)
    }

    /// Returns false once the receiving side is gone.
    pub fn deliver(&self, message: T) -> bool {
        if self.tx.send(message).is_err() {
            log::debug!("UI channel closed, dropping message");
            return false;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
        true
    }
}

/// Runs `work` on a named background thread and delivers its result.
pub fn spawn_task<T, F>(name: &str, courier: Courier<T>, work: F) -> std::io::Result<thread::JoinHandle<()>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        courier.deliver(work());
    })
}
