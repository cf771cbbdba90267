//! Fire-and-forget dispatch of persistent store writes.
//!
//! The controller never waits on disk. In [`WriteMode::Background`] every
//! write becomes a [`PersistJob`] on an unbounded channel drained by one
//! dedicated writer thread; jobs are applied in the order they were sent.
//! [`WriteMode::Inline`] applies jobs on the caller's thread, which lets
//! tests observe writes deterministically.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::model::{CacheEntry, CacheKey};
use crate::store::PersistentStore;

/// How persistent writes are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Queue writes to a background writer thread.
    #[default]
    Background,
    /// Apply writes synchronously before returning.
    Inline,
}

/// A unit of work for the writer.
pub enum PersistJob {
    Save {
        key: CacheKey,
        entry: Arc<CacheEntry>,
    },
    Remove(CacheKey),
    Clear,
    /// Completes once every job queued before it has been applied.
    Flush(oneshot::Sender<()>),
}

enum Dispatch {
    Inline(Arc<dyn PersistentStore>),
    Queue(mpsc::UnboundedSender<PersistJob>),
    /// The writer could not be started; persistent writes are dropped.
    Dropped,
}

/// Hands [`PersistJob`]s to the persistent store without blocking the caller.
///
/// Failures are logged and swallowed: the store is an accelerator and a lost
/// write only costs a cold start. The writer thread exits once the
/// `PersistWriter` is dropped and the queue is drained.
pub struct PersistWriter {
    dispatch: Dispatch,
}

impl PersistWriter {
    pub fn new(store: Arc<dyn PersistentStore>, mode: WriteMode) -> Self {
        let dispatch = match mode {
            WriteMode::Inline => Dispatch::Inline(store),
            WriteMode::Background => spawn_writer(store),
        };
        Self { dispatch }
    }

    /// Queues `job`. Returns immediately in background mode.
    pub fn submit(&self, job: PersistJob) {
        match &self.dispatch {
            Dispatch::Inline(store) => apply(store.as_ref(), job),
            Dispatch::Queue(tx) => {
                if tx.send(job).is_err() {
                    tracing::warn!("listing writer has stopped; persistent write dropped");
                }
            }
            Dispatch::Dropped => {}
        }
    }

    /// Blocks until every job submitted so far has been applied.
    ///
    /// # Panics
    ///
    /// Must not be called from within an async runtime, since it waits
    /// with a blocking receive.
    pub fn flush(&self) {
        let Dispatch::Queue(tx) = &self.dispatch else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(PersistJob::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.blocking_recv();
    }

    /// Returns `true` if writes reach the store (inline or via a running writer).
    pub fn is_persisting(&self) -> bool {
        !matches!(self.dispatch, Dispatch::Dropped)
    }
}

fn spawn_writer(store: Arc<dyn PersistentStore>) -> Dispatch {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistJob>();
    let spawned = std::thread::Builder::new()
        .name("flcache-writer".to_string())
        .spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                apply(store.as_ref(), job);
            }
            tracing::debug!("listing writer stopped");
        });

    match spawned {
        Ok(_) => Dispatch::Queue(tx),
        Err(e) => {
            tracing::warn!("could not start listing writer, cache is memory-only: {e}");
            Dispatch::Dropped
        }
    }
}

fn apply(store: &dyn PersistentStore, job: PersistJob) {
    match job {
        PersistJob::Save { key, entry } => {
            if let Err(e) = store.save(&key, &entry) {
                tracing::warn!("failed to persist listing for {key}: {e}");
            }
        }
        PersistJob::Remove(key) => {
            if let Err(e) = store.remove(&key) {
                tracing::warn!("failed to remove persisted listing for {key}: {e}");
            }
        }
        PersistJob::Clear => {
            if let Err(e) = store.clear() {
                tracing::warn!("failed to clear persisted listings: {e}");
            }
        }
        PersistJob::Flush(done) => {
            let _ = done.send(());
        }
    }
}
