//! Background reconciliation of the vault with its directory.
//!
//! One named thread runs [`Vault::reconcile`] on a fixed interval. Stopping
//! sends on a channel and joins the thread, so once [`FileSyncWatcher::stop`]
//! returns no pass is running or will run.

use crate::config::SyncConfig;
use crate::error::{Result, VaultError};
use crate::vault::{SyncReport, Vault};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default pause between passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Polls the vault directory and folds outside edits into the cache.
pub struct FileSyncWatcher {
    vault: Arc<Vault>,
    interval: Duration,
    passes: Arc<AtomicU64>,
    worker: Option<Worker>,
}

impl FileSyncWatcher {
    pub fn new(vault: Arc<Vault>, interval: Duration) -> Self {
        Self {
            vault,
            interval,
            passes: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    pub fn from_config(vault: Arc<Vault>, config: &SyncConfig) -> Self {
        Self::new(vault, config.interval())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of passes the background thread has finished.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Spawn the background thread. The first pass runs immediately.
    ///
    /// A thread that already exited (it panicked) is joined and replaced.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(VaultError::WatcherAlreadyRunning);
        }
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel();
        let vault = Arc::clone(&self.vault);
        let passes = Arc::clone(&self.passes);
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("notevault-sync".to_owned())
            .spawn(move || run_loop(&vault, interval, &stop_rx, &passes))?;

        self.worker = Some(Worker { stop_tx, handle });
        info!(
            root = %self.vault.root().display(),
            interval_ms = self.interval.as_millis() as u64,
            "sync watcher started"
        );
        Ok(())
    }

    /// Signal the thread and wait for it to exit. No-op if not started.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        // A send error only means the thread is already gone.
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            warn!("sync watcher thread panicked");
        }
        info!("sync watcher stopped");
    }

    /// Run one pass on the calling thread.
    pub fn run_once(&self) -> Result<SyncReport> {
        self.vault.reconcile()
    }
}

impl Drop for FileSyncWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(vault: &Vault, interval: Duration, stop_rx: &Receiver<()>, passes: &AtomicU64) {
    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        match vault.reconcile() {
            Ok(report) => debug!(
                added = report.added,
                reloaded = report.reloaded,
                unchanged = report.unchanged,
                failed = report.failed,
                "sync pass finished"
            ),
            Err(e) => warn!(error = %e, "sync pass failed"),
        }
        passes.fetch_add(1, Ordering::Release);

        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
