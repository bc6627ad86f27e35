//! Watch command implementation.

use crate::cli::args::WatchArgs;
use crate::cli::output::Output;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::vault::Vault;
use crate::watcher::FileSyncWatcher;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct WatchSummary {
    pub passes: u64,
    pub notes: usize,
    pub tags: usize,
}

pub fn run(vault: Arc<Vault>, sync: &SyncConfig, args: &WatchArgs, output: &Output) -> Result<()> {
    if !sync.enabled {
        warn!("sync is disabled in config; watching anyway");
    }

    let interval = args
        .interval_ms
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or_else(|| sync.interval());

    let mut watcher = FileSyncWatcher::new(Arc::clone(&vault), interval);
    watcher.start()?;
    output.info(&format!(
        "Watching {} every {}ms",
        vault.root().display(),
        interval.as_millis()
    ));

    match args.seconds {
        Some(seconds) => thread::sleep(Duration::from_secs(seconds)),
        None => loop {
            thread::park();
        },
    }

    watcher.stop();
    output.print(&WatchSummary {
        passes: watcher.passes(),
        notes: vault.len(),
        tags: vault.get_all_tags().len(),
    })
}
