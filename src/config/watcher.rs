//! Control directory watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_routing_tables;
use crate::config::store::RoutingTables;

/// Watches the control directory and rebuilds the routing tables on change.
pub struct ControlWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RoutingTables>,
}

impl ControlWatcher {
    /// Create a new watcher.
    ///
    /// Returns the watcher and a receiver for rebuilt table sets; the
    /// consumer swaps them into the `DomainConfigStore`.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RoutingTables>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The loader is tolerant: a broken file or domain entry is logged and
    /// skipped, so a bad push to the control repository narrows routing
    /// instead of killing the process.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Control directory change detected, reloading");
                        let _ = tx.send(load_routing_tables(&path));
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::Recursive)?;

        tracing::info!(path = ?self.path, "Control watcher started");
        Ok(watcher)
    }
}
