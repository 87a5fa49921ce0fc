//! Options file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_options;
use crate::config::schema::LogOptions;

/// A watcher that monitors an options file for changes.
pub struct OptionsWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LogOptions>,
}

impl OptionsWatcher {
    /// Create a new OptionsWatcher.
    ///
    /// Returns the watcher and a receiver for reloaded options.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogOptions>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. Keep the returned watcher alive for as long as
    /// reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "options file changed, reloading");
                        match load_options(&path) {
                            Ok(options) => {
                                let _ = tx.send(options);
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to reload options; keeping current configuration");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "options watcher started");
        Ok(watcher)
    }
}
