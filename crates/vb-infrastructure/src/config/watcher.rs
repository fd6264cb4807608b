//! Configuration watcher
//!
//! Holds the current configuration behind an atomic swap and reloads it
//! when the file changes or an update is pushed through the API. Consumers
//! never see a half-applied configuration: they load a complete snapshot
//! or the previous one.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, info, warn};

use vb_domain::error::{Error, Result};

use super::loader::{ConfigLoader, validate_app_config};
use super::types::AppConfig;

type ReloadListener = Box<dyn Fn(&AppConfig) + Send + Sync>;

/// Configuration holder with hot reload
pub struct ConfigWatcher {
    loader: ConfigLoader,
    current: ArcSwap<AppConfig>,
    listeners: Mutex<Vec<ReloadListener>>,
    // Keeps the filesystem watcher alive for the holder's lifetime
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl ConfigWatcher {
    /// Create a holder around an already-loaded configuration
    pub fn new(loader: ConfigLoader, initial: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            loader,
            current: ArcSwap::from_pointee(initial),
            listeners: Mutex::new(Vec::new()),
            watcher: Mutex::new(None),
        })
    }

    /// The current configuration snapshot
    pub fn get_config(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    /// Register a callback invoked after every successful reload/update
    pub fn on_reload<F: Fn(&AppConfig) + Send + Sync + 'static>(&self, listener: F) {
        self.listeners
            .lock()
            .expect("listener lock poisoned")
            .push(Box::new(listener));
    }

    /// Reload from the loader's sources and swap atomically
    pub fn reload(&self) -> Result<Arc<AppConfig>> {
        let config = self.loader.reload()?;
        self.install(config)
    }

    /// Validate, persist (when a file path is configured), and swap
    pub fn update(&self, config: AppConfig) -> Result<Arc<AppConfig>> {
        validate_app_config(&config)?;
        if let Some(path) = self.loader.config_path() {
            self.loader.save_to_file(&config, path)?;
        }
        self.install(config)
    }

    fn install(&self, config: AppConfig) -> Result<Arc<AppConfig>> {
        let config = Arc::new(config);
        self.current.store(Arc::clone(&config));
        info!("configuration applied");
        for listener in self
            .listeners
            .lock()
            .expect("listener lock poisoned")
            .iter()
        {
            listener(&config);
        }
        Ok(config)
    }

    /// Start watching the configuration file for changes
    ///
    /// A modify event triggers a reload; a reload that fails validation is
    /// logged and discarded, leaving the previous snapshot active.
    pub fn watch(self: &Arc<Self>) -> Result<()> {
        let Some(path) = self.loader.config_path().map(PathBuf::from) else {
            warn!("no configuration file path, hot reload disabled");
            return Ok(());
        };

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
        let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            if let Ok(event) = event {
                let _ = tx.send(event);
            }
        })
        .map_err(|e| Error::config_with_source("failed to create file watcher", e))?;

        let watch_root = path.parent().unwrap_or(std::path::Path::new(".")).to_path_buf();
        watcher
            .watch(&watch_root, RecursiveMode::NonRecursive)
            .map_err(|e| Error::config_with_source("failed to watch configuration file", e))?;
        *self.watcher.lock().expect("watcher lock poisoned") = Some(watcher);

        let file_name = path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        let holder = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && event.paths.iter().any(|p| p.ends_with(&file_name));
                if !relevant {
                    continue;
                }
                match holder.reload() {
                    Ok(_) => info!("configuration hot-reloaded from file"),
                    Err(e) => error!(error = %e, "configuration reload rejected"),
                }
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_swaps_and_notifies() {
        let holder = ConfigWatcher::new(ConfigLoader::new(), AppConfig::default());
        let seen = Arc::new(std::sync::atomic::AtomicU16::new(0));
        let seen_in_listener = Arc::clone(&seen);
        holder.on_reload(move |config| {
            seen_in_listener.store(config.server.port, std::sync::atomic::Ordering::SeqCst);
        });

        let mut config = AppConfig::default();
        config.server.port = 9999;
        holder.update(config).unwrap();

        assert_eq!(holder.get_config().server.port, 9999);
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 9999);
    }

    #[test]
    fn invalid_update_keeps_previous_snapshot() {
        let holder = ConfigWatcher::new(ConfigLoader::new(), AppConfig::default());
        let mut config = AppConfig::default();
        config.providers.embedding.clear();
        assert!(holder.update(config).is_err());
        assert!(!holder.get_config().providers.embedding.is_empty());
    }
}
