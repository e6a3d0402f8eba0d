pub mod archive;
pub mod config;
pub mod continuity;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod routes;
pub mod settings;
pub mod transition;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use log::{info, warn, LevelFilter};

use archive::ArchiveStore;
use config::ShellConfig;
use continuity::{MemorySessionStorage, NavigationContinuityStore};
use lifecycle::{AuthGate, PageLifecycleController, ShellPorts};
use ports::NativeTransition;
use routes::RouteTable;
use settings::SettingsStore;
use transition::TransitionCoordinator;

/// Initializes `env_logger` from `RUST_LOG`, defaulting to `Info`
/// (`Debug` when `debug` is set).
pub fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Everything the shell wires together at startup.
pub struct StoryShell {
    archive: Arc<ArchiveStore>,
    settings: Option<SettingsStore>,
    controller: PageLifecycleController,
}

impl StoryShell {
    pub fn new(
        config: &ShellConfig,
        archive: Arc<ArchiveStore>,
        routes: RouteTable,
        auth: Arc<dyn AuthGate>,
        ports: ShellPorts,
        native: Arc<dyn NativeTransition>,
    ) -> Result<Self> {
        let settings = match config.settings_path() {
            Some(path) => Some(SettingsStore::new(path)?),
            None => None,
        };

        if routes.is_empty() {
            warn!("No pages registered; every route will render not-found");
        }
        let route_count = routes.len();

        let continuity = NavigationContinuityStore::new(Arc::new(MemorySessionStorage::new()));
        let controller = PageLifecycleController::new(
            routes,
            auth,
            TransitionCoordinator::new(native),
            continuity,
            ports,
        );

        info!(
            "Story shell ready with {route_count} routes (archive storage: {})",
            config
                .database_path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "unavailable".into())
        );

        Ok(Self {
            archive,
            settings,
            controller,
        })
    }

    pub fn archive(&self) -> &Arc<ArchiveStore> {
        &self.archive
    }

    pub fn settings(&self) -> Option<&SettingsStore> {
        self.settings.as_ref()
    }

    pub fn controller(&self) -> &PageLifecycleController {
        &self.controller
    }

    /// Releases the archive connection. Called once when the app unloads.
    pub async fn shutdown(&self) {
        self.archive.close().await;
        info!("Story shell shut down");
    }
}
