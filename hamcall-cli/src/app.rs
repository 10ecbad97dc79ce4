use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use hamcall_common::{OperatorRecord, Theme};
use hamcall_core::config::HamcallConfig;
use hamcall_core::error::LookupError;
use hamcall_core::module::history::HistoryStore;
use hamcall_core::module::lookup::{Directory, HamDbClient, LookupOrchestrator};
use hamcall_core::module::presenter::{HistoryObserver, MapPresenter};
use hamcall_core::module::theme::{DEFAULT_THEME, ThemeManager};
use hamcall_core::storage::{InstallKind, JsonFileStore, KeyValueStore, initialize_defaults};
use tracing::{error, info};

use crate::render::{HistoryPanel, TerminalMap, TerminalPresenter};

/// Everything one session needs, wired together.
pub struct App {
    orchestrator: LookupOrchestrator,
    history: Arc<HistoryStore>,
    theme: ThemeManager,
    map: Arc<TerminalMap>,
    history_panel: Arc<HistoryPanel>,
}

impl App {
    pub async fn bootstrap(config: &HamcallConfig) -> anyhow::Result<Self> {
        let store = JsonFileStore::new(config.storage_path());
        info!("Using storage file {:?}", store.path());
        let storage: Arc<dyn KeyValueStore> = Arc::new(store);
        let directory = HamDbClient::from_config(config).context("Failed to create directory client")?;

        Ok(Self::assemble(storage, Arc::new(directory)).await)
    }

    /// Wire the components over an existing store and directory.
    pub async fn assemble(storage: Arc<dyn KeyValueStore>, directory: Arc<dyn Directory>) -> Self {
        match initialize_defaults(storage.as_ref()).await {
            Ok(InstallKind::Install) => info!("First run, storage initialized"),
            Ok(InstallKind::Update) => info!("Existing storage found"),
            Err(e) => error!("Failed to initialize storage defaults: {}", e),
        }

        let map = Arc::new(TerminalMap::new(DEFAULT_THEME));
        let map_presenter: Arc<dyn MapPresenter> = map.clone();

        let theme = ThemeManager::init(storage.clone(), Some(map_presenter.clone())).await;

        let history_panel = Arc::new(HistoryPanel::new());
        let observers: Vec<Arc<dyn HistoryObserver>> = vec![history_panel.clone()];
        let history = Arc::new(HistoryStore::load(storage, observers).await);

        let orchestrator = LookupOrchestrator::new(
            directory,
            history.clone(),
            Arc::new(TerminalPresenter),
            Some(map_presenter),
        );

        Self { orchestrator, history, theme, map, history_panel }
    }

    pub async fn lookup(&self, raw: &str) -> Result<OperatorRecord, LookupError> {
        self.orchestrator.submit_lookup(raw).await
    }

    /// Look up the call sign at a zero-based history position again.
    /// `None` when there is no such entry.
    pub async fn recall(&self, index: usize) -> Option<Result<OperatorRecord, LookupError>> {
        let callsign = self.history_panel.callsign_at(index)?;
        Some(self.lookup(&callsign).await)
    }

    pub fn history_text(&self) -> String {
        self.history_panel.render(Utc::now())
    }

    pub async fn clear_history(&self) {
        self.history.clear().await;
    }

    pub async fn toggle_theme(&self) -> Theme {
        self.theme.toggle().await
    }

    pub async fn theme(&self) -> Theme {
        self.theme.current().await
    }

    /// Open the full map for the last located result.
    pub fn expand_map(&self) -> Option<String> {
        self.map.expand()
    }

    pub fn close_map(&self) {
        self.map.close_full();
    }
}
