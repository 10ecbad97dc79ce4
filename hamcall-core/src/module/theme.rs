///! Dark/light theme preference

use std::sync::Arc;

use hamcall_common::Theme;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::presenter::MapPresenter;
use crate::storage::{KEY_DARK_MODE, KeyValueStore};

/// Theme used when nothing is stored
pub const DEFAULT_THEME: Theme = Theme::Dark;

pub struct ThemeManager {
    storage: Arc<dyn KeyValueStore>,
    theme: RwLock<Theme>,
    map: Option<Arc<dyn MapPresenter>>,
}

impl ThemeManager {
    /// Read the stored preference once. Absent or unreadable → dark.
    pub async fn init(storage: Arc<dyn KeyValueStore>, map: Option<Arc<dyn MapPresenter>>) -> Self {
        let theme = match storage.get(KEY_DARK_MODE).await {
            Ok(Some(Value::Bool(dark_mode))) => Theme::from_dark_mode(dark_mode),
            Ok(Some(other)) => {
                warn!("Unexpected {} value {}, using default theme", KEY_DARK_MODE, other);
                DEFAULT_THEME
            }
            Ok(None) => DEFAULT_THEME,
            Err(e) => {
                error!("Failed to read theme preference: {}", e);
                DEFAULT_THEME
            }
        };
        info!("Initialized theme (dark mode: {})", theme.is_dark());

        if let Some(map) = &map {
            map.apply_theme(theme);
        }

        Self {
            storage,
            theme: RwLock::new(theme),
            map,
        }
    }

    pub async fn current(&self) -> Theme {
        *self.theme.read().await
    }

    /// Flip the theme, persist it and redraw the map.
    pub async fn toggle(&self) -> Theme {
        let mut theme = self.theme.write().await;
        *theme = theme.toggled();

        if let Err(e) = self.storage.set(KEY_DARK_MODE, Value::Bool(theme.is_dark())).await {
            error!("Failed to save theme preference: {}", e);
        }
        if let Some(map) = &self.map {
            map.apply_theme(*theme);
        }

        info!("Toggled theme to {} mode", *theme);
        *theme
    }
}
