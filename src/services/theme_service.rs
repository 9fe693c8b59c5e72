use crate::domain::errors::StorageError;
use crate::domain::interfaces::KeyValueStore;
use crate::domain::models::ThemeColors;
use log::{debug, warn};
use std::sync::Arc;

pub const THEME_KEY: &str = "vanda_tema";

#[derive(Clone)]
pub struct ThemeService {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Best effort: any problem is logged and the default colors are used.
    pub fn load(&self) -> ThemeColors {
        let raw = match self.store.get_item(THEME_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved theme, using defaults");
                return ThemeColors::default();
            }
            Err(e) => {
                warn!("Could not load theme: {}", e);
                return ThemeColors::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Could not load theme: {}", e);
            ThemeColors::default()
        })
    }

    pub fn save(&self, colors: &ThemeColors) -> Result<(), StorageError> {
        let json = serde_json::to_string(colors)?;
        self.store.set_item(THEME_KEY, &json)
    }
}
