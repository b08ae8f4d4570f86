pub mod file;
pub mod memory;
pub mod traits;

use crate::{
    config::StoreConfig,
    error::Result,
    i18n::{Language, Theme},
    models::HistoryEntry,
};
use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::PreferenceStore;

pub const API_KEY: &str = "api_key";
pub const THEME: &str = "theme";
pub const LANGUAGE: &str = "language";
pub const LAST_PROMPT: &str = "last_prompt";
pub const HISTORY: &str = "generated_images";

pub const HISTORY_LIMIT: usize = 50;

/// Largest `data:` URI kept in a history entry; bigger inline images are
/// stored as thumbnails.
pub const HISTORY_INLINE_LIMIT: usize = 128 * 1024;

/// Typed view over a [`PreferenceStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = FileStore::open(config.resolved_path())?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        self.store.get(API_KEY)
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        self.store.set(API_KEY, key.trim())
    }

    pub fn clear_api_key(&self) -> Result<()> {
        self.store.remove(API_KEY)
    }

    /// Unknown or unreadable values read as `None`.
    pub fn theme(&self) -> Option<Theme> {
        self.store
            .get(THEME)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME, theme.as_str())
    }

    pub fn language(&self) -> Option<Language> {
        self.store
            .get(LANGUAGE)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store.set(LANGUAGE, language.code())
    }

    pub fn last_prompt(&self) -> Result<Option<String>> {
        self.store.get(LAST_PROMPT)
    }

    pub fn set_last_prompt(&self, prompt: &str) -> Result<()> {
        self.store.set(LAST_PROMPT, prompt)
    }

    pub fn clear_last_prompt(&self) -> Result<()> {
        self.store.remove(LAST_PROMPT)
    }

    /// Newest first. A corrupt history value reads as empty.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(HISTORY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    log::warn!("Discarding unreadable history: {}", e);
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Prepends `entry` and evicts anything past [`HISTORY_LIMIT`].
    pub fn push_history(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.history()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);
        self.store.set(HISTORY, &serde_json::to_string(&entries)?)?;
        Ok(entries)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.store.remove(HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> Preferences {
        Preferences::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn history_is_bounded_newest_first() {
        let prefs = prefs();
        for i in 0..51 {
            prefs
                .push_history(HistoryEntry::new(
                    format!("prompt {}", i),
                    format!("https://img.test/{}.png", i),
                ))
                .unwrap();
        }

        let history = prefs.history().unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].prompt, "prompt 50");
        assert_eq!(history[49].prompt, "prompt 1");
        assert!(history.iter().all(|e| e.prompt != "prompt 0"));
    }

    #[test]
    fn corrupt_history_reads_empty() {
        let prefs = prefs();
        prefs.store().set(HISTORY, "[{broken").unwrap();
        assert!(prefs.history().unwrap().is_empty());
    }

    #[test]
    fn typed_accessors_round_values() {
        let prefs = prefs();
        prefs.set_api_key("  AIzaKEY  ").unwrap();
        assert_eq!(prefs.api_key().unwrap().as_deref(), Some("AIzaKEY"));

        prefs.store().set(THEME, "purple").unwrap();
        assert_eq!(prefs.theme(), None);
        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(prefs.theme(), Some(Theme::Dark));

        prefs.set_last_prompt("a cat").unwrap();
        prefs.clear_last_prompt().unwrap();
        assert_eq!(prefs.last_prompt().unwrap(), None);
    }
}
