use crate::i18n::Locale;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};
use votematch_core::survey::SurveyMode;

pub const LANG_KEY: &str = "lang";
pub const MODE_KEY: &str = "mode";

/// Minimal key-value capability so preference handling is testable without
/// a real environment-bound store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Flat string map persisted as JSON. A missing file is an empty store; an
/// unreadable one degrades to empty with a warning, since preferences are
/// never worth refusing to start over.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(path = %path.display(), %error, "ignoring malformed preference file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    fn persist(&self) {
        match serde_json::to_string_pretty(&self.entries) {
            Ok(raw) => {
                if let Err(error) = fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), %error, "could not persist preferences");
                }
            }
            Err(error) => warn!(%error, "could not serialize preferences"),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// The two persisted scalar preferences: interface locale and survey mode.
/// Read once at startup; written through on explicit change. Absent or
/// invalid stored values fall back to `en` and `full`.
#[derive(Debug)]
pub struct Preferences<S: KeyValueStore> {
    store: S,
    locale: Locale,
    mode: SurveyMode,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn load(store: S) -> Self {
        let locale = match store.get(LANG_KEY) {
            Some(raw) => Locale::from_str(&raw).unwrap_or_else(|| {
                debug!(stored = raw.as_str(), "unknown stored locale, using default");
                Locale::default()
            }),
            None => Locale::default(),
        };
        let mode = match store.get(MODE_KEY) {
            Some(raw) => SurveyMode::from_str(&raw).unwrap_or_else(|| {
                debug!(stored = raw.as_str(), "unknown stored mode, using default");
                SurveyMode::default()
            }),
            None => SurveyMode::default(),
        };
        Self {
            store,
            locale,
            mode,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn mode(&self) -> SurveyMode {
        self.mode
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        self.store.set(LANG_KEY, locale.as_str());
    }

    pub fn set_mode(&mut self, mode: SurveyMode) {
        self.mode = mode;
        self.store.set(MODE_KEY, mode.as_str());
    }
}
