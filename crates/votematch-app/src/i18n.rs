use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use votematch_core::survey::Translate;

/// Supported interface languages. The historical six-locale table was
/// retired upstream; English and Afrikaans are the surviving set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Af,
}

impl Locale {
    pub const SUPPORTED: [Locale; 2] = [Locale::En, Locale::Af];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Af => "af",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "af" => Some(Locale::Af),
            _ => None,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Af => "Afrikaans",
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("failed to read translations {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse translations {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("translations in {path:?} must be a JSON object")]
    NotAnObject { path: PathBuf },
}

/// Translation tables for every supported locale, flattened to
/// dot-separated keys. Lookup falls back to English, then to the key
/// itself, so a missing entry degrades visibly instead of failing.
#[derive(Debug)]
pub struct Translator {
    tables: HashMap<Locale, HashMap<String, String>>,
    locale: Locale,
}

impl Translator {
    pub fn load(dir: &Path, locale: Locale) -> Result<Self, TranslationError> {
        let mut tables = HashMap::new();
        for supported in Locale::SUPPORTED {
            let path = dir.join(format!("{}.json", supported.as_str()));
            tables.insert(supported, load_table(&path)?);
        }
        Ok(Self { tables, locale })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.tables
            .get(&self.locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(&Locale::En)
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }
}

impl Translate for Translator {
    fn translate(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(text) => text.to_string(),
            None => {
                warn!(key, "missing translation");
                key.to_string()
            }
        }
    }
}

fn load_table(path: &Path) -> Result<HashMap<String, String>, TranslationError> {
    let raw = fs::read_to_string(path).map_err(|source| TranslationError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| TranslationError::Parse {
        source,
        path: path.to_path_buf(),
    })?;
    let Value::Object(_) = value else {
        return Err(TranslationError::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    let mut table = HashMap::new();
    flatten("", &value, &mut table);
    Ok(table)
}

/// Nested objects become dot-separated keys: {"axes": {"economic": {"short":
/// "Economy"}}} yields "axes.economic.short".
fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let nested = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&nested, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
