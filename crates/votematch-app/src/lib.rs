pub mod catalog;
pub mod i18n;
pub mod logging;
pub mod prefs;

pub use catalog::{CatalogError, CatalogStore};
pub use i18n::{Locale, Translator};
pub use prefs::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Preferences};
