pub mod settings;

pub use settings::{AppConfig, SearchSettings, StorageSettings, COMPETITIONS_BASE_URL};
