mod config;

pub use self::config::{CacheSettings, EngineSettings, Settings, SourceSettings};
