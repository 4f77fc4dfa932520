//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, BackdatingPolicy, DatabaseConfig, IngestionConfig, LogFormat, LogSinkConfig,
    LoggingConfig, ServerConfig, StorageSettings,
};
