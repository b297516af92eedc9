//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BrokerConfig, ConfigError, Environment, ServerConfig,
};
