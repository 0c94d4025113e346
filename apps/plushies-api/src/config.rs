//! Configuration for Plushies API

use core_config::{AppInfo, FromEnv, api_keys::ApiKeyConfig, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub api_keys: ApiKeyConfig,
    /// Error bodies carry a `stack` field; only with an explicit development environment
    pub expose_stack_traces: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);
        let server = ServerConfig::from_env()?;
        let api_keys = ApiKeyConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
            api_keys,
            expose_stack_traces: core_config::is_explicit_development(),
        })
    }
}
