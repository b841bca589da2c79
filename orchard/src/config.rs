//! Framework configuration is based on [ApplicationConfig], which is used by the
//! [Application](crate::application::Application) to configure itself.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `ORCHARD_` or the `orchard.json` file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "ORCHARD";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "orchard.json";

/// Framework configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed when creating the application.
    pub install_tracing_logger: bool,
    /// Should registering the same service token twice replace the previous definition, instead
    /// of failing.
    pub allow_definition_overriding: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            allow_definition_overriding: true,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            allow_definition_overriding: value
                .allow_definition_overriding
                .unwrap_or(default.allow_definition_overriding),
        }
    }
}

impl ApplicationConfig {
    /// Reads the config from the optional [CONFIG_FILE] and environment variables, which take
    /// precedence.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Self::load(environment())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment)
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }

    pub fn with_install_tracing_logger(mut self, install_tracing_logger: bool) -> Self {
        self.install_tracing_logger = install_tracing_logger;
        self
    }

    pub fn with_definition_overriding(mut self, allow_definition_overriding: bool) -> Self {
        self.allow_definition_overriding = allow_definition_overriding;
        self
    }
}

fn environment() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true)
}

#[derive(Deserialize, Default)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
    allow_definition_overriding: Option<bool>,
}
