use derive_more::Constructor;
use itertools::Itertools;
use orchard_di::error::ErrorPtr;
use orchard_di::token::Token;
use thiserror::Error;

/// Errors related to driving providers through their lifecycle phases.
#[derive(Error, Clone, Debug)]
pub enum LifecycleError {
    #[error("Multiple providers are named: {0}")]
    DuplicateProviderName(String),
    #[error("Provider {provider} depends on {token}, which is not provided by any provider")]
    MissingProviderDependency { provider: String, token: Token },
    #[error("Service {token} is provided by both {first} and {second}")]
    AmbiguousServiceProvider {
        token: Token,
        first: String,
        second: String,
    },
    #[error("Circular dependency between providers: {}", .0.join(", "))]
    CircularProviderDependency(Vec<String>),
    #[error("Error registering services of provider {provider}: {cause}")]
    ServiceRegistrationFailure {
        provider: String,
        #[source]
        cause: ErrorPtr,
    },
    #[error("Error booting provider {provider}: {cause}")]
    ServiceBootFailure {
        provider: String,
        #[source]
        cause: ErrorPtr,
    },
    #[error("{} provider(s) failed to shut down: {}", .0.len(), .0.iter().join("; "))]
    GroupedShutdownFailure(Vec<ServiceShutdownFailure>),
}

/// Failure of a single provider during shutdown. Shutdown failures are collected into
/// [LifecycleError::GroupedShutdownFailure], so one failing provider does not prevent others from
/// cleaning up.
#[derive(Error, Clone, Debug, Constructor)]
#[error("Error shutting down provider {provider}: {cause}")]
pub struct ServiceShutdownFailure {
    pub provider: String,
    #[source]
    pub cause: ErrorPtr,
}
