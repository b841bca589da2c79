use crate::token::Token;
use itertools::Itertools;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// Shared pointer to an opaque error produced by user code, e.g. a failing constructor.
pub type ErrorPtr = Arc<dyn Error + Send + Sync + 'static>;

/// Errors related to resolving service instances.
#[derive(Error, Clone, Debug)]
pub enum ResolveError {
    #[error("Cannot find a service definition for token: {0}")]
    ServiceNotFound(Token),
    #[error("Circular dependency detected: {}", format_path(.0))]
    CircularDependency(Vec<Token>),
    #[error("Instance registered as {token} is not of requested type: {expected}")]
    IncompatibleInstance {
        token: Token,
        expected: &'static str,
    },
    #[error("Service {0} has an asynchronous constructor and must be resolved asynchronously")]
    AsynchronousConstructor(Token),
    #[error("Constructor requested dependency #{index}, but only {available} were declared")]
    MissingArgument { index: usize, available: usize },
    #[error(transparent)]
    Constructor(ErrorPtr),
}

impl ResolveError {
    /// Wraps an arbitrary error produced while constructing an instance.
    pub fn constructor<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Constructor(convert_error(error))
    }
}

/// Errors related to the service definition registry.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum RegistryError {
    #[error("Attempted to re-register a service with token: {0}")]
    DuplicateDefinition(Token),
}

/// Converts any error into an [ErrorPtr].
pub fn convert_error<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

fn format_path(path: &[Token]) -> String {
    path.iter().join(" -> ")
}
