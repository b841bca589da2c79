//! Functionality related to registering definitions of services. The
//! [Container](crate::container::Container) creates instances based on those definitions.

use crate::dependencies::Dependencies;
use crate::error::{RegistryError, ResolveError};
use crate::future::BoxFuture;
use crate::instance_provider::InstancePtr;
use crate::scope::Scope;
use crate::token::Token;
use derivative::Derivative;
use fxhash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Synchronous constructor for type-erased instances.
pub type SyncFactory =
    Arc<dyn Fn(Dependencies) -> Result<InstancePtr, ResolveError> + Send + Sync + 'static>;

/// Asynchronous constructor for type-erased instances.
pub type AsyncFactory = Arc<
    dyn Fn(Dependencies) -> BoxFuture<'static, Result<InstancePtr, ResolveError>>
        + Send
        + Sync
        + 'static,
>;

/// The way a service instance gets constructed. Exactly one method is used per definition.
#[derive(Clone)]
pub enum Constructor {
    /// Fixed, pre-built instance.
    Value(InstancePtr),
    /// Factory called with resolved dependencies.
    Factory(SyncFactory),
    /// Factory called with resolved dependencies, which needs to be awaited.
    AsyncFactory(AsyncFactory),
}

impl Constructor {
    #[inline]
    pub fn is_async(&self) -> bool {
        matches!(self, Constructor::AsyncFactory(_))
    }

    /// Short, human-readable description of the construction method.
    pub fn kind(&self) -> &'static str {
        match self {
            Constructor::Value(_) => "value",
            Constructor::Factory(_) => "factory",
            Constructor::AsyncFactory(_) => "async factory",
        }
    }
}

/// Definition of a service registered in a [ServiceRegistry].
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ServiceDefinition {
    pub token: Token,

    /// Decides if instances are cached.
    pub scope: Scope,

    /// Tokens resolved before construction. The order determines the positional order of
    /// [Dependencies] passed to the constructor.
    pub dependencies: Vec<Token>,

    #[derivative(Debug = "ignore")]
    pub constructor: Constructor,
}

/// Registry of service definitions. Keeps the order in which tokens were first registered.
#[derive(Clone, Debug)]
pub struct ServiceRegistry {
    definitions: FxHashMap<Token, ServiceDefinition>,
    order: Vec<Token>,
    allow_definition_overriding: bool,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ServiceRegistry {
    /// Creates an empty registry. With `allow_definition_overriding`, registering a token twice
    /// replaces the previous definition; otherwise it is an error.
    pub fn new(allow_definition_overriding: bool) -> Self {
        Self {
            definitions: Default::default(),
            order: Default::default(),
            allow_definition_overriding,
        }
    }

    #[inline]
    pub fn allows_definition_overriding(&self) -> bool {
        self.allow_definition_overriding
    }

    /// Adds a new definition. See [ServiceRegistry::new] for duplicate handling.
    pub fn register(&mut self, definition: ServiceDefinition) -> Result<(), RegistryError> {
        if let Some(existing) = self.definitions.get_mut(&definition.token) {
            if !self.allow_definition_overriding {
                return Err(RegistryError::DuplicateDefinition(definition.token));
            }

            debug!(token = %definition.token, "Overriding service definition.");
            *existing = definition;
        } else {
            self.order.push(definition.token.clone());
            self.definitions.insert(definition.token.clone(), definition);
        }

        Ok(())
    }

    #[inline]
    pub fn definition(&self, token: &Token) -> Option<&ServiceDefinition> {
        self.definitions.get(token)
    }

    #[inline]
    pub fn contains(&self, token: &Token) -> bool {
        self.definitions.contains_key(token)
    }

    /// Returns all registered tokens in registration order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
        self.order.clear();
    }
}
