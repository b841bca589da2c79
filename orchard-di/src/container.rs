//! Core functionality for resolving service instances.

use crate::component::Component;
use crate::dependencies::Dependencies;
use crate::error::{RegistryError, ResolveError};
use crate::future::{BoxFuture, FutureExt};
use crate::instance_provider::{InstancePtr, InstanceProvider, ServicePtr};
use crate::registry::{Constructor, ServiceDefinition, ServiceRegistry};
use crate::scope::{Scope, SingletonScope};
use crate::token::Token;
use itertools::Either;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, trace};

enum Lookup {
    Cached(InstancePtr),
    Construct(ServiceDefinition),
}

/// Dependency injection container. Uses definitions from the [ServiceRegistry] to create instances
/// and stores [singletons](Scope::Singleton) for reuse. Every container is independent - there is
/// no global state shared between containers.
///
/// Circular dependencies are detected while resolving, by tracking the tokens currently under
/// construction. The tracking state is local to a single top-level resolution.
#[derive(Default)]
pub struct Container {
    registry: ServiceRegistry,
    singletons: SingletonScope,
    resolution_stack: Vec<Token>,
}

impl Container {
    /// Creates a new container using given registry.
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry,
            singletons: Default::default(),
            resolution_stack: Default::default(),
        }
    }

    /// Creates an empty container with explicit duplicate definition handling. See
    /// [ServiceRegistry::new].
    pub fn with_definition_overriding(allow_definition_overriding: bool) -> Self {
        Self::new(ServiceRegistry::new(allow_definition_overriding))
    }

    #[inline]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Registers a complete definition. Re-registering a token drops its cached singleton, so the
    /// new definition is used on next resolution.
    pub fn register_definition(
        &mut self,
        definition: ServiceDefinition,
    ) -> Result<(), RegistryError> {
        let token = definition.token.clone();
        self.registry.register(definition)?;

        if self.singletons.evict(&token) {
            debug!(%token, "Dropped cached instance of re-registered service.");
        }

        Ok(())
    }

    /// Registers a fixed value.
    pub fn register_value<T: Any + Send + Sync>(
        &mut self,
        token: Token,
        value: T,
    ) -> Result<(), RegistryError> {
        self.register_instance(token, ServicePtr::new(value))
    }

    /// Registers an already shared instance.
    pub fn register_instance(
        &mut self,
        token: Token,
        instance: InstancePtr,
    ) -> Result<(), RegistryError> {
        self.register_definition(ServiceDefinition {
            token,
            scope: Scope::Singleton,
            dependencies: vec![],
            constructor: Constructor::Value(instance),
        })
    }

    /// Registers a factory called with resolved `dependencies`.
    pub fn register_factory<T, F>(
        &mut self,
        token: Token,
        dependencies: Vec<Token>,
        scope: Scope,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
        F: Fn(Dependencies) -> Result<T, ResolveError> + Send + Sync + 'static,
    {
        self.register_definition(ServiceDefinition {
            token,
            scope,
            dependencies,
            constructor: Constructor::Factory(Arc::new(move |dependencies| {
                factory(dependencies).map(|instance| ServicePtr::new(instance) as InstancePtr)
            })),
        })
    }

    /// Registers an asynchronous factory called with resolved `dependencies`. Services using
    /// such factories, directly or transitively, can only be resolved with
    /// [InstanceProvider::resolve_async].
    pub fn register_async_factory<T, F, Fut>(
        &mut self,
        token: Token,
        dependencies: Vec<Token>,
        scope: Scope,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
        F: Fn(Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ResolveError>> + Send + 'static,
    {
        self.register_definition(ServiceDefinition {
            token,
            scope,
            dependencies,
            constructor: Constructor::AsyncFactory(Arc::new(move |dependencies| {
                factory(dependencies)
                    .map(|result| {
                        result.map(|instance| ServicePtr::new(instance) as InstancePtr)
                    })
                    .boxed()
            })),
        })
    }

    /// Registers a [Component] constructed from resolved `dependencies`.
    #[inline]
    pub fn register_component<T: Component>(
        &mut self,
        token: Token,
        dependencies: Vec<Token>,
        scope: Scope,
    ) -> Result<(), RegistryError> {
        self.register_factory(token, dependencies, scope, T::create)
    }

    #[inline]
    pub fn has(&self, token: &Token) -> bool {
        self.registry.contains(token)
    }

    /// Returns all registered tokens in registration order.
    #[inline]
    pub fn list_tokens(&self) -> &[Token] {
        self.registry.tokens()
    }

    #[inline]
    pub fn describe(&self, token: &Token) -> Option<&ServiceDefinition> {
        self.registry.definition(token)
    }

    /// Checks if a singleton instance for given token has already been created.
    #[inline]
    pub fn has_instance(&self, token: &Token) -> bool {
        self.singletons.instance(token).is_some()
    }

    /// Removes all definitions and cached instances.
    pub fn clear(&mut self) {
        debug!(
            definitions = self.registry.len(),
            instances = self.singletons.len(),
            "Clearing container."
        );

        self.registry.clear();
        self.singletons.clear();
        self.resolution_stack.clear();
    }

    fn lookup(&self, token: &Token) -> Result<Lookup, ResolveError> {
        if self.resolution_stack.contains(token) {
            let mut path = self.resolution_stack.clone();
            path.push(token.clone());
            return Err(ResolveError::CircularDependency(path));
        }

        let definition = self
            .registry
            .definition(token)
            .ok_or_else(|| ResolveError::ServiceNotFound(token.clone()))?;

        if definition.scope == Scope::Singleton {
            if let Some(instance) = self.singletons.instance(token) {
                return Ok(Lookup::Cached(instance));
            }
        }

        Ok(Lookup::Construct(definition.clone()))
    }

    fn store_instance(&mut self, definition: &ServiceDefinition, instance: &InstancePtr) {
        match definition.scope {
            Scope::Singleton => {
                debug!(token = %definition.token, "Created singleton instance.");
                self.singletons
                    .store_instance(definition.token.clone(), instance.clone());
            }
            Scope::Transient => {
                trace!(token = %definition.token, "Created transient instance.");
            }
        }
    }

    fn resolve_inner(&mut self, token: &Token) -> Result<InstancePtr, ResolveError> {
        let definition = match self.lookup(token)? {
            Lookup::Cached(instance) => return Ok(instance),
            Lookup::Construct(definition) => definition,
        };

        self.resolution_stack.push(token.clone());
        let instance = self.construct(&definition);
        self.resolution_stack.pop();

        let instance = instance?;
        self.store_instance(&definition, &instance);

        Ok(instance)
    }

    fn construct(&mut self, definition: &ServiceDefinition) -> Result<InstancePtr, ResolveError> {
        let constructor = match &definition.constructor {
            Constructor::Value(instance) => Either::Left(instance),
            Constructor::Factory(factory) => Either::Right(factory),
            Constructor::AsyncFactory(_) => {
                return Err(ResolveError::AsynchronousConstructor(
                    definition.token.clone(),
                ))
            }
        };

        let mut dependencies = Dependencies::with_capacity(definition.dependencies.len());
        for token in &definition.dependencies {
            let instance = self.resolve_inner(token)?;
            dependencies.push(token.clone(), instance);
        }

        match constructor {
            Either::Left(instance) => Ok(instance.clone()),
            Either::Right(factory) => factory(dependencies),
        }
    }

    fn resolve_inner_async<'a>(
        &'a mut self,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<InstancePtr, ResolveError>> {
        async move {
            let definition = match self.lookup(token)? {
                Lookup::Cached(instance) => return Ok(instance),
                Lookup::Construct(definition) => definition,
            };

            self.resolution_stack.push(token.clone());
            let instance = self.construct_async(&definition).await;
            self.resolution_stack.pop();

            let instance = instance?;
            self.store_instance(&definition, &instance);

            Ok(instance)
        }
        .boxed()
    }

    async fn construct_async(
        &mut self,
        definition: &ServiceDefinition,
    ) -> Result<InstancePtr, ResolveError> {
        let mut dependencies = Dependencies::with_capacity(definition.dependencies.len());
        for token in &definition.dependencies {
            let instance = self.resolve_inner_async(token).await?;
            dependencies.push(token.clone(), instance);
        }

        match &definition.constructor {
            Constructor::Value(instance) => Ok(instance.clone()),
            Constructor::Factory(factory) => factory(dependencies),
            Constructor::AsyncFactory(factory) => factory(dependencies).await,
        }
    }
}

impl InstanceProvider for Container {
    fn resolve(&mut self, token: &Token) -> Result<InstancePtr, ResolveError> {
        // a panicking constructor can leave stale entries behind
        self.resolution_stack.clear();

        let result = self.resolve_inner(token);
        debug_assert!(self.resolution_stack.is_empty());

        result
    }

    fn resolve_async<'a>(
        &'a mut self,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<InstancePtr, ResolveError>> {
        // stale entries can also come from a dropped resolution future
        self.resolution_stack.clear();
        self.resolve_inner_async(token)
    }
}
