use crate::error::ResolveError;
use crate::future::{BoxFuture, FutureExt};
use crate::token::Token;
use std::any::{type_name, Any};
use std::sync::Arc;

pub use crate::error::ErrorPtr;

/// Pointer to a resolved, strongly-typed service instance.
pub type ServicePtr<T> = Arc<T>;

/// Pointer to a type-erased service instance, as stored by the container.
pub type InstancePtr = ServicePtr<dyn Any + Send + Sync + 'static>;

/// Generic provider for service instances. Providers are [Send], so asynchronous resolution can
/// be boxed and moved between threads.
pub trait InstanceProvider: Send {
    /// Resolves an instance for the given token, constructing its dependencies first. Fails if any
    /// service in the chain requires asynchronous construction.
    fn resolve(&mut self, token: &Token) -> Result<InstancePtr, ResolveError>;

    /// Resolves an instance for the given token, awaiting asynchronous constructors along the way.
    fn resolve_async<'a>(
        &'a mut self,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<InstancePtr, ResolveError>>;
}

/// Helper trait for [InstanceProvider] providing strongly-typed access.
pub trait TypedInstanceProvider {
    /// Typesafe version of [InstanceProvider::resolve].
    fn resolve_typed<T: Any + Send + Sync>(
        &mut self,
        token: &Token,
    ) -> Result<ServicePtr<T>, ResolveError>;

    /// Typesafe version of [InstanceProvider::resolve_async].
    fn resolve_typed_async<'a, T: Any + Send + Sync>(
        &'a mut self,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<ServicePtr<T>, ResolveError>>;

    /// Tries to resolve an instance like [TypedInstanceProvider::resolve_typed] does, but returns
    /// `None` if the requested token itself is not registered. Missing transitive dependencies are
    /// still reported as errors.
    fn resolve_option<T: Any + Send + Sync>(
        &mut self,
        token: &Token,
    ) -> Result<Option<ServicePtr<T>>, ResolveError>;
}

impl<P: InstanceProvider + ?Sized> TypedInstanceProvider for P {
    fn resolve_typed<T: Any + Send + Sync>(
        &mut self,
        token: &Token,
    ) -> Result<ServicePtr<T>, ResolveError> {
        self.resolve(token)
            .and_then(|instance| downcast_instance(token, instance))
    }

    fn resolve_typed_async<'a, T: Any + Send + Sync>(
        &'a mut self,
        token: &'a Token,
    ) -> BoxFuture<'a, Result<ServicePtr<T>, ResolveError>> {
        async move {
            let instance = self.resolve_async(token).await?;
            downcast_instance(token, instance)
        }
        .boxed()
    }

    fn resolve_option<T: Any + Send + Sync>(
        &mut self,
        token: &Token,
    ) -> Result<Option<ServicePtr<T>>, ResolveError> {
        match self.resolve_typed(token) {
            Ok(instance) => Ok(Some(instance)),
            Err(ResolveError::ServiceNotFound(missing)) if &missing == token => Ok(None),
            Err(error) => Err(error),
        }
    }
}

/// Casts a type-erased instance to the concrete type requested for given token.
pub fn downcast_instance<T: Any + Send + Sync>(
    token: &Token,
    instance: InstancePtr,
) -> Result<ServicePtr<T>, ResolveError> {
    instance
        .downcast::<T>()
        .map_err(|_| ResolveError::IncompatibleInstance {
            token: token.clone(),
            expected: type_name::<T>(),
        })
}
