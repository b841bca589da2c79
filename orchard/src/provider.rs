//! [ServiceProvider]s are units of configuration. Each provider registers its services in the
//! [Container], declares which services it provides and which services provided by others it
//! depends on. Based on those declarations, the [ServiceManager](crate::manager::ServiceManager)
//! boots providers after their dependencies and shuts them down in reverse order.
//!
//! Booting and shutting down are optional capabilities, exposed via [ServiceProvider::as_boot] and
//! [ServiceProvider::as_shutdown]. A provider without a capability simply does not take part in
//! given phase:
//!
//! ```
//! use orchard::provider::{Boot, ServiceProvider};
//! use orchard_di::container::Container;
//! use orchard_di::error::{convert_error, ErrorPtr};
//! use orchard_di::future::{BoxFuture, FutureExt};
//! use orchard_di::token::Token;
//!
//! struct DatabaseProvider;
//!
//! impl ServiceProvider for DatabaseProvider {
//!     fn register<'a>(&'a self, container: &'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>> {
//!         async move {
//!             container
//!                 .register_value(Token::named("database"), "postgres://localhost".to_string())
//!                 .map_err(convert_error)
//!         }
//!         .boxed()
//!     }
//!
//!     fn provided_services(&self) -> Vec<Token> {
//!         vec![Token::named("database")]
//!     }
//!
//!     fn as_boot(&self) -> Option<&dyn Boot> {
//!         Some(self)
//!     }
//! }
//!
//! impl Boot for DatabaseProvider {
//!     fn boot<'a>(&'a self, _container: &'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>> {
//!         async { Ok(()) }.boxed()
//!     }
//! }
//! ```

use derivative::Derivative;
use orchard_di::container::Container;
use orchard_di::error::ErrorPtr;
use orchard_di::future::{BoxFuture, FutureExt};
use orchard_di::token::Token;
use std::any::type_name;
use std::sync::Arc;

pub type ProviderPtr = Arc<dyn ServiceProvider>;

/// Unit of configuration taking part in the application lifecycle.
pub trait ServiceProvider: Send + Sync {
    /// Explicit provider name. Names must be unique within a single lifecycle run.
    fn name(&self) -> Option<String> {
        None
    }

    /// Structural name used when no explicit name is given. Defaults to the concrete type name.
    /// Return `None` if the type name does not identify the provider in a meaningful way.
    fn type_name(&self) -> Option<&'static str> {
        Some(type_name::<Self>())
    }

    /// Tokens provided by other providers, which need to be booted before this one.
    fn dependencies(&self) -> Vec<Token> {
        Vec::new()
    }

    /// Tokens this provider makes available to others.
    fn provided_services(&self) -> Vec<Token> {
        Vec::new()
    }

    /// Registers service definitions in the container.
    fn register<'a>(&'a self, container: &'a mut Container)
        -> BoxFuture<'a, Result<(), ErrorPtr>>;

    /// Returns the boot capability, if supported.
    fn as_boot(&self) -> Option<&dyn Boot> {
        None
    }

    /// Returns the shutdown capability, if supported.
    fn as_shutdown(&self) -> Option<&dyn Shutdown> {
        None
    }
}

/// Post-registration initialization of a provider. All providers are registered before any of
/// them is booted.
pub trait Boot: Send + Sync {
    fn boot<'a>(&'a self, container: &'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>>;
}

/// Cleanup of a provider.
pub trait Shutdown: Send + Sync {
    fn shutdown<'a>(&'a self, container: &'a mut Container)
        -> BoxFuture<'a, Result<(), ErrorPtr>>;
}

type RegisterFn = Box<dyn Fn(&mut Container) -> Result<(), ErrorPtr> + Send + Sync>;

type HookFn = Box<
    dyn for<'a> Fn(&'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>> + Send + Sync,
>;

/// Provider built from closures, handy for small, inline providers:
///
/// ```
/// use orchard::provider::FnProvider;
/// use orchard_di::error::convert_error;
/// use orchard_di::future::FutureExt;
/// use orchard_di::token::Token;
///
/// let provider = FnProvider::named("cache")
///     .depends_on(Token::named("config"))
///     .provides(Token::named("cache"))
///     .on_register(|container| {
///         container
///             .register_value(Token::named("cache"), 16usize)
///             .map_err(convert_error)
///     })
///     .on_boot(|_container| async { Ok(()) }.boxed());
/// ```
///
/// Closure types carry no meaningful structural name, so unnamed providers get a generated one.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct FnProvider {
    name: Option<String>,
    dependencies: Vec<Token>,
    provided_services: Vec<Token>,
    #[derivative(Debug = "ignore")]
    register: Option<RegisterFn>,
    #[derivative(Debug = "ignore")]
    boot: Option<HookFn>,
    #[derivative(Debug = "ignore")]
    shutdown: Option<HookFn>,
}

impl FnProvider {
    /// Creates an unnamed provider without any behavior.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn named<T: ToString>(name: T) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn depends_on(mut self, token: Token) -> Self {
        self.dependencies.push(token);
        self
    }

    pub fn provides(mut self, token: Token) -> Self {
        self.provided_services.push(token);
        self
    }

    pub fn on_register<F>(mut self, register: F) -> Self
    where
        F: Fn(&mut Container) -> Result<(), ErrorPtr> + Send + Sync + 'static,
    {
        self.register = Some(Box::new(register));
        self
    }

    pub fn on_boot<F>(mut self, boot: F) -> Self
    where
        F: for<'a> Fn(&'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>>
            + Send
            + Sync
            + 'static,
    {
        self.boot = Some(Box::new(boot));
        self
    }

    pub fn on_shutdown<F>(mut self, shutdown: F) -> Self
    where
        F: for<'a> Fn(&'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>>
            + Send
            + Sync
            + 'static,
    {
        self.shutdown = Some(Box::new(shutdown));
        self
    }
}

impl ServiceProvider for FnProvider {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn type_name(&self) -> Option<&'static str> {
        None
    }

    fn dependencies(&self) -> Vec<Token> {
        self.dependencies.clone()
    }

    fn provided_services(&self) -> Vec<Token> {
        self.provided_services.clone()
    }

    fn register<'a>(
        &'a self,
        container: &'a mut Container,
    ) -> BoxFuture<'a, Result<(), ErrorPtr>> {
        let result = match &self.register {
            Some(register) => register(container),
            None => Ok(()),
        };

        futures::future::ready(result).boxed()
    }

    fn as_boot(&self) -> Option<&dyn Boot> {
        self.boot.as_ref().map(|_| self as &dyn Boot)
    }

    fn as_shutdown(&self) -> Option<&dyn Shutdown> {
        self.shutdown.as_ref().map(|_| self as &dyn Shutdown)
    }
}

impl Boot for FnProvider {
    fn boot<'a>(&'a self, container: &'a mut Container) -> BoxFuture<'a, Result<(), ErrorPtr>> {
        match &self.boot {
            Some(boot) => boot(container),
            None => futures::future::ok(()).boxed(),
        }
    }
}

impl Shutdown for FnProvider {
    fn shutdown<'a>(
        &'a self,
        container: &'a mut Container,
    ) -> BoxFuture<'a, Result<(), ErrorPtr>> {
        match &self.shutdown {
            Some(shutdown) => shutdown(container),
            None => futures::future::ok(()).boxed(),
        }
    }
}

/// A provider queued in a [ServiceManager](crate::manager::ServiceManager), together with its
/// name resolved once at queue time.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ManagedProvider {
    name: String,
    #[derivative(Debug = "ignore")]
    provider: ProviderPtr,
}

impl ManagedProvider {
    pub(crate) fn new(name: String, provider: ProviderPtr) -> Self {
        Self { name, provider }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn provider(&self) -> &ProviderPtr {
        &self.provider
    }
}
