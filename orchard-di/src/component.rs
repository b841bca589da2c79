//! Services can be registered as plain values, factory closures or [Component]s. Components are
//! types which know how to construct themselves from their resolved dependencies, similar to a
//! constructor taking positional arguments:
//!
//! ```
//! use orchard_di::component::Component;
//! use orchard_di::container::Container;
//! use orchard_di::dependencies::Dependencies;
//! use orchard_di::error::ResolveError;
//! use orchard_di::instance_provider::{ServicePtr, TypedInstanceProvider};
//! use orchard_di::scope::Scope;
//! use orchard_di::token::Token;
//!
//! struct Config {
//!     url: String,
//! }
//!
//! struct Database {
//!     config: ServicePtr<Config>,
//! }
//!
//! impl Component for Database {
//!     fn create(dependencies: Dependencies) -> Result<Self, ResolveError> {
//!         Ok(Self {
//!             config: dependencies.get_typed(0)?,
//!         })
//!     }
//! }
//!
//! let mut container = Container::default();
//! container
//!     .register_value(Token::named("config"), Config { url: "memory".to_string() })
//!     .unwrap();
//! container
//!     .register_component::<Database>(
//!         Token::of::<Database>(),
//!         vec![Token::named("config")],
//!         Scope::Singleton,
//!     )
//!     .unwrap();
//!
//! let database = container
//!     .resolve_typed::<Database>(&Token::of::<Database>())
//!     .unwrap();
//! assert_eq!(database.config.url, "memory");
//! ```

use crate::dependencies::Dependencies;
use crate::error::ResolveError;

/// Base trait for self-constructing services.
pub trait Component: Sized + Send + Sync + 'static {
    /// Creates an instance of this component from dependencies resolved in declaration order.
    fn create(dependencies: Dependencies) -> Result<Self, ResolveError>;
}
