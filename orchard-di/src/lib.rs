//! A dependency injection container based on explicit wiring.
//!
//! Services are identified by [Token](token::Token)s and described by
//! [ServiceDefinition](registry::ServiceDefinition)s: a [scope](scope::Scope), an ordered list of
//! dependency tokens and a way to construct the instance - a fixed value, a (possibly async)
//! factory or a [Component](component::Component). The [Container](container::Container) resolves
//! a token by first resolving its dependencies in declared order, then calling the constructor with
//! the resolved instances as positional arguments.
//!
//! ```
//! use orchard_di::container::Container;
//! use orchard_di::instance_provider::TypedInstanceProvider;
//! use orchard_di::scope::Scope;
//! use orchard_di::token::Token;
//!
//! let mut container = Container::default();
//! container.register_value(Token::named("greeting"), "Hello").unwrap();
//! container
//!     .register_factory(
//!         Token::named("message"),
//!         vec![Token::named("greeting")],
//!         Scope::Transient,
//!         |dependencies| {
//!             let greeting = dependencies.get_typed::<&'static str>(0)?;
//!             Ok(format!("{greeting}, world!"))
//!         },
//!     )
//!     .unwrap();
//!
//! let message = container
//!     .resolve_typed::<String>(&Token::named("message"))
//!     .unwrap();
//! assert_eq!(*message, "Hello, world!");
//! ```
//!
//! Dependencies are always declared explicitly - there is no automatic discovery based on types.
//! Circular dependencies are reported as
//! [ResolveError::CircularDependency](error::ResolveError::CircularDependency) with the full path.

pub mod component;
pub mod container;
pub mod dependencies;
pub mod error;
pub mod future;
pub mod instance_provider;
pub mod registry;
pub mod scope;
pub mod token;
