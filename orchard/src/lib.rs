//! Application lifecycle based on [orchard_di] dependency injection.
//!
//! Applications are assembled from [ServiceProviders](provider::ServiceProvider) - independent
//! units of configuration, which register services in a shared
//! [Container](orchard_di::container::Container), declare which services they provide and which
//! services provided by others they depend on. The [Application](application::Application) drives
//! all providers through three phases:
//!
//! * registration - every provider registers its services, in the order providers were added
//! * boot - providers are initialized after the providers they depend on
//! * shutdown - providers are cleaned up in reverse boot order; a failing provider does not
//! prevent others from shutting down
//!
//! ```
//! use orchard::application::Application;
//! use orchard::provider::FnProvider;
//! use orchard_di::error::convert_error;
//! use orchard_di::future::FutureExt;
//! use orchard_di::token::Token;
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let mut application = Application::default();
//! application
//!     .register(Arc::new(
//!         FnProvider::named("server")
//!             .depends_on(Token::named("database"))
//!             .on_boot(|_container| async { Ok(()) }.boxed()),
//!     ))
//!     .register(Arc::new(
//!         FnProvider::named("database")
//!             .provides(Token::named("database"))
//!             .on_register(|container| {
//!                 container
//!                     .register_value(Token::named("database"), "postgres://localhost")
//!                     .map_err(convert_error)
//!             }),
//!     ));
//!
//! application.run().await.unwrap();
//! assert!(application.is_running());
//!
//! application.shutdown().await.unwrap();
//! assert!(!application.is_running());
//! # });
//! ```

pub mod application;
pub mod boot_order;
pub mod config;
pub mod error;
pub mod manager;
pub mod naming;
pub mod provider;

pub use orchard_di::future;
