//! Re-exports of future helpers used by asynchronous constructors and lifecycle hooks.

pub use futures::future::{BoxFuture, FutureExt};
