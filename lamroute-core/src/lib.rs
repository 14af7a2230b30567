//! # lamroute-core
//!
//! Core traits and error types for the lamroute invocation router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! middleware and event-source extensions that don't need the full `lamroute`
//! implementation.
//!
//! # Dispatch Model
//!
//! A single invocation flows through three layers:
//!
//! ## Layer 1: Router ([`Router`])
//!
//! Holds the route table and selects exactly one handler for an event. Each
//! routing strategy (single route, event field, message batch) is a
//! self-contained type satisfying the same `{add_route, dispatch}` contract;
//! there is no shared base implementation.
//!
//! ## Layer 2: Middleware ([`Middleware`])
//!
//! A middleware layer wraps a [`Dispatch`] callable in another [`Dispatch`]
//! callable, adding cross-cutting pre/post behavior. The chain is folded once,
//! in declaration order, by [`build_chain`]: the last-declared layer becomes
//! the outermost and runs first.
//!
//! ## Layer 3: Handler ([`Handler`])
//!
//! The terminal endpoint where user business logic executes. Handlers receive
//! a borrowed event and return a JSON [`Response`] or an opaque error that
//! propagates to the invoker unchanged.
//!
//! # Error Types
//!
//! - [`Error`] - Top-level error type
//! - [`ConfigError`] - Setup and registration errors
//! - [`RoutingError`] - Route lookup and record decoding errors
//! - [`HandledError`] - Marker for anticipated handler failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod handler;
mod middleware;
mod router;

// Re-exports
pub use error::{BoxError, ConfigError, Error, HandledError, RoutingError};
pub use event::Event;
pub use handler::{BoxHandler, Handler, Response};
pub use middleware::{BoxMiddleware, Dispatch, Middleware, build_chain};
pub use router::Router;
