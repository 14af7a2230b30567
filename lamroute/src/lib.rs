//! # lamroute
//!
//! Routing and dispatch for serverless function invocations.
//!
//! Given a raw event payload, an [`App`] selects and invokes exactly one
//! registered handler, optionally passing the invocation through a chain of
//! middleware, and funnels unhandled errors to registered exception observers
//! before re-raising them.
//!
//! Everything runs synchronously on a single call stack per invocation: the
//! hosting platform enforces timeouts externally and invocations against one
//! execution context are strictly sequential.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lamroute::{AppBuilder, LambdaEvent, routers::EventField};
//! use serde_json::json;
//!
//! let app = AppBuilder::with_router("orders", EventField::new("kind"))
//!     .route(Some("created"), Box::new(|_event: &LambdaEvent| Ok(json!({"ok": true}))))?
//!     .build();
//!
//! let response = app.invoke(json!({"kind": "created"}), ())?;
//! ```
//!
//! This crate provides:
//! - **Routing strategies**: [`routers::SingleRoute`], [`routers::EventField`],
//!   [`routers::SqsMessageField`], [`appsync::AppSyncField`]
//! - **Event envelopes**: [`LambdaEvent`], [`appsync::AppSyncEvent`]
//! - **Application wiring**: [`App`], [`AppBuilder`], [`Globals`]
//! - **Configuration**: [`Config`], [`Template`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod app;
pub mod appsync;
pub mod config;
pub mod events;
pub mod globals;
pub mod middleware;
pub mod routers;

pub use lamroute_core::{
    // Errors
    BoxError,
    // Handlers
    BoxHandler,
    // Middleware
    BoxMiddleware,
    ConfigError,
    Dispatch,
    Error,
    // Events
    Event,
    HandledError,
    Handler,
    Middleware,
    Response,
    // Routing
    Router,
    RoutingError,
    build_chain,
};

pub use app::{App, AppBuilder, ExceptionHandler};
pub use config::{Config, Template, str_to_bool};
pub use events::{FromRaw, LambdaEvent};
pub use globals::Globals;

/// Prelude module - common imports for lamroute.
///
/// # Usage
///
/// ```rust,ignore
/// use lamroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{App, AppBuilder};
    pub use crate::appsync::{AppSyncEvent, AppSyncField};
    pub use crate::config::Config;
    pub use crate::events::{FromRaw, LambdaEvent};
    pub use crate::globals::Globals;
    pub use crate::routers::{EventField, SingleRoute, SqsMessage, SqsMessageField};
    pub use lamroute_core::{
        BoxError, BoxHandler, Error, Event, HandledError, Handler, Middleware, Response, Router,
    };
}
