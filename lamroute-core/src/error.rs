//! Error types for lamroute.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`Error`] - Top-level error type for all lamroute operations
//! - [`ConfigError`] - Errors raised at setup/registration time
//! - [`RoutingError`] - Errors raised while resolving a route at dispatch time
//!
//! Handler errors are carried opaquely as [`BoxError`] values inside
//! [`Error::Handler`]; the core never inspects or rewraps them.

use thiserror::Error;

/// A boxed error type for opaque handler errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all lamroute operations.
///
/// The invocation entry point either returns a response or propagates one of
/// these; nothing is swallowed internally and handler errors are never wrapped
/// in anything beyond the [`Error::Handler`] variant.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or incomplete setup, detected before any dispatch.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A route lookup failed during dispatch.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    /// An error raised by user handler code. Propagated unchanged.
    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// Wraps a user handler error.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Error::Handler(err.into())
    }

    /// Whether this error is an anticipated failure signalled via
    /// [`HandledError`].
    ///
    /// Exception observers run for every error kind regardless; this exists so
    /// an observer can skip side effects that assume an unexpected failure
    /// (alerting, error capture) when the handler already dealt with it.
    pub fn is_handled(&self) -> bool {
        matches!(self, Error::Handler(err) if err.is::<HandledError>())
    }
}

/// Errors raised at registration or construction time.
///
/// These are never deferred to first dispatch: a duplicate single-route
/// registration or a malformed event template fails while the application is
/// being defined.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A single-route strategy already has its one route.
    #[error("single route is already defined; this strategy can only have one route")]
    RouteAlreadyDefined,

    /// The strategy requires a selector key and none was given.
    #[error("this routing strategy requires a selector key")]
    SelectorRequired,

    /// The strategy takes no selector key and one was given.
    #[error("this routing strategy does not accept a selector key")]
    UnexpectedSelector,

    /// A required configuration key was absent.
    #[error("missing required configuration key: {0}")]
    MissingKey(String),

    /// A configuration value failed conversion.
    #[error("invalid value for configuration key {key}: {reason}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An event template did not name the location of the context field.
    #[error("event template must specify at least the location of the context field")]
    MissingTemplate,

    /// A field could not be loaded from the event context.
    #[error("could not load {0} from the event context")]
    InvalidContext(String),
}

/// Errors raised while resolving a route at dispatch time.
///
/// These always propagate past the router; they are catchable only by
/// middleware or by application-level exception observers.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// A single-route strategy has no route registered yet.
    #[error("no route defined")]
    NoRouteDefined,

    /// The routing field is absent from the routed object.
    #[error("routing key ({0}) is not present in the event")]
    KeyNotPresent(String),

    /// The routing field is present but no handler is registered for its
    /// value.
    #[error("no route configured for given value ({0})")]
    NoRouteForValue(String),

    /// A batch event carried no record collection.
    #[error("no records present in the event")]
    NoRecords,

    /// A batch record did not have the expected shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A batch record body was not valid JSON.
    #[error("record body is not valid JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

/// Marker error for failures a handler anticipated and already dealt with.
///
/// Handlers box one of these (instead of a domain error) to signal that the
/// invocation failed in an expected way. Observers can detect it through
/// [`Error::is_handled`]; the error still propagates to the invoker like any
/// other.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct HandledError(pub String);

impl HandledError {
    /// Creates a handled error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
