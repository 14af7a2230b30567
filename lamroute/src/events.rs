//! Event construction.
//!
//! [`FromRaw`] is the construction side of the [`Event`] contract: a factory
//! from the platform's raw JSON payload, polymorphic per event-source
//! provider. Envelope-parsing constructors (see [`appsync`]) consult the
//! configuration for their extraction template; [`LambdaEvent`] is the plain
//! direct-invocation event that wraps the payload untouched.
//!
//! [`appsync`]: crate::appsync

use lamroute_core::{Error, Event};
use serde_json::Value;

use crate::config::Config;

/// Constructs an event from a raw invocation payload.
///
/// Called by the application exactly once per invocation, immediately before
/// dispatch. A construction failure propagates to the invoker without passing
/// through exception observers.
pub trait FromRaw: Event + Sized {
    /// Builds the event, extracting any provider-specific derived fields.
    fn from_raw(raw: Value, config: &Config) -> Result<Self, Error>;
}

/// A direct-invocation event: the raw payload with no envelope to parse.
#[derive(Debug, Clone)]
pub struct LambdaEvent {
    raw: Value,
}

impl LambdaEvent {
    /// Wraps a raw payload.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }
}

impl Event for LambdaEvent {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromRaw for LambdaEvent {
    fn from_raw(raw: Value, _config: &Config) -> Result<Self, Error> {
        Ok(Self::new(raw))
    }
}
