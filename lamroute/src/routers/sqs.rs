//! The SQS batch strategy.
//!
//! An SQS-triggered invocation carries a batch of records under `Records`.
//! Each record is decoded into an [`SqsMessage`] and routed independently by a
//! discriminator read from its message attributes. Batch dispatch is
//! fire-and-forget: the platform does not consume a response, and one record's
//! handler error aborts the remaining records.

use std::collections::HashMap;

use lamroute_core::{BoxError, ConfigError, Error, Event, Response, Router, RoutingError};
use serde_json::{Map, Value};

/// A single decoded record from a batch envelope.
///
/// Constructed fresh per record, per dispatch; not retained.
#[derive(Debug)]
pub struct SqsMessage<'a, E> {
    meta: Map<String, Value>,
    body: Value,
    key: Option<String>,
    event: &'a E,
}

impl<'a, E: Event> SqsMessage<'a, E> {
    /// Decodes one raw record.
    ///
    /// Flattens the record's `attributes` plus its remaining top-level fields
    /// into `meta`, JSON-decodes the `body` string, and reads the routing
    /// discriminator from `messageAttributes[key_name].stringValue`.
    pub fn from_record(
        record: &Value,
        key_name: &str,
        event: &'a E,
    ) -> Result<Self, RoutingError> {
        let record = record
            .as_object()
            .ok_or_else(|| RoutingError::MalformedRecord("record is not an object".into()))?;

        let mut meta = Map::new();
        if let Some(attributes) = record.get("attributes").and_then(Value::as_object) {
            for (name, value) in attributes {
                meta.insert(name.clone(), value.clone());
            }
        }
        let key = record
            .get("messageAttributes")
            .and_then(|attributes| attributes.get(key_name))
            .and_then(|attribute| attribute.get("stringValue"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        for (name, value) in record {
            if matches!(name.as_str(), "attributes" | "body" | "messageAttributes") {
                continue;
            }
            meta.insert(name.clone(), value.clone());
        }

        let body = record.get("body").and_then(Value::as_str).unwrap_or("");
        let body = serde_json::from_str(body).map_err(RoutingError::InvalidBody)?;

        Ok(Self {
            meta,
            body,
            key,
            event,
        })
    }

    /// Flattened record metadata: the SQS `attributes` plus every top-level
    /// record field other than the body and message attributes.
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// The JSON-decoded record body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The routing discriminator, when the designated message attribute was
    /// present.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The event this record belongs to.
    pub fn event(&self) -> &E {
        self.event
    }
}

/// A route target for batch records.
///
/// Record handlers perform side effects only; the batch dispatch discards any
/// response.
pub trait MessageHandler<E>: Send + Sync + 'static {
    /// Processes one decoded record.
    fn call(&self, message: &SqsMessage<'_, E>) -> Result<(), BoxError>;
}

// Blanket impl for closures
impl<E, F> MessageHandler<E> for F
where
    F: Fn(&SqsMessage<'_, E>) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn call(&self, message: &SqsMessage<'_, E>) -> Result<(), BoxError> {
        (self)(message)
    }
}

/// A boxed record handler.
pub type BoxMessageHandler<E> = Box<dyn MessageHandler<E>>;

/// Routes each record of a batch envelope on a message-attribute value.
pub struct SqsMessageField<E> {
    key: String,
    routes: HashMap<String, BoxMessageHandler<E>>,
}

impl<E> SqsMessageField<E> {
    /// Creates a router that reads the message attribute `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            routes: HashMap::new(),
        }
    }

    /// The message attribute this router reads.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether a route is registered for `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.routes.contains_key(value)
    }
}

impl<E: Event> SqsMessageField<E> {
    /// Returns the route matching the record's discriminator.
    ///
    /// A record without the designated attribute and a discriminator with no
    /// registered handler fail with distinct errors.
    pub fn get_route(
        &self,
        message: &SqsMessage<'_, E>,
    ) -> Result<&dyn MessageHandler<E>, RoutingError> {
        let value = message
            .key()
            .ok_or_else(|| RoutingError::KeyNotPresent(self.key.clone()))?;
        self.routes
            .get(value)
            .map(|route| route.as_ref())
            .ok_or_else(|| RoutingError::NoRouteForValue(value.to_string()))
    }
}

impl<E: Event> Router<E> for SqsMessageField<E> {
    type Route = BoxMessageHandler<E>;

    fn add_route(&mut self, selector: Option<&str>, route: Self::Route) -> Result<(), ConfigError> {
        let selector = selector.ok_or(ConfigError::SelectorRequired)?;
        self.routes.insert(selector.to_string(), route);
        Ok(())
    }

    /// Dispatches every record in arrival order.
    ///
    /// A lookup or handler failure on one record propagates immediately and
    /// aborts the remaining records; there is no per-record error
    /// accumulation. The caller receives `Null` on success since the platform
    /// ignores batch responses.
    fn dispatch(&self, event: &E) -> Result<Response, Error> {
        let records = event
            .raw()
            .get("Records")
            .and_then(Value::as_array)
            .ok_or(RoutingError::NoRecords)?;

        for record in records {
            let message = SqsMessage::from_record(record, &self.key, event)?;
            let route = self.get_route(&message)?;
            route.call(&message).map_err(Error::Handler)?;
        }
        Ok(Value::Null)
    }
}
