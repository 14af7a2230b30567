//! The event-field strategy.

use std::collections::HashMap;

use lamroute_core::{BoxHandler, ConfigError, Error, Event, Handler, Response, Router, RoutingError};

/// Routes on the value of a named top-level field in the raw payload.
///
/// Registration under an already-used value silently replaces the earlier
/// handler: last write wins.
pub struct EventField<E> {
    key: String,
    routes: HashMap<String, BoxHandler<E>>,
}

impl<E> EventField<E> {
    /// Creates a router that reads the top-level field `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            routes: HashMap::new(),
        }
    }

    /// The field this router reads.
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

impl<E: Event> EventField<E> {
    /// Returns the route matching the field value in `event`.
    ///
    /// An absent field and an unregistered value fail with distinct errors.
    pub fn get_route(&self, event: &E) -> Result<&dyn Handler<E>, RoutingError> {
        let value = event
            .raw()
            .get(&self.key)
            .ok_or_else(|| RoutingError::KeyNotPresent(self.key.clone()))?;
        let value = value
            .as_str()
            .ok_or_else(|| RoutingError::NoRouteForValue(value.to_string()))?;
        self.routes
            .get(value)
            .map(|route| route.as_ref())
            .ok_or_else(|| RoutingError::NoRouteForValue(value.to_string()))
    }
}

impl<E: Event> Router<E> for EventField<E> {
    type Route = BoxHandler<E>;

    fn add_route(&mut self, selector: Option<&str>, route: Self::Route) -> Result<(), ConfigError> {
        let selector = selector.ok_or(ConfigError::SelectorRequired)?;
        self.routes.insert(selector.to_string(), route);
        Ok(())
    }

    fn dispatch(&self, event: &E) -> Result<Response, Error> {
        let route = self.get_route(event)?;
        route.call(event).map_err(Error::Handler)
    }
}
