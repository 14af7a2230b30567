//! The single-route strategy.

use lamroute_core::{BoxHandler, ConfigError, Error, Event, Handler, Response, Router, RoutingError};

/// Routes every event to a single defined route, unconditionally.
///
/// At most one route may ever be registered; a second registration fails at
/// definition time.
pub struct SingleRoute<E> {
    route: Option<BoxHandler<E>>,
}

impl<E> SingleRoute<E> {
    /// Creates a router with no route defined.
    pub fn new() -> Self {
        Self { route: None }
    }

    /// Whether the route has been defined yet.
    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }

    /// Returns the defined route.
    pub fn get_route(&self) -> Result<&dyn Handler<E>, RoutingError> {
        self.route
            .as_deref()
            .ok_or(RoutingError::NoRouteDefined)
    }
}

impl<E> Default for SingleRoute<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> Router<E> for SingleRoute<E> {
    type Route = BoxHandler<E>;

    fn add_route(&mut self, selector: Option<&str>, route: Self::Route) -> Result<(), ConfigError> {
        if selector.is_some() {
            return Err(ConfigError::UnexpectedSelector);
        }
        if self.route.is_some() {
            return Err(ConfigError::RouteAlreadyDefined);
        }
        self.route = Some(route);
        Ok(())
    }

    fn dispatch(&self, event: &E) -> Result<Response, Error> {
        let route = self.get_route()?;
        route.call(event).map_err(Error::Handler)
    }
}
