//! The application: configuration, router, middleware chain and the
//! invocation entry point.

use std::any::Any;
use std::fmt;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use lamroute_core::{
    BoxMiddleware, ConfigError, Dispatch, Error, Middleware, Response, Router, build_chain,
};
use parking_lot::Mutex;
use serde_json::Value;

use crate::config::Config;
use crate::events::{FromRaw, LambdaEvent};
use crate::globals::Globals;
use crate::routers::SingleRoute;

/// An observer notified of an unhandled error before it is re-raised.
///
/// Observers run in registration order, each unconditionally; they cannot
/// suppress the error or alter control flow.
pub type ExceptionHandler<E, R> = Box<dyn Fn(&App<E, R>, &E, &Error) + Send + Sync>;

/// The central object and entry point for one serverless function.
///
/// Built once at startup via [`AppBuilder`]; thereafter the route table and
/// middleware chain are read-only and an `App` can be shared across
/// invocation threads freely. The hosting platform drives it exclusively
/// through [`invoke`].
///
/// [`invoke`]: App::invoke
pub struct App<E, R> {
    name: String,
    config: Config,
    router: Arc<R>,
    middleware_chain: Dispatch<E>,
    exception_handlers: Vec<ExceptionHandler<E, R>>,
    globals: Globals,
    execution_contexts: Mutex<HashMap<ThreadId, Box<dyn Any + Send>>>,
}

impl App<LambdaEvent, SingleRoute<LambdaEvent>> {
    /// Starts building an application with the default single-route strategy
    /// over plain [`LambdaEvent`]s.
    pub fn builder(name: impl Into<String>) -> AppBuilder<LambdaEvent, SingleRoute<LambdaEvent>> {
        AppBuilder::new(name)
    }
}

impl<E: FromRaw, R: Router<E>> App<E, R> {
    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The routing strategy.
    pub fn router(&self) -> &R {
        &self.router
    }

    /// The per-execution-context scratch storage.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// The invocation context recorded for the current execution context, if
    /// one of type `C` has been stored by a previous [`invoke`] on this
    /// context.
    ///
    /// [`invoke`]: App::invoke
    pub fn execution_context<C: Any + Clone>(&self) -> Option<C> {
        self.execution_contexts
            .lock()
            .get(&thread::current().id())
            .and_then(|context| context.downcast_ref::<C>())
            .cloned()
    }

    /// Runs the middleware chain for an already-constructed event.
    pub fn dispatch(&self, event: &E) -> Result<Response, Error> {
        (self.middleware_chain)(event)
    }

    /// The invocation entry point.
    ///
    /// Wraps `raw` into an event, records `context` for the current execution
    /// context, and runs the middleware chain. On an error anywhere below the
    /// chain, every exception observer is notified in registration order and
    /// the original error is returned unchanged.
    ///
    /// An event construction failure propagates directly, without observer
    /// notification: no event exists to hand to the observers.
    pub fn invoke(&self, raw: Value, context: impl Any + Send) -> Result<Response, Error> {
        let event = E::from_raw(raw, &self.config)?;
        self.execution_contexts
            .lock()
            .insert(thread::current().id(), Box::new(context));

        match (self.middleware_chain)(&event) {
            Ok(response) => Ok(response),
            Err(error) => {
                // The hosting environment catches unhandled errors without
                // ever surfacing them to process-level hooks, so observers
                // are notified here, at the boundary, before re-raising.
                tracing::error!(app = %self.name, %error, "unhandled error during dispatch");
                for observer in &self.exception_handlers {
                    observer(self, &event, &error);
                }
                Err(error)
            }
        }
    }
}

/// Builder for [`App`].
///
/// Routes, middleware and exception observers are all declared here; `build`
/// folds the middleware chain around the router exactly once, after the route
/// table is final.
pub struct AppBuilder<E, R> {
    name: String,
    config: Config,
    router: R,
    middleware: Vec<BoxMiddleware<E>>,
    exception_handlers: Vec<ExceptionHandler<E, R>>,
    globals: Globals,
}

impl<E, R> fmt::Debug for AppBuilder<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl AppBuilder<LambdaEvent, SingleRoute<LambdaEvent>> {
    /// Starts a builder with the default single-route strategy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_router(name, SingleRoute::new())
    }
}

impl<E: FromRaw, R: Router<E>> AppBuilder<E, R> {
    /// Starts a builder with an explicit routing strategy.
    pub fn with_router(name: impl Into<String>, router: R) -> Self {
        Self {
            name: name.into(),
            config: Config::new(),
            router,
            middleware: Vec::new(),
            exception_handlers: Vec::new(),
            globals: Globals::new(),
        }
    }

    /// Sets the application configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Registers a route with the strategy's `add_route`.
    ///
    /// Registration errors (a duplicate single route, a missing selector)
    /// surface here, while the application is being defined.
    pub fn route(mut self, selector: Option<&str>, route: R::Route) -> Result<Self, ConfigError> {
        self.router.add_route(selector, route)?;
        Ok(self)
    }

    /// Appends a middleware layer.
    ///
    /// Layers are folded in declaration order at build time: the last layer
    /// declared becomes the outermost and runs first.
    pub fn middleware(mut self, layer: impl Middleware<E>) -> Self {
        self.middleware.push(Box::new(layer));
        self
    }

    /// Appends an exception observer.
    pub fn exception_handler(
        mut self,
        observer: impl Fn(&App<E, R>, &E, &Error) + Send + Sync + 'static,
    ) -> Self {
        self.exception_handlers.push(Box::new(observer));
        self
    }

    /// Shares an existing [`Globals`] handle with the application.
    ///
    /// Useful when handler closures need the same handle; `Globals` clones
    /// refer to common storage.
    pub fn globals(mut self, globals: Globals) -> Self {
        self.globals = globals;
        self
    }

    /// Finalizes the application, folding the middleware chain around the
    /// router's dispatch.
    pub fn build(self) -> App<E, R> {
        let router = Arc::new(self.router);
        let base: Dispatch<E> = {
            let router = Arc::clone(&router);
            Box::new(move |event| router.dispatch(event))
        };
        let middleware_chain = build_chain(base, &self.middleware);

        App {
            name: self.name,
            config: self.config,
            router,
            middleware_chain,
            exception_handlers: self.exception_handlers,
            globals: self.globals,
            execution_contexts: Mutex::new(HashMap::new()),
        }
    }
}
