//! The terminal endpoint of the dispatch pipeline.
//!
//! Handlers are where user business logic executes. A route table maps
//! selectors to boxed handlers; the router selects exactly one per dispatch
//! and invokes it with a borrowed event.

use crate::error::BoxError;

/// The value a handler produces, returned to the invoking platform as-is.
pub type Response = serde_json::Value;

/// A registered route target.
///
/// Handlers receive a borrowed event and return a [`Response`] or an opaque
/// error. Errors are never inspected by the core: they surface at the
/// invocation entry point unchanged, after exception observers have run.
///
/// # Usage Patterns
///
/// 1. **Plain closure**: `|event: &MyEvent| Ok(json!({"ok": true}))`
/// 2. **Struct implementation**: `impl Handler<MyEvent> for MyHandler`
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle events of type `{E}`",
    label = "missing `Handler<{E}>` implementation",
    note = "Handlers must implement `call` for the event type `{E}`."
)]
pub trait Handler<E>: Send + Sync + 'static {
    /// Executes the handler logic for one event.
    fn call(&self, event: &E) -> Result<Response, BoxError>;
}

// Blanket impl for closures
impl<E, F> Handler<E> for F
where
    F: Fn(&E) -> Result<Response, BoxError> + Send + Sync + 'static,
{
    fn call(&self, event: &E) -> Result<Response, BoxError> {
        (self)(event)
    }
}

impl<E> core::fmt::Debug for dyn Handler<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Handler")
    }
}

/// A boxed handler, as stored in a route table.
pub type BoxHandler<E> = Box<dyn Handler<E>>;
