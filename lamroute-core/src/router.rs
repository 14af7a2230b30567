//! The routing contract.
//!
//! A router holds the route table and selects exactly one handler for an
//! event. Every strategy satisfies the same capability set; strategies with a
//! strategy-specific lookup (`get_route`) expose it as an inherent method
//! since the lookup argument differs per strategy (an event, or a per-record
//! view of one).

use crate::error::{ConfigError, Error};
use crate::event::Event;
use crate::handler::Response;

/// The dispatch engine interface, implemented by every routing strategy.
///
/// The route table is populated through [`add_route`] before any invocation
/// and is never mutated during dispatch; a built router is safe to share
/// read-only across invocation threads.
///
/// [`add_route`]: Router::add_route
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot route events of type `{E}`",
    label = "missing `Router` implementation",
    note = "Implement `Router<{E}>` to handle event routing."
)]
pub trait Router<E: Event>: Send + Sync + 'static {
    /// The route target this strategy stores: a whole-event handler, or a
    /// per-record handler for batch strategies.
    type Route;

    /// Registers `route` under `selector`.
    ///
    /// Single-route strategies reject any selector and a second registration;
    /// keyed strategies require a selector and silently overwrite an earlier
    /// registration under the same key. Registration errors surface here, at
    /// definition time, never at first dispatch.
    fn add_route(&mut self, selector: Option<&str>, route: Self::Route) -> Result<(), ConfigError>;

    /// Resolves the route for `event` and invokes it.
    ///
    /// Lookup failures and handler errors both propagate; the router never
    /// catches anything itself.
    fn dispatch(&self, event: &E) -> Result<Response, Error>;
}
