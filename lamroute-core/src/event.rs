//! Event trait for invocation payloads.

use serde_json::Value;

/// An invocation's normalized view over the raw triggering payload.
///
/// The raw payload is an opaque JSON document owned by the calling platform.
/// An event wraps it once at creation time; neither the router nor the
/// application ever mutates it, and any provider-specific derived fields
/// (identity, arguments) are extracted exactly once during construction.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Event",
    label = "missing `Event` implementation",
    note = "Events must expose their raw payload and be `Send + Sync + 'static`."
)]
pub trait Event: Send + Sync + 'static {
    /// The raw payload this event wraps, exactly as the platform delivered it.
    fn raw(&self) -> &Value;
}
