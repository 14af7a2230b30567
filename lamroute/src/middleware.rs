//! Built-in middleware layers.

use lamroute_core::{Dispatch, Middleware};

/// A layer that logs each dispatch for debugging/observation.
pub struct Logging;

impl<E: Send + Sync + 'static> Middleware<E> for Logging {
    fn wrap(&self, next: Dispatch<E>) -> Dispatch<E> {
        Box::new(move |event| {
            tracing::debug!("dispatching event");
            let result = next(event);
            match &result {
                Ok(_) => tracing::debug!("dispatch completed"),
                Err(error) => tracing::debug!(%error, "dispatch failed"),
            }
            result
        })
    }
}
