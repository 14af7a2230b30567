//! Middleware composition.
//!
//! A middleware layer is a function that wraps a "next" dispatch callable and
//! returns a new dispatch callable. The chain is built once by folding the
//! configured layers around the router's base dispatch; the resulting composed
//! callable is stored as ordinary state and shared read-only afterwards.

use crate::error::Error;
use crate::handler::Response;

/// A composed dispatch callable: takes an event, returns the final response.
pub type Dispatch<E> = Box<dyn Fn(&E) -> Result<Response, Error> + Send + Sync>;

/// A cross-cutting layer wrapped around a [`Dispatch`] callable.
///
/// Each layer decides whether and when to invoke its wrapped `next` callable,
/// may run logic before and after that call, may transform the result, and may
/// suppress or re-raise errors from inner layers. The routing strategies
/// themselves never catch errors, so by default everything surfaces to the
/// outermost caller.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a middleware for events of type `{E}`",
    label = "missing `Middleware<{E}>` implementation",
    note = "Implement `wrap`, or use a closure `Fn(Dispatch<{E}>) -> Dispatch<{E}>`."
)]
pub trait Middleware<E>: Send + Sync + 'static {
    /// Wraps `next` in a new dispatch callable.
    ///
    /// Takes `&self` so a chain can be rebuilt from the same layers: two folds
    /// over identical inputs produce functionally identical chains.
    fn wrap(&self, next: Dispatch<E>) -> Dispatch<E>;
}

// Blanket impl for factory closures
impl<E, F> Middleware<E> for F
where
    F: Fn(Dispatch<E>) -> Dispatch<E> + Send + Sync + 'static,
{
    fn wrap(&self, next: Dispatch<E>) -> Dispatch<E> {
        (self)(next)
    }
}

/// A boxed middleware layer.
pub type BoxMiddleware<E> = Box<dyn Middleware<E>>;

/// Folds `layers` around `base` into a single dispatch callable.
///
/// Layers are applied in declaration order: each wraps the chain built so far,
/// so the last layer in the list becomes the outermost and runs first. With
/// layers `[a, b]`, dispatch order is `b-pre, a-pre, base, a-post, b-post`.
pub fn build_chain<E: 'static>(base: Dispatch<E>, layers: &[BoxMiddleware<E>]) -> Dispatch<E> {
    let mut dispatch = base;
    for layer in layers {
        dispatch = layer.wrap(dispatch);
    }
    dispatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_layer(
        log: Arc<Mutex<Vec<String>>>,
        pre: &'static str,
        post: &'static str,
    ) -> BoxMiddleware<()> {
        Box::new(move |next: Dispatch<()>| -> Dispatch<()> {
            let log = Arc::clone(&log);
            Box::new(move |event: &()| {
                log.lock().unwrap().push(pre.to_string());
                let result = next(event);
                log.lock().unwrap().push(post.to_string());
                result
            })
        })
    }

    fn base(log: Arc<Mutex<Vec<String>>>) -> Dispatch<()> {
        Box::new(move |_event: &()| {
            log.lock().unwrap().push("request".to_string());
            Ok(Response::Null)
        })
    }

    #[test]
    fn test_single_layer_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layers = vec![recording_layer(Arc::clone(&log), "pre", "post")];
        let chain = build_chain(base(Arc::clone(&log)), &layers);

        chain(&()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["pre", "request", "post"]);
    }

    #[test]
    fn test_last_declared_layer_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layers = vec![
            recording_layer(Arc::clone(&log), "a-pre", "a-post"),
            recording_layer(Arc::clone(&log), "b-pre", "b-post"),
        ];
        let chain = build_chain(base(Arc::clone(&log)), &layers);

        chain(&()).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["b-pre", "a-pre", "request", "a-post", "b-post"]
        );
    }

    #[test]
    fn test_rebuild_produces_identical_behavior() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layers = vec![
            recording_layer(Arc::clone(&log), "a-pre", "a-post"),
            recording_layer(Arc::clone(&log), "b-pre", "b-post"),
        ];

        let first = build_chain(base(Arc::clone(&log)), &layers);
        first(&()).unwrap();
        let first_order = std::mem::take(&mut *log.lock().unwrap());

        let second = build_chain(base(Arc::clone(&log)), &layers);
        second(&()).unwrap();
        assert_eq!(first_order, *log.lock().unwrap());
    }
}
