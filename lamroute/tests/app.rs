use std::sync::{Arc, Mutex};

use lamroute::routers::EventField;
use lamroute::{
    App, AppBuilder, BoxError, BoxHandler, ConfigError, Dispatch, Error, Globals, HandledError,
    LambdaEvent, Response,
};
use serde_json::json;

fn success_route() -> BoxHandler<LambdaEvent> {
    Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
        Ok(json!({"result": "success"}))
    })
}

#[test]
fn test_default_single_route() {
    let app = App::builder("test_default_config")
        .route(None, success_route())
        .unwrap()
        .build();

    assert!(app.router().has_route());

    let result = app.invoke(json!({}), ()).unwrap();
    assert_eq!(result["result"], json!("success"));
}

#[test]
fn test_double_route_fails_at_definition_time() {
    let builder = App::builder("test_double_route")
        .route(None, success_route())
        .unwrap();

    let err = builder.route(None, success_route()).unwrap_err();
    assert!(matches!(err, ConfigError::RouteAlreadyDefined));
}

#[test]
fn test_middleware() {
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let layer = {
        let order = Arc::clone(&order);
        move |next: Dispatch<LambdaEvent>| -> Dispatch<LambdaEvent> {
            let order = Arc::clone(&order);
            Box::new(move |event: &LambdaEvent| {
                order.lock().unwrap().push("pre");
                let response = next(event);
                order.lock().unwrap().push("post");
                response
            })
        }
    };

    let route = {
        let order = Arc::clone(&order);
        Box::new(move |_event: &LambdaEvent| -> Result<Response, BoxError> {
            order.lock().unwrap().push("request");
            Ok(json!({"result": "success"}))
        })
    };

    let app = App::builder("test_middleware")
        .middleware(layer)
        .route(None, route)
        .unwrap()
        .build();

    let response = app.invoke(json!({}), ()).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["pre", "request", "post"]);
    assert_eq!(response, json!({"result": "success"}));
}

#[test]
fn test_middleware_declaration_order() {
    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let recording = |tag: &'static str| {
        let order = Arc::clone(&order);
        move |next: Dispatch<LambdaEvent>| -> Dispatch<LambdaEvent> {
            let order = Arc::clone(&order);
            Box::new(move |event: &LambdaEvent| {
                order.lock().unwrap().push(format!("{tag}-pre"));
                let response = next(event);
                order.lock().unwrap().push(format!("{tag}-post"));
                response
            })
        }
    };

    let route = {
        let order = Arc::clone(&order);
        Box::new(move |_event: &LambdaEvent| -> Result<Response, BoxError> {
            order.lock().unwrap().push("request".to_string());
            Ok(json!({}))
        })
    };

    let app = App::builder("test_middleware_order")
        .middleware(recording("a"))
        .middleware(recording("b"))
        .route(None, route)
        .unwrap()
        .build();

    app.invoke(json!({}), ()).unwrap();
    // The layer declared last is outermost.
    assert_eq!(
        *order.lock().unwrap(),
        vec!["b-pre", "a-pre", "request", "a-post", "b-post"]
    );
}

#[test]
fn test_exception_handlers_run_in_order_and_error_propagates() {
    let notified: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let observer = |tag: &'static str, notified: &Arc<Mutex<Vec<String>>>| {
        let notified = Arc::clone(notified);
        move |_app: &App<LambdaEvent, _>, _event: &LambdaEvent, error: &Error| {
            notified.lock().unwrap().push(format!("{tag}:{error}"));
        }
    };

    let app = App::builder("test_register_exception_handler")
        .exception_handler(observer("first", &notified))
        .exception_handler(observer("second", &notified))
        .route(
            None,
            Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
                Err("things went wrong".into())
            }),
        )
        .unwrap()
        .build();

    let err = app.invoke(json!({}), ()).unwrap_err();
    assert!(matches!(err, Error::Handler(_)));
    assert_eq!(err.to_string(), "things went wrong");
    // Both observers ran, in registration order, with the same error.
    assert_eq!(
        *notified.lock().unwrap(),
        vec!["first:things went wrong", "second:things went wrong"]
    );
}

#[test]
fn test_handled_error_is_distinguishable() {
    let app = App::builder("test_handled")
        .route(
            None,
            Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
                Err(Box::new(HandledError::new("expected failure")))
            }),
        )
        .unwrap()
        .build();

    let err = app.invoke(json!({}), ()).unwrap_err();
    assert!(err.is_handled());

    let app = App::builder("test_unhandled")
        .route(
            None,
            Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
                Err("surprise".into())
            }),
        )
        .unwrap()
        .build();

    let err = app.invoke(json!({}), ()).unwrap_err();
    assert!(!err.is_handled());
}

#[test]
fn test_event_field_app() {
    let app = AppBuilder::with_router("test_event_field", EventField::new("field"))
        .route(
            Some("one"),
            Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
                Ok(json!({"route": "one"}))
            }),
        )
        .unwrap()
        .route(
            Some("two"),
            Box::new(|_event: &LambdaEvent| -> Result<Response, BoxError> {
                Ok(json!({"route": "two"}))
            }),
        )
        .unwrap()
        .build();

    assert_eq!(app.invoke(json!({"field": "one"}), ()).unwrap(), json!({"route": "one"}));
    assert_eq!(app.invoke(json!({"field": "two"}), ()).unwrap(), json!({"route": "two"}));
}

#[test]
fn test_globals_persist_across_sequential_invocations() {
    let globals = Globals::new();

    let route = {
        let globals = globals.clone();
        Box::new(move |_event: &LambdaEvent| -> Result<Response, BoxError> {
            let count = globals.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            globals.insert("count", count + 1);
            Ok(json!(count + 1))
        })
    };

    let app = App::builder("test_globals")
        .globals(globals.clone())
        .route(None, route)
        .unwrap()
        .build();

    // Warm start: the second invocation on the same execution context sees
    // what the first one left behind.
    assert_eq!(app.invoke(json!({}), ()).unwrap(), json!(1));
    assert_eq!(app.invoke(json!({}), ()).unwrap(), json!(2));
    assert_eq!(app.globals().get("count"), Some(json!(2)));
}

#[test]
fn test_globals_do_not_leak_across_execution_contexts() {
    let globals = Globals::new();

    let route = {
        let globals = globals.clone();
        Box::new(move |_event: &LambdaEvent| -> Result<Response, BoxError> {
            let count = globals.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            globals.insert("count", count + 1);
            Ok(json!(count + 1))
        })
    };

    let app = Arc::new(
        App::builder("test_globals_isolation")
            .globals(globals)
            .route(None, route)
            .unwrap()
            .build(),
    );

    assert_eq!(app.invoke(json!({}), ()).unwrap(), json!(1));

    // A different execution context starts from an empty scope.
    let elsewhere = Arc::clone(&app);
    let seen = std::thread::spawn(move || elsewhere.invoke(json!({}), ()).unwrap())
        .join()
        .unwrap();
    assert_eq!(seen, json!(1));
}

#[test]
fn test_execution_context_is_recorded() {
    let app = App::builder("test_execution_context")
        .route(None, success_route())
        .unwrap()
        .build();

    app.invoke(json!({}), 42i32).unwrap();
    assert_eq!(app.execution_context::<i32>(), Some(42));
    // Asking for the wrong type yields nothing.
    assert_eq!(app.execution_context::<String>(), None);
}

#[test]
fn test_event_construction_failure_skips_observers() {
    use lamroute::appsync::{AppSyncEvent, AppSyncField};

    let notified = Arc::new(Mutex::new(0u32));
    let observer = {
        let notified = Arc::clone(&notified);
        move |_app: &App<AppSyncEvent, AppSyncField>, _event: &AppSyncEvent, _error: &Error| {
            *notified.lock().unwrap() += 1;
        }
    };

    // No template configured: event construction fails before dispatch.
    let app = AppBuilder::with_router("test_create_failure", AppSyncField::new())
        .exception_handler(observer)
        .build();

    let err = app.invoke(json!({}), ()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::MissingTemplate)));
    assert_eq!(*notified.lock().unwrap(), 0);
}
