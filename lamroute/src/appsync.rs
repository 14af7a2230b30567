//! AWS AppSync event envelope and routing.
//!
//! AppSync delivers a GraphQL resolver context inside a deployment-specific
//! spot in the payload. The event constructor locates that context through a
//! template configured under [`APPSYNC_EVENT_TEMPLATE`] (a dotted path into
//! the raw payload), then extracts the resolver arguments, caller identity,
//! field info and request headers. [`AppSyncField`] routes on the resolved
//! GraphQL field name.

use std::collections::HashMap;

use lamroute_core::{
    BoxHandler, ConfigError, Error, Event, Handler, Response, Router, RoutingError,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::events::FromRaw;

/// Configuration key holding the envelope template.
///
/// The template is a JSON object naming at least the context location, e.g.
/// `{"context": "detail.ctx"}`.
pub const APPSYNC_EVENT_TEMPLATE: &str = "APPSYNC_EVENT_TEMPLATE";

/// How the caller was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationType {
    /// Cognito user pool token.
    Cognito,
    /// IAM credentials.
    Iam,
}

impl AuthorizationType {
    /// The AppSync wire name for this authorization type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationType::Cognito => "AMAZON_COGNITO_USER_POOLS",
            AuthorizationType::Iam => "AWS_IAM",
        }
    }
}

/// A Cognito user-pool identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitoIdentity {
    /// Token claims, as delivered.
    pub claims: Map<String, Value>,
    /// The default authorization strategy for the resolver.
    pub default_auth_strategy: String,
    /// Token issuer.
    pub issuer: String,
    /// Source IP(s) of the caller.
    pub source_ip: Value,
    /// Subject identifier.
    pub sub: String,
    /// Cognito username.
    pub username: String,
}

/// The caller identity attached to an AppSync request.
#[derive(Debug, Clone)]
pub enum Identity {
    /// A Cognito user-pool caller.
    Cognito(CognitoIdentity),
    /// An IAM caller; the identity object is kept as-is.
    Iam {
        /// The raw identity object.
        raw: Value,
    },
}

impl Identity {
    /// The authorization type of this identity.
    pub fn kind(&self) -> AuthorizationType {
        match self {
            Identity::Cognito(_) => AuthorizationType::Cognito,
            Identity::Iam { .. } => AuthorizationType::Iam,
        }
    }

    /// The username, when the identity carries one.
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Cognito(identity) => Some(&identity.username),
            Identity::Iam { .. } => None,
        }
    }
}

// API_KEY authorization doesn't populate the identity field; an empty or
// missing object means no identity. An object with a `sub` is Cognito,
// anything else is IAM.
fn identity_from_raw(raw: &Value) -> Result<Option<Identity>, ConfigError> {
    let object = match raw.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return Ok(None),
    };
    if object.contains_key("sub") {
        let identity = serde_json::from_value(raw.clone())
            .map_err(|err| ConfigError::InvalidContext(format!("identity ({err})")))?;
        Ok(Some(Identity::Cognito(identity)))
    } else {
        Ok(Some(Identity::Iam { raw: raw.clone() }))
    }
}

/// Resolver metadata for the routed GraphQL field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// The GraphQL field being resolved.
    pub field_name: String,
    /// The parent type of the field.
    pub parent_type_name: String,
    /// Query variables.
    pub variables: Map<String, Value>,
}

/// The HTTP request surface of the AppSync call.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Request headers.
    pub headers: Map<String, Value>,
}

/// An AppSync encapsulation of the invocation event.
#[derive(Debug, Clone)]
pub struct AppSyncEvent {
    raw: Value,
    arguments: Map<String, Value>,
    identity: Option<Identity>,
    info: Info,
    request: Request,
}

impl AppSyncEvent {
    /// The resolver arguments.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// The caller identity, absent for API-key authorization.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Resolver field metadata.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// The request surface.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl Event for AppSyncEvent {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

impl FromRaw for AppSyncEvent {
    fn from_raw(raw: Value, config: &Config) -> Result<Self, Error> {
        let template = config
            .get(APPSYNC_EVENT_TEMPLATE)
            .ok_or(ConfigError::MissingTemplate)?;
        let context_location = template
            .get("context")
            .and_then(Value::as_str)
            .ok_or(ConfigError::MissingTemplate)?;

        let context = lookup_path(&raw, context_location)
            .ok_or_else(|| ConfigError::InvalidContext("context".into()))?;

        let arguments = context
            .get("arguments")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| ConfigError::InvalidContext("arguments".into()))?;
        let identity = identity_from_raw(
            context
                .get("identity")
                .ok_or_else(|| ConfigError::InvalidContext("identity".into()))?,
        )?;
        let info: Info = deserialize_context_field(context, "info")?;
        let request: Request = deserialize_context_field(context, "request")?;

        Ok(Self {
            raw,
            arguments,
            identity,
            info,
            request,
        })
    }
}

fn deserialize_context_field<T: serde::de::DeserializeOwned>(
    context: &Value,
    field: &str,
) -> Result<T, ConfigError> {
    let value = context
        .get(field)
        .ok_or_else(|| ConfigError::InvalidContext(field.into()))?;
    serde_json::from_value(value.clone())
        .map_err(|err| ConfigError::InvalidContext(format!("{field} ({err})")))
}

// Template paths are plain dotted keys; richer path expressions are the
// caller's job to pre-resolve.
fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |value, segment| value.get(segment))
}

/// Routes on the GraphQL field name resolved into the event's [`Info`].
///
/// Registration under an already-used field name silently replaces the
/// earlier handler: last write wins.
pub struct AppSyncField {
    routes: HashMap<String, BoxHandler<AppSyncEvent>>,
}

impl AppSyncField {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether a route is registered for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.routes.contains_key(field)
    }

    /// Returns the route matching the event's resolved field name.
    pub fn get_route(&self, event: &AppSyncEvent) -> Result<&dyn Handler<AppSyncEvent>, RoutingError> {
        let field_name = &event.info().field_name;
        self.routes
            .get(field_name)
            .map(|route| route.as_ref())
            .ok_or_else(|| RoutingError::NoRouteForValue(field_name.clone()))
    }
}

impl Default for AppSyncField {
    fn default() -> Self {
        Self::new()
    }
}

impl Router<AppSyncEvent> for AppSyncField {
    type Route = BoxHandler<AppSyncEvent>;

    fn add_route(&mut self, selector: Option<&str>, route: Self::Route) -> Result<(), ConfigError> {
        let selector = selector.ok_or(ConfigError::SelectorRequired)?;
        self.routes.insert(selector.to_string(), route);
        Ok(())
    }

    fn dispatch(&self, event: &AppSyncEvent) -> Result<Response, Error> {
        let route = self.get_route(event)?;
        route.call(event).map_err(Error::Handler)
    }
}
