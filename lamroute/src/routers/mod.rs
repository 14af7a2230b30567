//! Routing strategies.
//!
//! Each strategy is a self-contained type implementing [`Router`]:
//!
//! - [`SingleRoute`]: one unconditional route
//! - [`EventField`]: keyed on a top-level field of the raw payload
//! - [`SqsMessageField`]: keyed per-record over an SQS batch envelope
//!
//! The AppSync field-name strategy lives with its event type in
//! [`crate::appsync`].
//!
//! [`Router`]: lamroute_core::Router

mod event_field;
mod single;
mod sqs;

pub use event_field::EventField;
pub use single::SingleRoute;
pub use sqs::{BoxMessageHandler, MessageHandler, SqsMessage, SqsMessageField};
