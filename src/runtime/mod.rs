//! Transport plumbing between components and an MQTT client.
//!
//! # Overview
//!
//! Components never perform I/O themselves. Every operation that talks to
//! the broker takes a `&mut dyn Transport`, a synchronous capability to
//! queue publishes ([`PublishOutbox`]) and subscriptions
//! ([`TopicCollector`]). The driver decides how those requests reach the
//! client:
//!
//! - [`BufferedOutbox`] collects them in place to be drained after the call
//! - [`ChannelOutbox`] forwards them to an async task over an
//!   `embassy-sync` channel
//!
//! Incoming messages are routed back with [`ComponentRegistry::dispatch`]
//! (or `Component::on_message` directly).

pub(crate) mod dispatch;
pub(crate) mod publisher;
pub(crate) mod registry;
pub(crate) mod traits;

pub use dispatch::ComponentRegistry;
pub use publisher::{BufferedOutbox, ChannelOutbox, OutboxChannel, OutboxRequest, OwnedPublishRequest};
pub use registry::{MAX_TOPIC_LEN, TopicRegistry, topic_matches};
pub use traits::{PublishOutbox, TopicCollector, Transport};

pub use crate::packet::Publish;
