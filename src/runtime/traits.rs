//! Transport capability traits.
//!
//! Components never talk to an MQTT client directly. They are handed a
//! `&mut dyn Transport` and use it to queue publishes and subscriptions.
//! What happens next (a blocking client call, an async channel, a test
//! buffer) is up to the implementor.
//!
//! # Object Safety
//!
//! Both traits are dyn-compatible so that components, registries and
//! callbacks can take `&mut dyn Transport` without generic parameters:
//! - No `async fn` methods
//! - No generic type parameters or lifetimes on methods
//! - Topics and payloads are borrowed only for the duration of the call

use crate::packet::QoS;

/// Object-safe trait for queuing MQTT publish requests.
///
/// # Example
///
/// ```ignore
/// fn announce(outbox: &mut dyn PublishOutbox) {
///     outbox.publish("device/state", b"online", QoS::AtMostOnce, true);
/// }
/// ```
pub trait PublishOutbox {
    /// Queue a message for publishing.
    ///
    /// Synchronous; returns `true` if the request was accepted. Acceptance
    /// is not delivery: the transport owns QoS handling from here on.
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> bool;
}

/// Object-safe trait for collecting topic subscriptions.
pub trait TopicCollector {
    /// Subscribe to a topic (wildcards allowed).
    ///
    /// The topic string is copied internally, so it only needs to live
    /// for the duration of this call.
    ///
    /// Returns `true` if the subscription was accepted.
    fn add(&mut self, topic: &str) -> bool;
}

/// The full capability set components need from an MQTT client.
///
/// Implemented automatically for anything that is both a
/// [`PublishOutbox`] and a [`TopicCollector`].
pub trait Transport: PublishOutbox + TopicCollector {}

impl<T: PublishOutbox + TopicCollector + ?Sized> Transport for T {}

/// Forwarding implementation for mutable references.
impl<P: PublishOutbox + ?Sized> PublishOutbox for &mut P {
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> bool {
        (**self).publish(topic, payload, qos, retain)
    }
}

impl<C: TopicCollector + ?Sized> TopicCollector for &mut C {
    fn add(&mut self, topic: &str) -> bool {
        (**self).add(topic)
    }
}
