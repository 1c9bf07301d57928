//! Owned publish requests and `Transport` implementations.
//!
//! Two ways of getting component output to a real client are provided:
//!
//! - [`BufferedOutbox`] collects requests in place; the driver drains it
//!   after calling into components.
//! - [`ChannelOutbox`] pushes requests into an `embassy-sync` channel that
//!   an async MQTT task receives from.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};
use heapless::Vec;

use super::registry::TopicRegistry;
use super::traits::{PublishOutbox, TopicCollector};
use crate::QoS;

/// An owned publish request with inline storage for topic and payload.
///
/// This allows the outbox to store requests without requiring the original
/// data to remain borrowed.
#[derive(Debug, Clone)]
pub struct OwnedPublishRequest<const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> {
    /// The topic (stored inline)
    pub topic: heapless::String<TOPIC_SIZE>,
    /// The payload (stored inline)
    pub payload: heapless::Vec<u8, PAYLOAD_SIZE>,
    /// Quality of Service level
    pub qos: QoS,
    /// Whether the broker should retain the message
    pub retain: bool,
}

impl<const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> OwnedPublishRequest<TOPIC_SIZE, PAYLOAD_SIZE> {
    /// Copies topic and payload. Returns `None` if either does not fit.
    pub fn new(topic: &str, payload: &[u8], qos: QoS, retain: bool) -> Option<Self> {
        let mut topic_str = heapless::String::new();
        topic_str.push_str(topic).ok()?;

        let mut payload_vec = heapless::Vec::new();
        payload_vec.extend_from_slice(payload).ok()?;

        Some(Self {
            topic: topic_str,
            payload: payload_vec,
            qos,
            retain,
        })
    }

    /// The payload as UTF-8, if it is valid.
    pub fn payload_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

/// A buffered transport that collects publish and subscribe requests.
///
/// # Type Parameters
///
/// - `CAPACITY`: Maximum number of buffered publishes and of subscriptions
/// - `TOPIC_SIZE`: Maximum topic string length
/// - `PAYLOAD_SIZE`: Maximum payload size
pub struct BufferedOutbox<const CAPACITY: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize>
{
    requests: Vec<OwnedPublishRequest<TOPIC_SIZE, PAYLOAD_SIZE>, CAPACITY>,
    subscriptions: TopicRegistry<CAPACITY>,
    subscribe_calls: usize,
}

impl<const CAPACITY: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize>
    BufferedOutbox<CAPACITY, TOPIC_SIZE, PAYLOAD_SIZE>
{
    /// Create a new empty buffered outbox.
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            subscriptions: TopicRegistry::new(),
            subscribe_calls: 0,
        }
    }

    /// Buffered publish requests, oldest first.
    pub fn requests(&self) -> &[OwnedPublishRequest<TOPIC_SIZE, PAYLOAD_SIZE>] {
        &self.requests
    }

    /// Drain all buffered requests, returning an iterator.
    pub fn drain(
        &mut self,
    ) -> impl Iterator<Item = OwnedPublishRequest<TOPIC_SIZE, PAYLOAD_SIZE>> + '_ {
        let mut pending = core::mem::take(&mut self.requests);
        pending.reverse();
        core::iter::from_fn(move || pending.pop())
    }

    /// Topic filters subscribed so far.
    pub fn subscriptions(&self) -> &TopicRegistry<CAPACITY> {
        &self.subscriptions
    }

    /// Number of subscribe calls received, including repeated topics.
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls
    }

    /// Clear all buffered requests and subscriptions.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.subscriptions.clear();
        self.subscribe_calls = 0;
    }

    /// Check if the outbox is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Get the number of buffered requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }
}

impl<const CAPACITY: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> Default
    for BufferedOutbox<CAPACITY, TOPIC_SIZE, PAYLOAD_SIZE>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAPACITY: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> PublishOutbox
    for BufferedOutbox<CAPACITY, TOPIC_SIZE, PAYLOAD_SIZE>
{
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> bool {
        let Some(req) = OwnedPublishRequest::new(topic, payload, qos, retain) else {
            return false; // Topic or payload too large
        };
        self.requests.push(req).is_ok()
    }
}

impl<const CAPACITY: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> TopicCollector
    for BufferedOutbox<CAPACITY, TOPIC_SIZE, PAYLOAD_SIZE>
{
    fn add(&mut self, topic: &str) -> bool {
        self.subscribe_calls += 1;
        self.subscriptions.add_topic(topic)
    }
}

/// A request handed from components to an async MQTT task.
#[derive(Debug, Clone)]
pub enum OutboxRequest<const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> {
    Publish(OwnedPublishRequest<TOPIC_SIZE, PAYLOAD_SIZE>),
    Subscribe(heapless::String<TOPIC_SIZE>),
}

pub type OutboxChannel<M, const DEPTH: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize> =
    Channel<M, OutboxRequest<TOPIC_SIZE, PAYLOAD_SIZE>, DEPTH>;

/// A transport that forwards requests into a channel without waiting.
///
/// Requests are dropped (and `false` returned) when the channel is full.
/// The receiving task performs the actual client calls.
pub struct ChannelOutbox<
    'c,
    M: RawMutex,
    const DEPTH: usize,
    const TOPIC_SIZE: usize,
    const PAYLOAD_SIZE: usize,
> {
    tx: Sender<'c, M, OutboxRequest<TOPIC_SIZE, PAYLOAD_SIZE>, DEPTH>,
}

impl<'c, M: RawMutex, const DEPTH: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize>
    ChannelOutbox<'c, M, DEPTH, TOPIC_SIZE, PAYLOAD_SIZE>
{
    /// Create a new `ChannelOutbox` from a channel sender.
    pub fn new(tx: Sender<'c, M, OutboxRequest<TOPIC_SIZE, PAYLOAD_SIZE>, DEPTH>) -> Self {
        Self { tx }
    }
}

impl<M: RawMutex, const DEPTH: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize>
    PublishOutbox for ChannelOutbox<'_, M, DEPTH, TOPIC_SIZE, PAYLOAD_SIZE>
{
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool) -> bool {
        let Some(req) = OwnedPublishRequest::new(topic, payload, qos, retain) else {
            return false;
        };
        self.tx.try_send(OutboxRequest::Publish(req)).is_ok()
    }
}

impl<M: RawMutex, const DEPTH: usize, const TOPIC_SIZE: usize, const PAYLOAD_SIZE: usize>
    TopicCollector for ChannelOutbox<'_, M, DEPTH, TOPIC_SIZE, PAYLOAD_SIZE>
{
    fn add(&mut self, topic: &str) -> bool {
        let mut owned = heapless::String::new();
        if owned.push_str(topic).is_err() {
            return false;
        }
        self.tx.try_send(OutboxRequest::Subscribe(owned)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;

    #[test]
    fn buffered_outbox_records_in_order() {
        let mut outbox = BufferedOutbox::<4, 32, 16>::new();
        assert!(outbox.publish("a", b"1", QoS::AtMostOnce, false));
        assert!(outbox.publish("b", b"2", QoS::AtLeastOnce, true));

        let drained: Vec<_, 4> = outbox.drain().collect();
        assert_eq!(drained[0].topic.as_str(), "a");
        assert_eq!(drained[1].topic.as_str(), "b");
        assert!(drained[1].retain);
        assert!(outbox.is_empty());
    }

    #[test]
    fn buffered_outbox_rejects_oversized_payload() {
        let mut outbox = BufferedOutbox::<4, 32, 4>::new();
        assert!(!outbox.publish("a", b"too long", QoS::AtMostOnce, false));
        assert!(outbox.is_empty());
    }

    #[test]
    fn buffered_outbox_rejects_when_full() {
        let mut outbox = BufferedOutbox::<1, 32, 4>::new();
        assert!(outbox.publish("a", b"1", QoS::AtMostOnce, false));
        assert!(!outbox.publish("b", b"2", QoS::AtMostOnce, false));
        assert_eq!(outbox.len(), 1);
    }

    #[test]
    fn buffered_outbox_tracks_subscriptions() {
        let mut outbox = BufferedOutbox::<4, 32, 4>::new();
        assert!(outbox.add("x/command"));
        assert!(outbox.add("x/command"));
        assert_eq!(outbox.subscriptions().len(), 1);
        assert_eq!(outbox.subscribe_calls(), 2);
    }

    #[test]
    fn channel_outbox_forwards_requests() {
        let channel = OutboxChannel::<NoopRawMutex, 2, 32, 16>::new();
        let mut outbox = ChannelOutbox::new(channel.sender());

        assert!(outbox.add("x/command"));
        assert!(outbox.publish("x/state", b"ON", QoS::AtMostOnce, false));
        assert!(!outbox.publish("x/state", b"OFF", QoS::AtMostOnce, false));

        match channel.try_receive() {
            Ok(OutboxRequest::Subscribe(topic)) => assert_eq!(topic.as_str(), "x/command"),
            other => panic!("unexpected request: {:?}", other),
        }
        match channel.try_receive() {
            Ok(OutboxRequest::Publish(req)) => assert_eq!(req.payload_str(), Some("ON")),
            other => panic!("unexpected request: {:?}", other),
        }
    }
}
