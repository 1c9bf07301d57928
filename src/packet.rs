//! # MQTT message primitives
//!
//! The crate does not speak the MQTT wire protocol; these are the few
//! packet-level notions components need to hand messages to, and receive
//! messages from, an external client.

/// Represents the Quality of Service (QoS) levels for MQTT messages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    #[default]
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// An incoming PUBLISH delivered by the external client.
///
/// Borrowed from the client's receive buffer; components decode what they
/// need during `on_message` and keep nothing that points into it.
#[derive(Debug, Clone, Copy)]
pub struct Publish<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
    pub qos: QoS,
}

impl<'a> Publish<'a> {
    /// Creates an at-most-once message, the common case for HA commands.
    pub fn new(topic: &'a str, payload: &'a [u8]) -> Self {
        Self {
            topic,
            payload,
            qos: QoS::AtMostOnce,
        }
    }
}
