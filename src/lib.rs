//! # Home Assistant MQTT discovery components for embedded systems
//!
//! `myrtio-ha-components` models Home Assistant entities (binary sensors,
//! switches, lights, text fields, sensors) as small stateful objects that
//! produce MQTT discovery configs and state messages, and react to incoming
//! command messages.
//!
//! ## Core Features
//!
//! - **`no_std` & `no_alloc`:** Topics and payloads live in `heapless`
//!   buffers, discovery JSON is rendered with `serde-json-core`.
//! - **Transport Agnostic:** Components only need a `&mut dyn Transport`, a
//!   synchronous capability to queue publishes and subscriptions. Wrap any
//!   client, or use [`runtime::BufferedOutbox`] / [`runtime::ChannelOutbox`].
//! - **Validated State:** State is an `Option`, set only through validation;
//!   malformed commands from the broker are logged and dropped.
//! - **Throttled Publishing:** State publishes are rate limited per
//!   component (and per light sub-state) with `embassy-time`.
//!
//! ## Usage
//!
//! ```ignore
//! use myrtio_ha_components::{Device, StatefulComponent, Component, OnOff};
//! use myrtio_ha_components::component::switch::Switch;
//! use myrtio_ha_components::runtime::{BufferedOutbox, Publish};
//!
//! let device = Device::new("myrtio_relay_0A1B", "Relay Board");
//! let mut relay = Switch::new(&device, "Relay", "relay")?.with_state(OnOff::Off);
//! let mut outbox = BufferedOutbox::<8, 128, 1536>::new();
//!
//! relay.publish(&mut outbox);
//! for request in outbox.drain() {
//!     client.publish(&request.topic, &request.payload, request.qos).await?;
//! }
//!
//! // Later, for every message the client receives
//! relay.on_message(&Publish::new(topic, payload), &mut outbox);
//! ```
//!
//! ## Features
//!
//! - `log`, `defmt`, `esp32-log`: logging backend
//! - `std`: [`system_info::temperatures::HwmonProbes`], the Linux hwmon
//!   temperature source

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod fmt;

pub mod component;
pub mod device;
pub mod error;
pub mod packet;
pub mod runtime;
pub mod system_info;
pub mod throttle;
pub mod topic;

// Re-export key types for easier access at the crate root.
pub use component::{
    Component, ComponentConfig, ComponentKind, ComponentState, MessageOutcome, OnOff,
    StatefulComponent, Transition,
};
pub use device::{Device, DeviceBuilder};
pub use error::{DecodeError, Error, InvalidState};
pub use packet::{Publish, QoS};
pub use runtime::Transport;
