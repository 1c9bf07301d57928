//! Home Assistant components and their shared lifecycle.
//!
//! Every component owns an [`EntityBase`] (identity, topics, delivery
//! settings) and implements [`Component`]. Components with a single state
//! value additionally implement [`StatefulComponent`], which provides the
//! `set_state` / `get_state` / `publish_state` plumbing. The light has a
//! composite state and exposes per-sub-state operations instead.

pub mod binary_sensor;
pub(crate) mod command;
pub(crate) mod discovery;
pub mod light;
pub mod sensor;
pub mod switch;
pub mod text;

use embassy_time::{Duration, Instant};
use heapless::{String, Vec};

use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::packet::{Publish, QoS};
use crate::runtime::Transport;
use crate::throttle::Throttle;
use crate::topic::{self, Topic};

pub use discovery::DiscoveryPayload;

/// Maximum length of component names and uids, in bytes.
pub const MAX_NAME_LEN: usize = 64;
/// Maximum size of a rendered discovery payload.
pub const MAX_CONFIG_PAYLOAD_LEN: usize = 1536;
/// Maximum size of a rendered state payload.
pub const MAX_STATE_PAYLOAD_LEN: usize = 1024;

pub type Name = String<MAX_NAME_LEN>;
pub type StatePayload = String<MAX_STATE_PAYLOAD_LEN>;

/// Home Assistant entity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComponentKind {
    Sensor,
    BinarySensor,
    Switch,
    Light,
    Text,
}

impl ComponentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Sensor => "sensor",
            ComponentKind::BinarySensor => "binary_sensor",
            ComponentKind::Switch => "switch",
            ComponentKind::Light => "light",
            ComponentKind::Text => "text",
        }
    }
}

/// A discovery message: `{topic, payload}` with a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    pub topic: Topic,
    pub payload: Vec<u8, MAX_CONFIG_PAYLOAD_LEN>,
}

impl ComponentConfig {
    pub fn payload_str(&self) -> &str {
        // serde-json-core only ever writes UTF-8
        core::str::from_utf8(&self.payload).unwrap_or_default()
    }
}

/// A state message: `{topic, payload}` with a scalar payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentState {
    pub topic: Topic,
    pub payload: StatePayload,
}

/// The two-literal domain shared by binary sensors, switches and the light switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub const ON: &'static str = "ON";
    pub const OFF: &'static str = "OFF";

    pub const fn as_str(self) -> &'static str {
        match self {
            OnOff::On => Self::ON,
            OnOff::Off => Self::OFF,
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, OnOff::On)
    }

    /// Strict lookup of the wire literal; anything but `ON`/`OFF` is rejected.
    pub fn parse(literal: &str) -> Result<Self, InvalidState> {
        match literal {
            Self::ON => Ok(OnOff::On),
            Self::OFF => Ok(OnOff::Off),
            _ => Err(InvalidState::NotOnOff),
        }
    }
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value { OnOff::On } else { OnOff::Off }
    }
}

impl From<OnOff> for bool {
    fn from(value: OnOff) -> Self {
        value.is_on()
    }
}

impl TryFrom<&str> for OnOff {
    type Error = InvalidState;

    fn try_from(literal: &str) -> Result<Self, Self::Error> {
        OnOff::parse(literal)
    }
}

/// Passed to command callbacks: the state before the command and the
/// decoded, validated state the command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    pub old: Option<T>,
    pub new: T,
}

/// What a component did with an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageOutcome {
    /// The topic does not belong to this component.
    Ignored,
    /// The command was decoded and the callback invoked.
    Handled,
    /// The topic matched but the payload was malformed or invalid. Logged and dropped.
    Rejected,
}

/// Identity, topics and delivery settings shared by every component.
#[derive(Debug, Clone)]
pub struct EntityBase<'d> {
    device: &'d Device<'d>,
    kind: ComponentKind,
    name: Name,
    uid: Name,
    prefix: Topic,
    config_topic: Topic,
    state_topic: Topic,
    command_topic: Topic,
    attributes_topic: Topic,
    qos: QoS,
    retain: bool,
    commands_registered: bool,
}

impl<'d> EntityBase<'d> {
    pub fn new(device: &'d Device<'d>, kind: ComponentKind, name: &str, uid: &str) -> Result<Self, Error> {
        let name = copy_name(name)?;
        let uid = copy_name(uid)?;
        let prefix = topic::prefix(device.discovery_prefix, kind.as_str(), device.id, &uid)?;

        Ok(Self {
            device,
            kind,
            name,
            uid,
            config_topic: topic::join(&prefix, "config")?,
            state_topic: topic::join(&prefix, "state")?,
            command_topic: topic::join(&prefix, "command")?,
            attributes_topic: topic::join(&prefix, "attributes")?,
            prefix,
            qos: QoS::AtMostOnce,
            retain: false,
            commands_registered: false,
        })
    }

    pub fn device(&self) -> &'d Device<'d> {
        self.device
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// `<discovery>/<kind>/<device-id>/<uid>`
    pub fn topic_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn config_topic(&self) -> &str {
        &self.config_topic
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    pub fn command_topic(&self) -> &str {
        &self.command_topic
    }

    pub fn attributes_topic(&self) -> &str {
        &self.attributes_topic
    }

    /// `<prefix>/<suffix>`, e.g. `state/brightness`.
    pub fn topic(&self, suffix: &str) -> Result<Topic, Error> {
        topic::join(&self.prefix, suffix)
    }

    pub fn qos(&self) -> QoS {
        self.qos
    }

    pub fn retain(&self) -> bool {
        self.retain
    }

    pub fn set_qos(&mut self, qos: QoS) {
        self.qos = qos;
    }

    pub fn set_retain(&mut self, retain: bool) {
        self.retain = retain;
    }

    pub fn commands_registered(&self) -> bool {
        self.commands_registered
    }

    /// Discovery fields every component advertises.
    pub fn discovery(&self) -> DiscoveryPayload<'_> {
        DiscoveryPayload::new(
            self.kind.as_str(),
            self.device,
            &self.name,
            &self.uid,
            &self.state_topic,
            &self.attributes_topic,
        )
    }

    /// Serializes a discovery payload to its config message.
    pub fn render_config(&self, payload: &DiscoveryPayload<'_>) -> Result<ComponentConfig, Error> {
        let mut buf = Vec::<u8, MAX_CONFIG_PAYLOAD_LEN>::new();
        buf.resize(MAX_CONFIG_PAYLOAD_LEN, 0).map_err(|_| Error::Capacity)?;
        let len = serde_json_core::to_slice(payload, &mut buf)?;
        buf.truncate(len);

        Ok(ComponentConfig {
            topic: self.config_topic.clone(),
            payload: buf,
        })
    }

    /// Subscribes `filter` the first time it is called; later calls do nothing.
    ///
    /// A refused subscription is logged and not retried.
    pub(crate) fn register_commands(&mut self, link: &mut dyn Transport, filter: &str) {
        if self.commands_registered {
            trace!("Commands of {} already registered", self.uid.as_str());
            return;
        }
        self.commands_registered = true;

        if link.add(filter) {
            debug!("Subscribed once to {}", filter);
        } else {
            error!("Error subscribing {}", filter);
        }
    }

    /// Publishes a rendered config message.
    pub(crate) fn emit_config(&self, link: &mut dyn Transport, config: &ComponentConfig) -> bool {
        debug!("Publishing {} config to {}", self.uid.as_str(), config.topic.as_str());
        let accepted = link.publish(&config.topic, &config.payload, self.qos, self.retain);
        if !accepted {
            warn!("Config of {} was not accepted by the transport", self.uid.as_str());
        }
        accepted
    }

    /// Throttled state publish shared by all components and sub-states.
    ///
    /// Unset state is a warning and no I/O; a pending deadline is a silent skip.
    pub(crate) fn emit_state(
        &self,
        link: &mut dyn Transport,
        throttle: &mut Throttle,
        rendered: Result<ComponentState, Error>,
    ) -> bool {
        let state = match rendered {
            Ok(state) => state,
            Err(Error::StateNotSet) => {
                warn!("{} state is not set, nothing to publish", self.uid.as_str());
                return false;
            }
            Err(err) => {
                error!("{} state not rendered: {}", self.uid.as_str(), err);
                return false;
            }
        };

        if !throttle.try_acquire(Instant::now()) {
            debug!("Publishing {}: throttled", self.uid.as_str());
            return false;
        }

        debug!("Publishing {} state {} to {}", self.uid.as_str(), state.payload.as_str(), state.topic.as_str());
        link.publish(&state.topic, state.payload.as_bytes(), self.qos, self.retain)
    }
}

fn copy_name(value: &str) -> Result<Name, Error> {
    let mut name = Name::new();
    name.push_str(value).map_err(|_| Error::Capacity)?;
    Ok(name)
}

/// Builds a state message from a topic and a `Display` value.
pub(crate) fn render_state(topic: &str, value: impl core::fmt::Display) -> Result<ComponentState, Error> {
    use core::fmt::Write;

    let mut payload = StatePayload::new();
    write!(payload, "{value}").map_err(|_| Error::Capacity)?;
    let mut owned = Topic::new();
    owned.push_str(topic).map_err(|_| Error::Capacity)?;
    Ok(ComponentState {
        topic: owned,
        payload,
    })
}

/// Object-safe lifecycle shared by every component.
///
/// The default `publish_config` publishes the discovery payload and
/// registers the command filter exactly once.
pub trait Component<'d> {
    fn base(&self) -> &EntityBase<'d>;

    fn base_mut(&mut self) -> &mut EntityBase<'d>;

    /// Renders the discovery message. Deterministic for unchanged configuration.
    fn get_config(&self) -> Result<ComponentConfig, Error>;

    /// Topic filter to subscribe for commands, if the component accepts any.
    fn command_filter(&self) -> Option<&str> {
        None
    }

    /// Publishes every state the component holds. Returns the number of
    /// publishes handed to the transport.
    fn publish_states(&mut self, link: &mut dyn Transport) -> usize;

    /// Handles an incoming message. Malformed commands are logged and
    /// dropped, never propagated.
    fn on_message(&mut self, _msg: &Publish<'_>, _link: &mut dyn Transport) -> MessageOutcome {
        MessageOutcome::Ignored
    }

    fn uid<'s>(&'s self) -> &'s str
    where
        'd: 's,
    {
        self.base().uid()
    }

    fn kind(&self) -> ComponentKind {
        self.base().kind()
    }

    /// Announces the component and subscribes its command topic(s) once.
    fn publish_config(&mut self, link: &mut dyn Transport) -> bool {
        let config = match self.get_config() {
            Ok(config) => config,
            Err(err) => {
                error!("Config of {} not rendered: {}", self.uid(), err);
                return false;
            }
        };
        let published = self.base().emit_config(link, &config);

        let filter = self.command_filter().and_then(|f| Topic::try_from(f).ok());
        if let Some(filter) = filter {
            self.base_mut().register_commands(link, &filter);
        }

        published
    }

    fn with_qos(mut self, qos: QoS) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_qos(qos);
        self
    }

    fn with_retain(mut self, retain: bool) -> Self
    where
        Self: Sized,
    {
        self.base_mut().set_retain(retain);
        self
    }
}

/// Components whose state is a single value.
pub trait StatefulComponent<'d>: Component<'d> {
    type State: Clone;

    /// Checks a candidate against the component's domain rule.
    fn validate_state(&self, candidate: &Self::State) -> Result<(), InvalidState>;

    /// Current state, `None` until the first successful `set_state`.
    fn state(&self) -> Option<&Self::State>;

    /// Validates, then assigns. On error the previous state is kept.
    fn set_state(&mut self, candidate: Self::State) -> Result<(), Error>;

    /// Renders the current state. Fails with `StateNotSet` while unset.
    fn get_state(&self) -> Result<ComponentState, Error>;

    /// Shared identity plus the component's publish deadline.
    fn parts(&mut self) -> (&EntityBase<'d>, &mut Throttle);

    /// Publishes the state unless it is unset or throttled.
    fn publish_state(&mut self, link: &mut dyn Transport) -> bool {
        let rendered = self.get_state();
        let (base, throttle) = self.parts();
        base.emit_state(link, throttle, rendered)
    }

    /// Config followed by state. Returns whether the state was published.
    fn publish(&mut self, link: &mut dyn Transport) -> bool {
        self.publish_config(link);
        self.publish_state(link)
    }

    fn with_throttle(mut self, interval: Duration) -> Self
    where
        Self: Sized,
    {
        self.parts().1.set_interval(interval);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_off_lookup_is_strict() {
        assert_eq!(OnOff::parse("ON"), Ok(OnOff::On));
        assert_eq!(OnOff::parse("OFF"), Ok(OnOff::Off));
        assert_eq!(OnOff::parse("on"), Err(InvalidState::NotOnOff));
        assert_eq!(OnOff::parse(""), Err(InvalidState::NotOnOff));
        assert!(bool::from(OnOff::On));
        assert!(!bool::from(OnOff::Off));
    }

    #[test]
    fn base_derives_every_topic_from_prefix() {
        let device = Device::new("dev1", "Device");
        let base = EntityBase::new(&device, ComponentKind::Switch, "Relay", "relay1").unwrap();

        assert_eq!(base.topic_prefix(), "homeassistant/switch/dev1/relay1");
        assert_eq!(base.config_topic(), "homeassistant/switch/dev1/relay1/config");
        assert_eq!(base.state_topic(), "homeassistant/switch/dev1/relay1/state");
        assert_eq!(base.command_topic(), "homeassistant/switch/dev1/relay1/command");
        assert_eq!(base.attributes_topic(), "homeassistant/switch/dev1/relay1/attributes");
    }

    #[test]
    fn overlong_uid_is_rejected() {
        let device = Device::new("dev1", "Device");
        let uid = [b'x'; MAX_NAME_LEN + 1];
        let uid = core::str::from_utf8(&uid).unwrap();
        assert_eq!(
            EntityBase::new(&device, ComponentKind::Sensor, "Name", uid).err(),
            Some(Error::Capacity)
        );
    }
}
