//! [Switch](https://www.home-assistant.io/integrations/switch.mqtt/):
//! an `ON`/`OFF` value Home Assistant can command.

use crate::component::{
    Component, ComponentConfig, ComponentKind, ComponentState, EntityBase, MessageOutcome, OnOff,
    StatefulComponent, Transition, command, render_state,
};
use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::packet::Publish;
use crate::runtime::Transport;
use crate::throttle::Throttle;

/// Invoked with a decoded command. The switch does not apply commands by
/// itself; the callback decides whether to `set_state` and `publish_state`.
pub type SwitchCallback<'d> = fn(&mut Switch<'d>, &mut dyn Transport, Transition<OnOff>);

/// Applies the command and publishes the new state.
pub fn default_switch_callback(switch: &mut Switch<'_>, link: &mut dyn Transport, transition: Transition<OnOff>) {
    info!(
        "{} state changed: {} -> {}",
        switch.base().name(),
        transition.old.map_or("unset", OnOff::as_str),
        transition.new.as_str()
    );
    if let Err(err) = switch.set_state(transition.new) {
        error!("{} rejected command state: {}", switch.base().uid(), err);
        return;
    }
    switch.publish_state(link);
}

/// A commandable `ON`/`OFF` entity.
pub struct Switch<'d> {
    base: EntityBase<'d>,
    state: Option<OnOff>,
    throttle: Throttle,
    callback: SwitchCallback<'d>,
}

impl<'d> Switch<'d> {
    /// Creates a switch with no state and the default callback.
    pub fn new(device: &'d Device<'d>, name: &str, uid: &str) -> Result<Self, Error> {
        Ok(Self {
            base: EntityBase::new(device, ComponentKind::Switch, name, uid)?,
            state: None,
            throttle: Throttle::default(),
            callback: default_switch_callback,
        })
    }

    pub fn with_callback(mut self, callback: SwitchCallback<'d>) -> Self {
        self.callback = callback;
        self
    }

    pub fn with_state(mut self, state: OnOff) -> Self {
        self.state = Some(state);
        self
    }

    pub fn is_on(&self) -> Option<bool> {
        self.state.map(OnOff::is_on)
    }
}

impl<'d> Component<'d> for Switch<'d> {
    fn base(&self) -> &EntityBase<'d> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase<'d> {
        &mut self.base
    }

    fn get_config(&self) -> Result<ComponentConfig, Error> {
        let mut payload = self.base.discovery();
        payload.payload_off = Some(OnOff::OFF);
        payload.payload_on = Some(OnOff::ON);
        payload.command_topic = Some(self.base.command_topic());
        self.base.render_config(&payload)
    }

    fn command_filter(&self) -> Option<&str> {
        Some(self.base.command_topic())
    }

    fn publish_states(&mut self, link: &mut dyn Transport) -> usize {
        usize::from(self.publish_state(link))
    }

    fn on_message(&mut self, msg: &Publish<'_>, link: &mut dyn Transport) -> MessageOutcome {
        if msg.topic != self.base.command_topic() {
            return MessageOutcome::Ignored;
        }

        let new = match command::on_off(msg.payload) {
            Ok(new) => new,
            Err(err) => {
                warn!("Invalid switch command for {}: {}", self.base.uid(), err);
                return MessageOutcome::Rejected;
            }
        };

        let transition = Transition {
            old: self.state,
            new,
        };
        let callback = self.callback;
        callback(self, link, transition);
        MessageOutcome::Handled
    }
}

impl<'d> StatefulComponent<'d> for Switch<'d> {
    type State = OnOff;

    fn validate_state(&self, _candidate: &OnOff) -> Result<(), InvalidState> {
        Ok(())
    }

    fn state(&self) -> Option<&OnOff> {
        self.state.as_ref()
    }

    fn set_state(&mut self, candidate: OnOff) -> Result<(), Error> {
        self.validate_state(&candidate)?;
        debug!("Set state {} for {}", candidate.as_str(), self.base.uid());
        self.state = Some(candidate);
        Ok(())
    }

    fn get_state(&self) -> Result<ComponentState, Error> {
        let state = self.state.ok_or(Error::StateNotSet)?;
        render_state(self.base.state_topic(), state.as_str())
    }

    fn parts(&mut self) -> (&EntityBase<'d>, &mut Throttle) {
        (&self.base, &mut self.throttle)
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::*;
    use crate::packet::QoS;
    use crate::runtime::{BufferedOutbox, PublishOutbox, TopicCollector};

    type Link = BufferedOutbox<8, 128, 1536>;

    /// Accepts every publish and refuses every subscription.
    #[derive(Default)]
    struct RefusingLink {
        publishes: usize,
        subscribe_calls: usize,
    }

    impl PublishOutbox for RefusingLink {
        fn publish(&mut self, _topic: &str, _payload: &[u8], _qos: QoS, _retain: bool) -> bool {
            self.publishes += 1;
            true
        }
    }

    impl TopicCollector for RefusingLink {
        fn add(&mut self, _topic: &str) -> bool {
            self.subscribe_calls += 1;
            false
        }
    }

    fn record_only(switch: &mut Switch<'_>, _link: &mut dyn Transport, transition: Transition<OnOff>) {
        // Remember the command without applying it to the state
        switch.base_mut().set_retain(transition.new.is_on());
    }

    #[test]
    fn fresh_switch_has_no_state() {
        let device = Device::new("dev1", "Device");
        let switch = Switch::new(&device, "Relay", "relay1").unwrap();
        assert_eq!(switch.get_state(), Err(Error::StateNotSet));
    }

    #[test]
    fn set_then_get_returns_topic_and_literal() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        switch.set_state(OnOff::On).unwrap();

        let state = switch.get_state().unwrap();
        assert_eq!(state.topic.as_str(), "homeassistant/switch/dev1/relay1/state");
        assert_eq!(state.payload.as_str(), "ON");
        assert_eq!(switch.is_on(), Some(true));
    }

    #[test]
    fn config_has_command_topic() {
        let device = Device::new("dev1", "Device");
        let switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let config = switch.get_config().unwrap();
        assert!(
            config
                .payload_str()
                .contains(r#""command_topic":"homeassistant/switch/dev1/relay1/command""#)
        );
        assert_eq!(config, switch.get_config().unwrap());
    }

    #[test]
    fn publish_config_subscribes_once() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let mut link = Link::new();

        switch.publish_config(&mut link);
        switch.publish_config(&mut link);

        assert_eq!(link.len(), 2);
        assert_eq!(link.subscribe_calls(), 1);
        assert!(link.subscriptions().contains("homeassistant/switch/dev1/relay1/command"));
    }

    #[test]
    fn refused_subscription_is_not_retried() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let mut link = RefusingLink::default();

        assert!(switch.publish_config(&mut link));
        assert!(switch.publish_config(&mut link));

        assert_eq!(link.publishes, 2);
        assert_eq!(link.subscribe_calls, 1);
        assert!(switch.base().commands_registered());
    }

    #[test]
    fn uid_and_kind_through_trait_object() {
        let device = Device::new("dev1", "Device");
        let switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let component: &dyn Component<'_> = &switch;

        assert_eq!(component.uid(), "relay1");
        assert_eq!(component.kind(), ComponentKind::Switch);
    }

    #[test]
    fn unset_state_publishes_nothing() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let mut link = Link::new();

        assert!(!switch.publish_state(&mut link));
        assert!(link.is_empty());
    }

    #[test]
    fn publish_state_is_throttled() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1")
            .unwrap()
            .with_throttle(Duration::from_secs(60))
            .with_state(OnOff::Off);
        let mut link = Link::new();

        assert!(switch.publish_state(&mut link));
        assert!(!switch.publish_state(&mut link));
        assert_eq!(link.len(), 1);
    }

    #[test]
    fn command_applies_and_publishes_with_default_callback() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let mut link = Link::new();

        let msg = Publish::new("homeassistant/switch/dev1/relay1/command", b"ON");
        assert_eq!(switch.on_message(&msg, &mut link), MessageOutcome::Handled);
        assert_eq!(switch.state(), Some(&OnOff::On));
        assert_eq!(link.requests()[0].payload_str(), Some("ON"));
    }

    #[test]
    fn callback_decides_whether_to_apply() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1")
            .unwrap()
            .with_callback(record_only);
        let mut link = Link::new();

        let msg = Publish::new("homeassistant/switch/dev1/relay1/command", b"ON");
        assert_eq!(switch.on_message(&msg, &mut link), MessageOutcome::Handled);
        assert_eq!(switch.state(), None);
        assert!(switch.base().retain());
        assert!(link.is_empty());
    }

    #[test]
    fn malformed_command_is_rejected_without_state_change() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1")
            .unwrap()
            .with_state(OnOff::Off);
        let mut link = Link::new();

        let msg = Publish::new("homeassistant/switch/dev1/relay1/command", b"toggle");
        assert_eq!(switch.on_message(&msg, &mut link), MessageOutcome::Rejected);
        assert_eq!(switch.state(), Some(&OnOff::Off));
        assert!(link.is_empty());
    }

    #[test]
    fn foreign_topic_is_ignored() {
        let device = Device::new("dev1", "Device");
        let mut switch = Switch::new(&device, "Relay", "relay1").unwrap();
        let mut link = Link::new();

        let msg = Publish::new("homeassistant/switch/dev1/other/command", b"ON");
        assert_eq!(switch.on_message(&msg, &mut link), MessageOutcome::Ignored);
    }
}
