//! [Light](https://www.home-assistant.io/integrations/light.mqtt/) with
//! separate switch, brightness and colour sub-states.
//!
//! The light has no single state value, so it implements [`Component`] but
//! not [`StatefulComponent`](crate::component::StatefulComponent). Each
//! sub-state has its own validate / set / get / publish operation, its own
//! state and command topic and its own throttle:
//!
//! ```text
//! <prefix>/state/switch       <prefix>/command/switch
//! <prefix>/state/brightness   <prefix>/command/brightness
//! <prefix>/state/rgb[w]       <prefix>/command/rgb[w]
//! ```
//!
//! All command topics are covered by a single `<prefix>/command/#`
//! subscription registered on the first `publish_config`.

use core::fmt;

use embassy_time::Duration;

use crate::component::{
    Component, ComponentConfig, ComponentKind, ComponentState, DiscoveryPayload, EntityBase,
    MessageOutcome, OnOff, Transition, command, render_state,
};
use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::packet::Publish;
use crate::runtime::Transport;
use crate::throttle::Throttle;
use crate::topic::{self, Topic};

/// Channel layout of a light's colour.
pub trait ColorModel: Copy + fmt::Debug + 'static {
    /// Number of channels, each in `0..=255`.
    const CHANNELS: usize;
    /// Topic segment and discovery key prefix, `rgb` or `rgbw`.
    const MODE: &'static str;
    /// `supported_color_modes` advertised in the discovery payload, if any.
    const SUPPORTED_COLOR_MODES: Option<&'static [&'static str]>;

    type Color: Copy + PartialEq + fmt::Debug + AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Every channel at full intensity.
    const WHITE: Self::Color;

    /// Sets the model-specific colour topic keys.
    fn advertise<'p>(payload: &mut DiscoveryPayload<'p>, state_topic: &'p str, command_topic: &'p str);
}

/// Three-channel colour, `rgb` in discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb;

impl ColorModel for Rgb {
    const CHANNELS: usize = 3;
    const MODE: &'static str = "rgb";
    const SUPPORTED_COLOR_MODES: Option<&'static [&'static str]> = None;

    type Color = [u8; 3];

    const WHITE: [u8; 3] = [255; 3];

    fn advertise<'p>(payload: &mut DiscoveryPayload<'p>, state_topic: &'p str, command_topic: &'p str) {
        payload.rgb_state_topic = Some(state_topic);
        payload.rgb_command_topic = Some(command_topic);
    }
}

/// Four-channel colour with a white channel, `rgbw` in discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgbw;

impl ColorModel for Rgbw {
    const CHANNELS: usize = 4;
    const MODE: &'static str = "rgbw";
    const SUPPORTED_COLOR_MODES: Option<&'static [&'static str]> = Some(&["rgbw"]);

    type Color = [u8; 4];

    const WHITE: [u8; 4] = [255; 4];

    fn advertise<'p>(payload: &mut DiscoveryPayload<'p>, state_topic: &'p str, command_topic: &'p str) {
        payload.rgbw_state_topic = Some(state_topic);
        payload.rgbw_command_topic = Some(command_topic);
    }
}

pub type RgbLight<'d> = Light<'d, Rgb>;
pub type RgbwLight<'d> = Light<'d, Rgbw>;

/// Comma-joined channel values, the colour wire format.
#[derive(Debug, Clone, Copy)]
pub struct Channels<'a>(pub &'a [u8]);

impl fmt::Display for Channels<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, channel) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{channel}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Channels<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]}", self.0)
    }
}

/// Brightness bounds and initial sub-states of a light.
#[derive(Debug, Clone, Copy)]
pub struct LightSettings<M: ColorModel> {
    pub min_brightness: u8,
    pub max_brightness: u8,
    pub initial_switch: Option<OnOff>,
    pub initial_brightness: Option<u8>,
    pub initial_color: Option<M::Color>,
}

impl<M: ColorModel> LightSettings<M> {
    /// Switched on, at `max` brightness, white.
    pub fn new(min_brightness: u8, max_brightness: u8) -> Self {
        Self {
            min_brightness,
            max_brightness,
            initial_switch: Some(OnOff::On),
            initial_brightness: Some(max_brightness),
            initial_color: Some(M::WHITE),
        }
    }

    /// No initial sub-states; every getter fails until set.
    pub fn unset(min_brightness: u8, max_brightness: u8) -> Self {
        Self {
            min_brightness,
            max_brightness,
            initial_switch: None,
            initial_brightness: None,
            initial_color: None,
        }
    }
}

impl<M: ColorModel> Default for LightSettings<M> {
    fn default() -> Self {
        Self::new(0, u8::MAX)
    }
}

pub type SwitchCallback<'d, M> = fn(&mut Light<'d, M>, &mut dyn Transport, Transition<OnOff>);
pub type BrightnessCallback<'d, M> = fn(&mut Light<'d, M>, &mut dyn Transport, Transition<u8>);
pub type ColorCallback<'d, M> =
    fn(&mut Light<'d, M>, &mut dyn Transport, Transition<<M as ColorModel>::Color>);

/// Applies the switch command and publishes it.
pub fn default_switch_callback<M: ColorModel>(
    light: &mut Light<'_, M>,
    link: &mut dyn Transport,
    transition: Transition<OnOff>,
) {
    info!(
        "{} switch changed: {} -> {}",
        light.base().name(),
        transition.old.map_or("unset", OnOff::as_str),
        transition.new.as_str()
    );
    light.set_state_switch(transition.new);
    light.publish_state_switch(link);
}

/// Applies the brightness command and publishes it.
pub fn default_brightness_callback<M: ColorModel>(
    light: &mut Light<'_, M>,
    link: &mut dyn Transport,
    transition: Transition<u8>,
) {
    info!("{} brightness changed to {}", light.base().name(), transition.new);
    if let Err(err) = light.set_state_brightness(i32::from(transition.new)) {
        error!("{} rejected brightness: {}", light.base().uid(), err);
        return;
    }
    light.publish_state_brightness(link);
}

/// Applies the colour command and publishes it.
pub fn default_color_callback<M: ColorModel>(
    light: &mut Light<'_, M>,
    link: &mut dyn Transport,
    transition: Transition<M::Color>,
) {
    info!(
        "{} colour changed to {}",
        light.base().name(),
        Channels(transition.new.as_ref())
    );
    light.set_color(transition.new);
    light.publish_state_color(link);
}

struct SubTopics {
    state: Topic,
    command: Topic,
}

impl SubTopics {
    fn new(prefix: &str, name: &str) -> Result<Self, Error> {
        Ok(Self {
            state: topic::join(&topic::join(prefix, "state")?, name)?,
            command: topic::join(&topic::join(prefix, "command")?, name)?,
        })
    }
}

/// A dimmable colour light with separate switch, brightness and colour sub-states.
pub struct Light<'d, M: ColorModel> {
    base: EntityBase<'d>,
    min_brightness: u8,
    max_brightness: u8,

    switch: Option<OnOff>,
    brightness: Option<u8>,
    color: Option<M::Color>,

    switch_topics: SubTopics,
    brightness_topics: SubTopics,
    color_topics: SubTopics,
    command_filter: Topic,

    switch_throttle: Throttle,
    brightness_throttle: Throttle,
    color_throttle: Throttle,

    on_switch: SwitchCallback<'d, M>,
    on_brightness: BrightnessCallback<'d, M>,
    on_color: ColorCallback<'d, M>,
}

impl<'d, M: ColorModel> Light<'d, M> {
    /// Creates a light with [`LightSettings::default`].
    pub fn new(device: &'d Device<'d>, name: &str, uid: &str) -> Result<Self, Error> {
        Self::with_settings(device, name, uid, LightSettings::default())
    }

    /// Creates a light with explicit bounds and initial sub-states.
    ///
    /// Fails with [`InvalidState`] if the initial brightness is out of bounds.
    pub fn with_settings(
        device: &'d Device<'d>,
        name: &str,
        uid: &str,
        settings: LightSettings<M>,
    ) -> Result<Self, Error> {
        let base = EntityBase::new(device, ComponentKind::Light, name, uid)?;
        let switch_topics = SubTopics::new(base.topic_prefix(), "switch")?;
        let brightness_topics = SubTopics::new(base.topic_prefix(), "brightness")?;
        let color_topics = SubTopics::new(base.topic_prefix(), M::MODE)?;
        let command_filter = base.topic("command/#")?;

        let mut light = Self {
            base,
            min_brightness: settings.min_brightness,
            max_brightness: settings.max_brightness,
            switch: settings.initial_switch,
            brightness: None,
            color: settings.initial_color,
            switch_topics,
            brightness_topics,
            color_topics,
            command_filter,
            switch_throttle: Throttle::default(),
            brightness_throttle: Throttle::default(),
            color_throttle: Throttle::default(),
            on_switch: default_switch_callback::<M>,
            on_brightness: default_brightness_callback::<M>,
            on_color: default_color_callback::<M>,
        };
        if let Some(brightness) = settings.initial_brightness {
            light.set_state_brightness(i32::from(brightness))?;
        }
        Ok(light)
    }

    /// Sets the throttle interval of all three sub-states.
    pub fn with_throttle(mut self, interval: Duration) -> Self {
        self.switch_throttle.set_interval(interval);
        self.brightness_throttle.set_interval(interval);
        self.color_throttle.set_interval(interval);
        self
    }

    pub fn with_switch_callback(mut self, callback: SwitchCallback<'d, M>) -> Self {
        self.on_switch = callback;
        self
    }

    pub fn with_brightness_callback(mut self, callback: BrightnessCallback<'d, M>) -> Self {
        self.on_brightness = callback;
        self
    }

    pub fn with_color_callback(mut self, callback: ColorCallback<'d, M>) -> Self {
        self.on_color = callback;
        self
    }

    pub fn min_brightness(&self) -> u8 {
        self.min_brightness
    }

    pub fn max_brightness(&self) -> u8 {
        self.max_brightness
    }

    pub fn switch(&self) -> Option<OnOff> {
        self.switch
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    pub fn color(&self) -> Option<M::Color> {
        self.color
    }

    pub fn is_on(&self) -> Option<bool> {
        self.switch.map(OnOff::is_on)
    }

    pub fn validate_state_switch(&self, candidate: &str) -> Result<OnOff, InvalidState> {
        OnOff::parse(candidate)
    }

    /// Accepts values within `[min_brightness, max_brightness]`.
    pub fn validate_state_brightness(&self, candidate: i32) -> Result<u8, InvalidState> {
        let out_of_range = InvalidState::BrightnessOutOfRange {
            value: candidate,
            min: self.min_brightness,
            max: self.max_brightness,
        };
        let value = u8::try_from(candidate).map_err(|_| out_of_range)?;
        if value < self.min_brightness || value > self.max_brightness {
            return Err(out_of_range);
        }
        Ok(value)
    }

    /// Accepts exactly `M::CHANNELS` values, each within `[0, 255]`.
    pub fn validate_state_color(&self, candidate: &[i32]) -> Result<M::Color, InvalidState> {
        if candidate.len() != M::CHANNELS {
            return Err(InvalidState::ColorChannelCount {
                expected: M::CHANNELS,
                actual: candidate.len(),
            });
        }

        let mut color = M::Color::default();
        for (index, (slot, &value)) in color.as_mut().iter_mut().zip(candidate).enumerate() {
            *slot = u8::try_from(value).map_err(|_| InvalidState::ColorChannelOutOfRange { index, value })?;
        }
        Ok(color)
    }

    pub fn set_state_switch(&mut self, candidate: OnOff) {
        debug!("Set switch {} for {}", candidate.as_str(), self.base.uid());
        self.switch = Some(candidate);
    }

    /// Validates, then assigns. On error the previous brightness is kept.
    pub fn set_state_brightness(&mut self, candidate: i32) -> Result<(), Error> {
        let brightness = self.validate_state_brightness(candidate)?;
        debug!("Set brightness {} for {}", brightness, self.base.uid());
        self.brightness = Some(brightness);
        Ok(())
    }

    /// Validates, then assigns. On error the previous colour is kept.
    pub fn set_state_color(&mut self, candidate: &[i32]) -> Result<(), Error> {
        let color = self.validate_state_color(candidate)?;
        self.set_color(color);
        Ok(())
    }

    /// Assigns an already typed colour; every `u8` channel is in range.
    pub fn set_color(&mut self, color: M::Color) {
        debug!("Set colour {} for {}", Channels(color.as_ref()), self.base.uid());
        self.color = Some(color);
    }

    pub fn get_state_switch(&self) -> Result<ComponentState, Error> {
        let switch = self.switch.ok_or(Error::StateNotSet)?;
        render_state(&self.switch_topics.state, switch.as_str())
    }

    pub fn get_state_brightness(&self) -> Result<ComponentState, Error> {
        let brightness = self.brightness.ok_or(Error::StateNotSet)?;
        render_state(&self.brightness_topics.state, brightness)
    }

    pub fn get_state_color(&self) -> Result<ComponentState, Error> {
        let color = self.color.ok_or(Error::StateNotSet)?;
        render_state(&self.color_topics.state, Channels(color.as_ref()))
    }

    pub fn publish_state_switch(&mut self, link: &mut dyn Transport) -> bool {
        let rendered = self.get_state_switch();
        self.base.emit_state(link, &mut self.switch_throttle, rendered)
    }

    pub fn publish_state_brightness(&mut self, link: &mut dyn Transport) -> bool {
        let rendered = self.get_state_brightness();
        self.base.emit_state(link, &mut self.brightness_throttle, rendered)
    }

    pub fn publish_state_color(&mut self, link: &mut dyn Transport) -> bool {
        let rendered = self.get_state_color();
        self.base.emit_state(link, &mut self.color_throttle, rendered)
    }

    /// Config followed by every sub-state. Returns the number of state publishes.
    pub fn publish(&mut self, link: &mut dyn Transport) -> usize {
        self.publish_config(link);
        self.publish_states(link)
    }

    fn on_switch_command(&mut self, payload: &[u8], link: &mut dyn Transport) -> MessageOutcome {
        let new = match command::on_off(payload) {
            Ok(new) => new,
            Err(err) => {
                warn!("Invalid switch command for {}: {}", self.base.uid(), err);
                return MessageOutcome::Rejected;
            }
        };

        let transition = Transition {
            old: self.switch,
            new,
        };
        let callback = self.on_switch;
        callback(self, link, transition);
        MessageOutcome::Handled
    }

    fn on_brightness_command(&mut self, payload: &[u8], link: &mut dyn Transport) -> MessageOutcome {
        let new = command::integer(payload)
            .map_err(Error::from)
            .and_then(|value| Ok(self.validate_state_brightness(value)?));
        let new = match new {
            Ok(new) => new,
            Err(err) => {
                warn!("Invalid brightness command for {}: {}", self.base.uid(), err);
                return MessageOutcome::Rejected;
            }
        };

        let transition = Transition {
            old: self.brightness,
            new,
        };
        let callback = self.on_brightness;
        callback(self, link, transition);
        MessageOutcome::Handled
    }

    fn on_color_command(&mut self, payload: &[u8], link: &mut dyn Transport) -> MessageOutcome {
        let new = command::integers(payload)
            .map_err(Error::from)
            .and_then(|fields| Ok(self.validate_state_color(&fields)?));
        let new = match new {
            Ok(new) => new,
            Err(err) => {
                warn!("Invalid colour command for {}: {}", self.base.uid(), err);
                return MessageOutcome::Rejected;
            }
        };

        let transition = Transition {
            old: self.color,
            new,
        };
        let callback = self.on_color;
        callback(self, link, transition);
        MessageOutcome::Handled
    }
}

impl<'d, M: ColorModel> Component<'d> for Light<'d, M> {
    fn base(&self) -> &EntityBase<'d> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase<'d> {
        &mut self.base
    }

    fn get_config(&self) -> Result<ComponentConfig, Error> {
        let mut payload = self.base.discovery();
        payload.state_topic = self.switch_topics.state.as_str();
        payload.command_topic = Some(self.switch_topics.command.as_str());
        payload.payload_off = Some(OnOff::OFF);
        payload.payload_on = Some(OnOff::ON);
        payload.brightness = Some(true);
        payload.brightness_scale = Some(self.max_brightness);
        payload.brightness_state_topic = Some(self.brightness_topics.state.as_str());
        payload.brightness_command_topic = Some(self.brightness_topics.command.as_str());
        M::advertise(
            &mut payload,
            self.color_topics.state.as_str(),
            self.color_topics.command.as_str(),
        );
        payload.supported_color_modes = M::SUPPORTED_COLOR_MODES;
        self.base.render_config(&payload)
    }

    fn command_filter(&self) -> Option<&str> {
        Some(self.command_filter.as_str())
    }

    fn publish_states(&mut self, link: &mut dyn Transport) -> usize {
        usize::from(self.publish_state_switch(link))
            + usize::from(self.publish_state_brightness(link))
            + usize::from(self.publish_state_color(link))
    }

    fn on_message(&mut self, msg: &Publish<'_>, link: &mut dyn Transport) -> MessageOutcome {
        if msg.topic == self.switch_topics.command.as_str() {
            self.on_switch_command(msg.payload, link)
        } else if msg.topic == self.brightness_topics.command.as_str() {
            self.on_brightness_command(msg.payload, link)
        } else if msg.topic == self.color_topics.command.as_str() {
            self.on_color_command(msg.payload, link)
        } else {
            MessageOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BufferedOutbox;

    type Link = BufferedOutbox<8, 128, 1536>;

    fn ignore_color(_light: &mut RgbLight<'_>, _link: &mut dyn Transport, _transition: Transition<[u8; 3]>) {}

    #[test]
    fn defaults_are_on_full_white() {
        let device = Device::new("dev1", "Device");
        let light = RgbLight::new(&device, "Strip", "strip").unwrap();
        assert_eq!(light.switch(), Some(OnOff::On));
        assert_eq!(light.brightness(), Some(255));
        assert_eq!(light.color(), Some([255, 255, 255]));
        assert_eq!(light.get_state_color().unwrap().payload.as_str(), "255,255,255");
    }

    #[test]
    fn out_of_range_brightness_keeps_default() {
        let device = Device::new("dev1", "Device");
        let mut light =
            RgbLight::with_settings(&device, "Strip", "strip", LightSettings::new(0, 100)).unwrap();

        assert_eq!(
            light.set_state_brightness(150),
            Err(Error::InvalidState(InvalidState::BrightnessOutOfRange {
                value: 150,
                min: 0,
                max: 100
            }))
        );
        assert_eq!(light.brightness(), Some(100));
        assert!(light.set_state_brightness(-1).is_err());
        assert_eq!(light.brightness(), Some(100));
    }

    #[test]
    fn color_validation_checks_length_and_range() {
        let device = Device::new("dev1", "Device");
        let mut light = RgbwLight::new(&device, "Lamp", "lamp").unwrap();

        assert_eq!(
            light.set_state_color(&[1, 2, 3]),
            Err(Error::InvalidState(InvalidState::ColorChannelCount {
                expected: 4,
                actual: 3
            }))
        );
        assert_eq!(
            light.set_state_color(&[1, 2, 256, 4]),
            Err(Error::InvalidState(InvalidState::ColorChannelOutOfRange {
                index: 2,
                value: 256
            }))
        );
        assert_eq!(light.color(), Some([255; 4]));

        light.set_state_color(&[10, 20, 30, 40]).unwrap();
        let state = light.get_state_color().unwrap();
        assert_eq!(state.topic.as_str(), "homeassistant/light/dev1/lamp/state/rgbw");
        assert_eq!(state.payload.as_str(), "10,20,30,40");
    }

    #[test]
    fn unset_settings_fail_every_getter() {
        let device = Device::new("dev1", "Device");
        let light =
            RgbLight::with_settings(&device, "Strip", "strip", LightSettings::unset(0, 255)).unwrap();
        assert_eq!(light.get_state_switch(), Err(Error::StateNotSet));
        assert_eq!(light.get_state_brightness(), Err(Error::StateNotSet));
        assert_eq!(light.get_state_color(), Err(Error::StateNotSet));
    }

    #[test]
    fn rgb_config_advertises_sub_topics() {
        let device = Device::new("dev1", "Device");
        let light = RgbLight::new(&device, "Strip", "strip").unwrap();
        let config = light.get_config().unwrap();
        let payload = config.payload_str();

        assert!(payload.contains(r#""state_topic":"homeassistant/light/dev1/strip/state/switch""#));
        assert!(payload.contains(r#""command_topic":"homeassistant/light/dev1/strip/command/switch""#));
        assert!(payload.contains(r#""brightness":true"#));
        assert!(payload.contains(r#""brightness_scale":255"#));
        assert!(payload.contains(r#""rgb_command_topic":"homeassistant/light/dev1/strip/command/rgb""#));
        assert!(!payload.contains("supported_color_modes"));
        assert_eq!(config, light.get_config().unwrap());
    }

    #[test]
    fn rgbw_config_advertises_color_mode() {
        let device = Device::new("dev1", "Device");
        let light = RgbwLight::new(&device, "Lamp", "lamp").unwrap();
        let config = light.get_config().unwrap();
        let payload = config.payload_str();

        assert!(payload.contains(r#""rgbw_state_topic":"homeassistant/light/dev1/lamp/state/rgbw""#));
        assert!(payload.contains(r#""supported_color_modes":["rgbw"]"#));
        assert!(!payload.contains("rgb_state_topic"));
    }

    #[test]
    fn wildcard_subscription_is_registered_once() {
        let device = Device::new("dev1", "Device");
        let mut light = RgbLight::new(&device, "Strip", "strip").unwrap();
        let mut link = Link::new();

        light.publish_config(&mut link);
        light.publish_config(&mut link);

        assert_eq!(link.subscribe_calls(), 1);
        assert!(link.subscriptions().contains("homeassistant/light/dev1/strip/command/#"));
    }

    #[test]
    fn sub_states_are_throttled_independently() {
        let device = Device::new("dev1", "Device");
        let mut light = RgbLight::new(&device, "Strip", "strip")
            .unwrap()
            .with_throttle(Duration::from_secs(60));
        let mut link = Link::new();

        assert_eq!(light.publish_states(&mut link), 3);
        assert_eq!(light.publish_states(&mut link), 0);
        assert_eq!(link.len(), 3);
    }

    #[test]
    fn commands_are_routed_by_sub_topic() {
        let device = Device::new("dev1", "Device");
        let mut light = RgbLight::new(&device, "Strip", "strip").unwrap();
        let mut link = Link::new();

        let off = Publish::new("homeassistant/light/dev1/strip/command/switch", b"OFF");
        assert_eq!(light.on_message(&off, &mut link), MessageOutcome::Handled);
        assert_eq!(light.switch(), Some(OnOff::Off));

        let dim = Publish::new("homeassistant/light/dev1/strip/command/brightness", b"42");
        assert_eq!(light.on_message(&dim, &mut link), MessageOutcome::Handled);
        assert_eq!(light.brightness(), Some(42));

        let red = Publish::new("homeassistant/light/dev1/strip/command/rgb", b"255, 0 ,0");
        assert_eq!(light.on_message(&red, &mut link), MessageOutcome::Handled);
        assert_eq!(light.color(), Some([255, 0, 0]));

        assert_eq!(link.len(), 3);
        assert_eq!(link.requests()[2].topic.as_str(), "homeassistant/light/dev1/strip/state/rgb");
        assert_eq!(link.requests()[2].payload_str(), Some("255,0,0"));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        let device = Device::new("dev1", "Device");
        let mut light =
            RgbLight::with_settings(&device, "Strip", "strip", LightSettings::new(0, 100)).unwrap();
        let mut link = Link::new();

        let cases: [(&str, &[u8]); 4] = [
            ("homeassistant/light/dev1/strip/command/brightness", b"bright"),
            ("homeassistant/light/dev1/strip/command/brightness", b"150"),
            ("homeassistant/light/dev1/strip/command/rgb", b"1,2"),
            ("homeassistant/light/dev1/strip/command/rgb", b"1,2,x"),
        ];
        for (topic, payload) in cases {
            let msg = Publish::new(topic, payload);
            assert_eq!(light.on_message(&msg, &mut link), MessageOutcome::Rejected);
        }

        assert_eq!(light.brightness(), Some(100));
        assert_eq!(light.color(), Some([255, 255, 255]));
        assert!(link.is_empty());
    }

    #[test]
    fn custom_callback_can_ignore_commands() {
        let device = Device::new("dev1", "Device");
        let mut light = RgbLight::new(&device, "Strip", "strip")
            .unwrap()
            .with_color_callback(ignore_color);
        let mut link = Link::new();

        let msg = Publish::new("homeassistant/light/dev1/strip/command/rgb", b"0,0,0");
        assert_eq!(light.on_message(&msg, &mut link), MessageOutcome::Handled);
        assert_eq!(light.color(), Some([255, 255, 255]));

        let other = Publish::new("homeassistant/light/dev1/strip/command/effect", b"rainbow");
        assert_eq!(light.on_message(&other, &mut link), MessageOutcome::Ignored);
    }
}
