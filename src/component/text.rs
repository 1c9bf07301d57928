//! [Text](https://www.home-assistant.io/integrations/text.mqtt/):
//! a length-bounded string Home Assistant can edit.

use heapless::String;

use crate::component::{
    Component, ComponentConfig, ComponentKind, ComponentState, EntityBase, MessageOutcome,
    StatefulComponent, Transition, command, render_state,
};
use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::packet::Publish;
use crate::runtime::Transport;
use crate::throttle::Throttle;

/// Largest `max_length` Home Assistant accepts for text entities, in characters.
pub const MAX_TEXT_CHARS: usize = 255;
/// Storage for the longest text in the worst-case UTF-8 encoding.
pub const MAX_TEXT_BYTES: usize = MAX_TEXT_CHARS * 4;

/// Value published when no initial text was provided.
pub const PLACEHOLDER_TEXT: &str = "NO TEXT PROVIDED";

pub type TextValue = String<MAX_TEXT_BYTES>;

pub type TextCallback<'d> = fn(&mut Text<'d>, &mut dyn Transport, Transition<&str>);

/// Applies the command and publishes the new text.
pub fn default_text_callback(text: &mut Text<'_>, link: &mut dyn Transport, transition: Transition<&str>) {
    info!(
        "{} state changed: {} -> {}",
        text.base().name(),
        transition.old.unwrap_or("unset"),
        transition.new
    );
    if let Err(err) = text.set_text(transition.new) {
        error!("{} rejected command state: {}", text.base().uid(), err);
        return;
    }
    text.publish_state(link);
}

/// A text value with a length range, settable from Home Assistant.
pub struct Text<'d> {
    base: EntityBase<'d>,
    min_length: usize,
    max_length: usize,
    state: Option<TextValue>,
    throttle: Throttle,
    callback: TextCallback<'d>,
}

impl<'d> Text<'d> {
    /// Creates a text entity bounded to `0..=255` characters holding
    /// [`PLACEHOLDER_TEXT`].
    pub fn new(device: &'d Device<'d>, name: &str, uid: &str) -> Result<Self, Error> {
        Self::with_bounds(device, name, uid, 0, MAX_TEXT_CHARS)
    }

    /// Creates a text entity with custom length bounds (characters).
    /// `max_length` is capped at [`MAX_TEXT_CHARS`]. The placeholder is
    /// only used when it fits the bounds, otherwise the state starts unset.
    pub fn with_bounds(
        device: &'d Device<'d>,
        name: &str,
        uid: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<Self, Error> {
        let mut text = Self {
            base: EntityBase::new(device, ComponentKind::Text, name, uid)?,
            min_length,
            max_length: max_length.min(MAX_TEXT_CHARS),
            state: None,
            throttle: Throttle::default(),
            callback: default_text_callback,
        };
        if text.validate_text(PLACEHOLDER_TEXT).is_ok() {
            text.set_text(PLACEHOLDER_TEXT)?;
        }
        Ok(text)
    }

    /// Replaces the placeholder with an explicit initial value.
    pub fn with_text(mut self, initial: &str) -> Result<Self, Error> {
        self.set_text(initial)?;
        Ok(self)
    }

    pub fn with_callback(mut self, callback: TextCallback<'d>) -> Self {
        self.callback = callback;
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn text(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Length rule on a borrowed string, counted in characters.
    pub fn validate_text(&self, candidate: &str) -> Result<(), InvalidState> {
        let len = candidate.chars().count();
        if len < self.min_length {
            return Err(InvalidState::TextTooShort {
                len,
                min: self.min_length,
            });
        }
        if len > self.max_length {
            return Err(InvalidState::TextTooLong {
                len,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Validates and stores a borrowed string.
    pub fn set_text(&mut self, candidate: &str) -> Result<(), Error> {
        self.validate_text(candidate)?;
        let mut value = TextValue::new();
        value.push_str(candidate).map_err(|_| Error::Capacity)?;
        debug!("Set state {} for {}", candidate, self.base.uid());
        self.state = Some(value);
        Ok(())
    }
}

impl<'d> Component<'d> for Text<'d> {
    fn base(&self) -> &EntityBase<'d> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase<'d> {
        &mut self.base
    }

    fn get_config(&self) -> Result<ComponentConfig, Error> {
        let mut payload = self.base.discovery();
        payload.command_topic = Some(self.base.command_topic());
        payload.mode = Some("text");
        if self.min_length > 0 {
            payload.min = Some(self.min_length);
        }
        if self.max_length < MAX_TEXT_CHARS {
            payload.max = Some(self.max_length);
        }
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

        let new = match command::payload_str(msg.payload) {
            Ok(new) => new,
            Err(err) => {
                warn!("Invalid text command received for {}: {}", self.base.uid(), err);
                return MessageOutcome::Rejected;
            }
        };
        if let Err(err) = self.validate_text(new) {
            warn!("Invalid text command received for {}: {}", self.base.uid(), err);
            return MessageOutcome::Rejected;
        }

        // The callback may replace the state, so the old value is copied out
        let old = self.state.clone();
        let transition = Transition {
            old: old.as_deref(),
            new,
        };
        let callback = self.callback;
        callback(self, link, transition);
        MessageOutcome::Handled
    }
}

impl<'d> StatefulComponent<'d> for Text<'d> {
    type State = TextValue;

    fn validate_state(&self, candidate: &TextValue) -> Result<(), InvalidState> {
        self.validate_text(candidate)
    }

    fn state(&self) -> Option<&TextValue> {
        self.state.as_ref()
    }

    fn set_state(&mut self, candidate: TextValue) -> Result<(), Error> {
        self.validate_state(&candidate)?;
        debug!("Set state {} for {}", candidate.as_str(), self.base.uid());
        self.state = Some(candidate);
        Ok(())
    }

    fn get_state(&self) -> Result<ComponentState, Error> {
        let state = self.state.as_ref().ok_or(Error::StateNotSet)?;
        render_state(self.base.state_topic(), state.as_str())
    }

    fn parts(&mut self) -> (&EntityBase<'d>, &mut Throttle) {
        (&self.base, &mut self.throttle)
    }
}
