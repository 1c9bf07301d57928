//! [Binary sensor](https://www.home-assistant.io/integrations/binary_sensor.mqtt/):
//! a read-only `ON`/`OFF` value.

use crate::component::{
    Component, ComponentConfig, ComponentKind, ComponentState, EntityBase, OnOff,
    StatefulComponent, render_state,
};
use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::runtime::Transport;
use crate::throttle::Throttle;

/// A read-only `ON`/`OFF` entity.
pub struct BinarySensor<'d> {
    base: EntityBase<'d>,
    device_class: Option<&'d str>,
    state: Option<OnOff>,
    throttle: Throttle,
}

impl<'d> BinarySensor<'d> {
    /// Creates a sensor with no state; `set_state` must be called before publishing.
    pub fn new(device: &'d Device<'d>, name: &str, uid: &str) -> Result<Self, Error> {
        Ok(Self {
            base: EntityBase::new(device, ComponentKind::BinarySensor, name, uid)?,
            device_class: None,
            state: None,
            throttle: Throttle::default(),
        })
    }

    /// e.g. `door`, `motion`, see the Home Assistant device class list.
    pub fn with_device_class(mut self, device_class: &'d str) -> Self {
        self.device_class = Some(device_class);
        self
    }

    pub fn with_state(mut self, state: OnOff) -> Self {
        self.state = Some(state);
        self
    }

    /// `None` until a state is set.
    pub fn is_on(&self) -> Option<bool> {
        if self.state.is_none() {
            warn!("{} state not set, yet", self.base.uid());
        }
        self.state.map(OnOff::is_on)
    }
}

impl<'d> Component<'d> for BinarySensor<'d> {
    fn base(&self) -> &EntityBase<'d> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase<'d> {
        &mut self.base
    }

    fn get_config(&self) -> Result<ComponentConfig, Error> {
        let mut payload = self.base.discovery();
        payload.device_class = self.device_class;
        payload.payload_off = Some(OnOff::OFF);
        payload.payload_on = Some(OnOff::ON);
        self.base.render_config(&payload)
    }

    fn publish_states(&mut self, link: &mut dyn Transport) -> usize {
        usize::from(self.publish_state(link))
    }
}

impl<'d> StatefulComponent<'d> for BinarySensor<'d> {
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
