//! [Sensor](https://www.home-assistant.io/integrations/sensor.mqtt/):
//! a read-only measurement.

use core::fmt;

use heapless::String;

use crate::component::{
    Component, ComponentConfig, ComponentKind, ComponentState, EntityBase, StatefulComponent,
    render_state,
};
use crate::device::Device;
use crate::error::{Error, InvalidState};
use crate::runtime::Transport;
use crate::throttle::Throttle;

pub const MAX_SENSOR_TEXT_LEN: usize = 255;

/// A sensor reading as it appears on the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorValue {
    Integer(i64),
    Float(f64),
    Text(String<MAX_SENSOR_TEXT_LEN>),
}

impl SensorValue {
    /// Copies `value` into a text reading.
    pub fn text(value: &str) -> Result<Self, Error> {
        let mut text = String::new();
        text.push_str(value).map_err(|_| Error::Capacity)?;
        Ok(SensorValue::Text(text))
    }
}

impl From<i64> for SensorValue {
    fn from(value: i64) -> Self {
        SensorValue::Integer(value)
    }
}

impl From<i32> for SensorValue {
    fn from(value: i32) -> Self {
        SensorValue::Integer(i64::from(value))
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        SensorValue::Float(value)
    }
}

impl From<f32> for SensorValue {
    fn from(value: f32) -> Self {
        SensorValue::Float(f64::from(value))
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::Integer(value) => write!(f, "{value}"),
            SensorValue::Float(value) => write!(f, "{value}"),
            SensorValue::Text(value) => f.write_str(value),
        }
    }
}

/// A read-only measurement: integer, float or text.
pub struct Sensor<'d> {
    base: EntityBase<'d>,
    device_class: Option<&'d str>,
    state_class: Option<&'d str>,
    unit_of_measurement: Option<&'d str>,
    suggested_display_precision: Option<u8>,
    state: Option<SensorValue>,
    throttle: Throttle,
}

impl<'d> Sensor<'d> {
    pub fn new(device: &'d Device<'d>, name: &str, uid: &str) -> Result<Self, Error> {
        Ok(Self {
            base: EntityBase::new(device, ComponentKind::Sensor, name, uid)?,
            device_class: None,
            state_class: None,
            unit_of_measurement: None,
            suggested_display_precision: None,
            state: None,
            throttle: Throttle::default(),
        })
    }

    pub fn with_device_class(mut self, device_class: &'d str) -> Self {
        self.device_class = Some(device_class);
        self
    }

    /// e.g. `measurement`, `total_increasing`.
    pub fn with_state_class(mut self, state_class: &'d str) -> Self {
        self.state_class = Some(state_class);
        self
    }

    pub fn with_unit(mut self, unit: &'d str) -> Self {
        self.unit_of_measurement = Some(unit);
        self
    }

    /// Number of decimals Home Assistant should display.
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.suggested_display_precision = Some(precision);
        self
    }
}

impl<'d> Component<'d> for Sensor<'d> {
    fn base(&self) -> &EntityBase<'d> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase<'d> {
        &mut self.base
    }

    fn get_config(&self) -> Result<ComponentConfig, Error> {
        let mut payload = self.base.discovery();
        payload.device_class = self.device_class;
        payload.state_class = self.state_class;
        payload.unit_of_measurement = self.unit_of_measurement;
        payload.suggested_display_precision = self.suggested_display_precision;
        self.base.render_config(&payload)
    }

    fn publish_states(&mut self, link: &mut dyn Transport) -> usize {
        usize::from(self.publish_state(link))
    }
}

impl<'d> StatefulComponent<'d> for Sensor<'d> {
    type State = SensorValue;

    fn validate_state(&self, candidate: &SensorValue) -> Result<(), InvalidState> {
        match candidate {
            SensorValue::Float(value) if !value.is_finite() => Err(InvalidState::NotFinite),
            _ => Ok(()),
        }
    }

    fn state(&self) -> Option<&SensorValue> {
        self.state.as_ref()
    }

    fn set_state(&mut self, candidate: SensorValue) -> Result<(), Error> {
        self.validate_state(&candidate)?;
        debug!("Set state {} for {}", candidate, self.base.uid());
        self.state = Some(candidate);
        Ok(())
    }

    fn get_state(&self) -> Result<ComponentState, Error> {
        let state = self.state.as_ref().ok_or(Error::StateNotSet)?;
        render_state(self.base.state_topic(), state)
    }

    fn parts(&mut self) -> (&EntityBase<'d>, &mut Throttle) {
        (&self.base, &mut self.throttle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::BufferedOutbox;

    #[test]
    fn renders_each_value_kind() {
        let device = Device::new("dev1", "Device");
        let mut sensor = Sensor::new(&device, "Uptime", "uptime").unwrap();

        sensor.set_state(SensorValue::from(42_i64)).unwrap();
        assert_eq!(sensor.get_state().unwrap().payload.as_str(), "42");

        sensor.set_state(SensorValue::from(21.5_f64)).unwrap();
        assert_eq!(sensor.get_state().unwrap().payload.as_str(), "21.5");

        sensor.set_state(SensorValue::text("idle").unwrap()).unwrap();
        assert_eq!(sensor.get_state().unwrap().payload.as_str(), "idle");
    }

    #[test]
    fn non_finite_reading_keeps_previous_state() {
        let device = Device::new("dev1", "Device");
        let mut sensor = Sensor::new(&device, "Load", "load").unwrap();
        sensor.set_state(SensorValue::from(0.5_f64)).unwrap();

        assert_eq!(
            sensor.set_state(SensorValue::Float(f64::NAN)),
            Err(Error::InvalidState(InvalidState::NotFinite))
        );
        assert_eq!(sensor.state(), Some(&SensorValue::Float(0.5)));
    }

    #[test]
    fn config_includes_measurement_metadata() {
        let device = Device::new("dev1", "Device");
        let sensor = Sensor::new(&device, "Temperature", "temp")
            .unwrap()
            .with_device_class("temperature")
            .with_state_class("measurement")
            .with_unit("°C")
            .with_precision(1);

        let config = sensor.get_config().unwrap();
        let payload = config.payload_str();
        assert!(payload.contains(r#""device_class":"temperature""#));
        assert!(payload.contains(r#""state_class":"measurement""#));
        assert!(payload.contains(r#""unit_of_measurement":"°C""#));
        assert!(payload.contains(r#""suggested_display_precision":1"#));
        assert!(!payload.contains("command_topic"));
    }

    #[test]
    fn publish_sends_config_then_state() {
        let device = Device::new("dev1", "Device");
        let mut sensor = Sensor::new(&device, "Uptime", "uptime").unwrap();
        sensor.set_state(SensorValue::from(7_i64)).unwrap();
        let mut link = BufferedOutbox::<4, 128, 1536>::new();

        assert!(sensor.publish(&mut link));
        assert_eq!(link.requests()[0].topic.as_str(), "homeassistant/sensor/dev1/uptime/config");
        assert_eq!(link.requests()[1].payload_str(), Some("7"));
    }
}
