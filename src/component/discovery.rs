//! Discovery payload schema.

use serde::Serialize;

use crate::device::Device;

/// The subset of the Home Assistant MQTT discovery schema this crate emits.
///
/// Optional keys are omitted from the JSON when unset, so a component only
/// advertises what applies to its kind.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryPayload<'p> {
    /// Component kind, e.g. `switch`.
    pub component: &'p str,
    /// The device the entity belongs to.
    pub device: &'p Device<'p>,
    /// Display name.
    pub name: &'p str,
    /// Unique id within the device.
    pub unique_id: &'p str,
    /// Home Assistant device class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'p str>,
    /// Literal meaning off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_off: Option<&'p str>,
    /// Literal meaning on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_on: Option<&'p str>,
    /// Topic the state is published to.
    pub state_topic: &'p str,
    /// Topic Home Assistant sends commands to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_topic: Option<&'p str>,
    /// Topic for extra JSON attributes.
    pub json_attributes_topic: &'p str,
    /// Entity platform, the same value as `component`.
    pub platform: &'p str,

    // light
    /// Whether the light is dimmable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<bool>,
    /// Brightness value meaning 100%.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_scale: Option<u8>,
    /// Topic the brightness is published to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_state_topic: Option<&'p str>,
    /// Topic brightness commands arrive on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_command_topic: Option<&'p str>,
    /// Topic the RGB colour is published to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_state_topic: Option<&'p str>,
    /// Topic RGB commands arrive on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_command_topic: Option<&'p str>,
    /// Topic the RGBW colour is published to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgbw_state_topic: Option<&'p str>,
    /// Topic RGBW commands arrive on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgbw_command_topic: Option<&'p str>,
    /// Colour modes the light accepts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_color_modes: Option<&'p [&'p str]>,

    // text
    /// Text input mode, `text` or `password`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'p str>,
    /// Minimum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    // sensor
    /// Unit of the sensor value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'p str>,
    /// Sensor state class, e.g. `measurement`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<&'p str>,
    /// Decimal places shown in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_display_precision: Option<u8>,
}

impl<'p> DiscoveryPayload<'p> {
    pub(crate) fn new(
        kind: &'p str,
        device: &'p Device<'p>,
        name: &'p str,
        unique_id: &'p str,
        state_topic: &'p str,
        json_attributes_topic: &'p str,
    ) -> Self {
        Self {
            component: kind,
            device,
            name,
            unique_id,
            device_class: None,
            payload_off: None,
            payload_on: None,
            state_topic,
            command_topic: None,
            json_attributes_topic,
            platform: kind,
            brightness: None,
            brightness_scale: None,
            brightness_state_topic: None,
            brightness_command_topic: None,
            rgb_state_topic: None,
            rgb_command_topic: None,
            rgbw_state_topic: None,
            rgbw_command_topic: None,
            supported_color_modes: None,
            mode: None,
            min: None,
            max: None,
            unit_of_measurement: None,
            state_class: None,
            suggested_display_precision: None,
        }
    }
}
