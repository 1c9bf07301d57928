//! Device descriptor shared by all components attached to it.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::topic::DEFAULT_DISCOVERY_PREFIX;

/// A physical or logical device as Home Assistant sees it.
///
/// Components borrow the device; it is never mutated after construction.
///
/// ```ignore
/// let device = Device::builder()
///     .id("myrtio_light_0A1B")
///     .name("Desk Lamp")
///     .manufacturer(Some("MyrtIO"))
///     .build();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device<'a> {
    pub id: &'a str,
    pub name: &'a str,
    /// Extra identifiers. When empty, `[id]` is advertised.
    pub identifiers: &'a [&'a str],
    pub manufacturer: Option<&'a str>,
    pub model: Option<&'a str>,
    pub sw_version: Option<&'a str>,
    pub discovery_prefix: &'a str,
}

impl<'a> Device<'a> {
    pub fn new(id: &'a str, name: &'a str) -> Self {
        Self {
            id,
            name,
            identifiers: &[],
            manufacturer: None,
            model: None,
            sw_version: None,
            discovery_prefix: DEFAULT_DISCOVERY_PREFIX,
        }
    }

    pub fn builder() -> DeviceBuilder<'a> {
        DeviceBuilder::default()
    }
}

/// Builder for [`Device`].
#[derive(Default)]
pub struct DeviceBuilder<'a> {
    id: &'a str,
    name: &'a str,
    identifiers: &'a [&'a str],
    manufacturer: Option<&'a str>,
    model: Option<&'a str>,
    sw_version: Option<&'a str>,
    discovery_prefix: Option<&'a str>,
}

impl<'a> DeviceBuilder<'a> {
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = id;
        self
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = name;
        self
    }

    pub fn identifiers(mut self, identifiers: &'a [&'a str]) -> Self {
        self.identifiers = identifiers;
        self
    }

    pub fn manufacturer(mut self, manufacturer: Option<&'a str>) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    pub fn model(mut self, model: Option<&'a str>) -> Self {
        self.model = model;
        self
    }

    pub fn sw_version(mut self, sw_version: Option<&'a str>) -> Self {
        self.sw_version = sw_version;
        self
    }

    pub fn discovery_prefix(mut self, prefix: &'a str) -> Self {
        self.discovery_prefix = Some(prefix);
        self
    }

    pub fn build(self) -> Device<'a> {
        Device {
            id: self.id,
            name: self.name,
            identifiers: self.identifiers,
            manufacturer: self.manufacturer,
            model: self.model,
            sw_version: self.sw_version,
            discovery_prefix: self.discovery_prefix.unwrap_or(DEFAULT_DISCOVERY_PREFIX),
        }
    }
}

/// Renders the `device` fragment of a discovery payload.
impl Serialize for Device<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let optional = [self.manufacturer, self.model, self.sw_version]
            .iter()
            .filter(|field| field.is_some())
            .count();
        let mut state = serializer.serialize_struct("Device", 2 + optional)?;
        state.serialize_field("name", self.name)?;
        if self.identifiers.is_empty() {
            state.serialize_field("identifiers", &[self.id])?;
        } else {
            state.serialize_field("identifiers", self.identifiers)?;
        }
        if let Some(manufacturer) = self.manufacturer {
            state.serialize_field("manufacturer", manufacturer)?;
        }
        if let Some(model) = self.model {
            state.serialize_field("model", model)?;
        }
        if let Some(sw_version) = self.sw_version {
            state.serialize_field("sw_version", sw_version)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(device: &Device<'_>) -> heapless::String<256> {
        let mut buf = [0u8; 256];
        let len = serde_json_core::to_slice(device, &mut buf).unwrap();
        let mut out = heapless::String::new();
        out.push_str(core::str::from_utf8(&buf[..len]).unwrap()).unwrap();
        out
    }

    #[test]
    fn identifiers_default_to_id() {
        let device = Device::new("dev1", "Device One");
        assert_eq!(
            render(&device).as_str(),
            r#"{"name":"Device One","identifiers":["dev1"]}"#
        );
    }

    #[test]
    fn builder_sets_optional_metadata() {
        let ids = ["dev1", "mac:00:11"];
        let device = Device::builder()
            .id("dev1")
            .name("Lamp")
            .identifiers(&ids)
            .manufacturer(Some("MyrtIO"))
            .model(Some("Light"))
            .sw_version(Some("1.2.0"))
            .build();

        assert_eq!(device.discovery_prefix, "homeassistant");
        assert_eq!(
            render(&device).as_str(),
            r#"{"name":"Lamp","identifiers":["dev1","mac:00:11"],"manufacturer":"MyrtIO","model":"Light","sw_version":"1.2.0"}"#
        );
    }

    #[test]
    fn custom_discovery_prefix() {
        let device = Device::builder()
            .id("dev1")
            .name("Lamp")
            .discovery_prefix("ha")
            .build();
        assert_eq!(device.discovery_prefix, "ha");
    }
}
