//! Routing of incoming messages to the components that own them.

use heapless::Vec;

use super::traits::Transport;
use crate::component::{Component, MessageOutcome};
use crate::error::Error;
use crate::packet::Publish;

/// A fixed-capacity set of components sharing one transport.
///
/// The registry borrows its components, so callers keep typed access to
/// them (e.g. to feed sensor readings) between calls into the registry.
///
/// # Example
///
/// ```ignore
/// let mut registry = ComponentRegistry::<4>::new();
/// registry.attach(&mut relay)?;
/// registry.attach(&mut strip)?;
/// registry.publish_configs(&mut link);
///
/// // For every message received from the client
/// registry.dispatch(&Publish::new(topic, payload), &mut link);
/// ```
pub struct ComponentRegistry<'r, 'd, const N: usize> {
    components: Vec<&'r mut dyn Component<'d>, N>,
}

impl<'r, 'd, const N: usize> ComponentRegistry<'r, 'd, N> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Adds a component. Fails with [`Error::Capacity`] when full.
    ///
    /// Duplicate uids are accepted but logged, since Home Assistant would
    /// merge the two entities.
    pub fn attach(&mut self, component: &'r mut dyn Component<'d>) -> Result<(), Error> {
        let duplicate = self
            .components
            .iter()
            .any(|c| c.kind() == component.kind() && c.uid() == component.uid());
        if duplicate {
            warn!("Duplicate component uid {}", component.uid());
        }
        self.components.push(component).map_err(|_| Error::Capacity)
    }

    /// Publishes the discovery config of every component. Returns the number
    /// of configs accepted by the transport.
    pub fn publish_configs(&mut self, link: &mut dyn Transport) -> usize {
        self.components
            .iter_mut()
            .map(|c| usize::from(c.publish_config(link)))
            .sum()
    }

    /// Publishes every state that is set and not throttled.
    pub fn publish_states(&mut self, link: &mut dyn Transport) -> usize {
        self.components
            .iter_mut()
            .map(|c| c.publish_states(link))
            .sum()
    }

    /// Hands `msg` to the first component that claims its topic.
    pub fn dispatch(&mut self, msg: &Publish<'_>, link: &mut dyn Transport) -> MessageOutcome {
        for component in self.components.iter_mut() {
            let outcome = component.on_message(msg, link);
            if outcome != MessageOutcome::Ignored {
                return outcome;
            }
        }
        trace!("No component handles {}", msg.topic);
        MessageOutcome::Ignored
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<const N: usize> Default for ComponentRegistry<'_, '_, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::StatefulComponent;
    use crate::component::OnOff;
    use crate::component::binary_sensor::BinarySensor;
    use crate::component::switch::Switch;
    use crate::device::Device;
    use crate::runtime::BufferedOutbox;

    #[test]
    fn routes_command_to_owner_only() {
        let device = Device::new("dev1", "Device");
        let mut first = Switch::new(&device, "First", "first").unwrap();
        let mut second = Switch::new(&device, "Second", "second").unwrap();
        let mut link = BufferedOutbox::<8, 128, 1536>::new();

        {
            let mut registry = ComponentRegistry::<2>::new();
            registry.attach(&mut first).unwrap();
            registry.attach(&mut second).unwrap();
            assert_eq!(registry.publish_configs(&mut link), 2);

            let msg = Publish::new("homeassistant/switch/dev1/second/command", b"ON");
            assert_eq!(registry.dispatch(&msg, &mut link), MessageOutcome::Handled);

            let msg = Publish::new("homeassistant/switch/dev1/third/command", b"ON");
            assert_eq!(registry.dispatch(&msg, &mut link), MessageOutcome::Ignored);
        }

        assert_eq!(first.state(), None);
        assert_eq!(second.state(), Some(&OnOff::On));
        assert_eq!(link.subscriptions().len(), 2);
    }

    #[test]
    fn full_registry_rejects_attach() {
        let device = Device::new("dev1", "Device");
        let mut door = BinarySensor::new(&device, "Door", "door").unwrap();
        let mut window = BinarySensor::new(&device, "Window", "window").unwrap();

        let mut registry = ComponentRegistry::<1>::new();
        registry.attach(&mut door).unwrap();
        assert_eq!(registry.attach(&mut window), Err(Error::Capacity));
        assert_eq!(registry.len(), 1);
    }
}
