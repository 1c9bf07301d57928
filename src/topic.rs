//! Topic layout shared by every component.
//!
//! All topics of a component live below its prefix:
//!
//! ```text
//! <discovery-prefix>/<kind>/<device-id>/<uid>/config
//! <discovery-prefix>/<kind>/<device-id>/<uid>/state[/<sub-state>]
//! <discovery-prefix>/<kind>/<device-id>/<uid>/command[/<sub-state>]
//! <discovery-prefix>/<kind>/<device-id>/<uid>/attributes
//! ```

use core::fmt::Write;

use heapless::String;

use crate::error::Error;
use crate::runtime::MAX_TOPIC_LEN;

/// Discovery prefix Home Assistant listens on unless reconfigured.
pub const DEFAULT_DISCOVERY_PREFIX: &str = "homeassistant";

/// An owned topic string.
pub type Topic = String<MAX_TOPIC_LEN>;

/// Builds `<discovery>/<kind>/<device>/<uid>`.
pub(crate) fn prefix(discovery: &str, kind: &str, device_id: &str, uid: &str) -> Result<Topic, Error> {
    let mut topic = Topic::new();
    write!(topic, "{discovery}/{kind}/{device_id}/{uid}").map_err(|_| Error::Capacity)?;
    Ok(topic)
}

/// Appends `/<suffix>` to `base`.
pub(crate) fn join(base: &str, suffix: &str) -> Result<Topic, Error> {
    let mut topic = Topic::new();
    write!(topic, "{base}/{suffix}").map_err(|_| Error::Capacity)?;
    Ok(topic)
}

/// Turns a free-form name into an identifier usable as uid and topic level.
///
/// ASCII letters are lowercased, digits kept, and every run of other
/// characters becomes a single `_`. Leading and trailing separators are
/// dropped. Output longer than `N` bytes is truncated.
pub fn slugify<const N: usize>(input: &str) -> String<N> {
    let mut out = String::new();
    let mut pending_sep = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() && out.push('_').is_err() {
                break;
            }
            pending_sep = false;
            if out.push(ch.to_ascii_lowercase()).is_err() {
                break;
            }
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_follows_discovery_layout() {
        let topic = prefix("homeassistant", "switch", "dev1", "relay1").unwrap();
        assert_eq!(topic.as_str(), "homeassistant/switch/dev1/relay1");
        let state = join(&topic, "state").unwrap();
        assert_eq!(state.as_str(), "homeassistant/switch/dev1/relay1/state");
    }

    #[test]
    fn overlong_topic_is_a_capacity_error() {
        let long = [b'a'; MAX_TOPIC_LEN];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(join(long, "state"), Err(Error::Capacity));
    }

    #[test]
    fn slugify_collapses_separators() {
        let slug: String<32> = slugify("temperature_Core 0 (Package)");
        assert_eq!(slug.as_str(), "temperature_core_0_package");

        let slug: String<32> = slugify("--acpitz--");
        assert_eq!(slug.as_str(), "acpitz");
    }

    #[test]
    fn slugify_truncates_to_capacity() {
        let slug: String<4> = slugify("nvme-pci-0100");
        assert_eq!(slug.as_str(), "nvme");
    }
}
