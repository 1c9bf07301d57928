//! Host temperature probes published as sensors.
//!
//! Probe names are enumerated once, at construction; each name becomes a
//! [`Sensor`] publishing the median of all readings sharing that name.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::component::sensor::{Sensor, SensorValue};
use crate::component::{Component, MAX_NAME_LEN, Name, StatefulComponent};
use crate::device::Device;
use crate::error::Error;
use crate::runtime::Transport;
use crate::topic::slugify;

/// Maximum length of a probe (chip) name.
pub const MAX_PROBE_NAME_LEN: usize = 32;
/// Readings kept per probe name and poll; extra readings are dropped.
pub const MAX_READINGS: usize = 16;

pub type ProbeName = String<MAX_PROBE_NAME_LEN>;

/// A source of temperature readings in °C.
pub trait TemperatureProbes {
    /// Calls `visit` once per reading. Several readings may share a name,
    /// e.g. one per core of a CPU package.
    fn for_each_reading(&mut self, visit: &mut dyn FnMut(&str, f64));
}

/// Readings from a fixed list, for boards with known sensors.
impl TemperatureProbes for &[(&str, f64)] {
    fn for_each_reading(&mut self, visit: &mut dyn FnMut(&str, f64)) {
        for &(name, value) in self.iter() {
            visit(name, value);
        }
    }
}

/// Median of `values`, the mean of the two middle values for an even count.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

struct Probe<'d> {
    name: ProbeName,
    sensor: Sensor<'d>,
    readings: Vec<f64, MAX_READINGS>,
}

/// One temperature sensor per probe name, at most `N`.
pub struct TemperatureSensors<'d, const N: usize> {
    probes: Vec<Probe<'d>, N>,
}

impl<'d, const N: usize> TemperatureSensors<'d, N> {
    /// Polls `source` once and creates a sensor for every distinct probe name.
    ///
    /// Names that do not fit (too long, or more than `N` of them) are logged
    /// and skipped.
    pub fn new(device: &'d Device<'d>, source: &mut dyn TemperatureProbes) -> Self {
        let mut probes: Vec<Probe<'d>, N> = Vec::new();

        source.for_each_reading(&mut |name, _| {
            if probes.iter().any(|p| p.name == name) {
                return;
            }
            match create_probe(device, name) {
                Ok(probe) => {
                    info!("Creating temperature sensor: {}", name);
                    if probes.push(probe).is_err() {
                        warn!("No room for temperature sensor {}", name);
                    }
                }
                Err(err) => warn!("Temperature sensor {} not created: {}", name, err),
            }
        });

        Self { probes }
    }

    /// Re-polls `source`, sets each sensor to the median of its readings and
    /// publishes config and state. Returns the number of state publishes.
    ///
    /// Probe names that were not seen at construction are ignored.
    pub fn publish(&mut self, source: &mut dyn TemperatureProbes, link: &mut dyn Transport) -> usize {
        if self.probes.is_empty() {
            return 0;
        }

        for probe in self.probes.iter_mut() {
            probe.readings.clear();
        }
        let probes = &mut self.probes;
        source.for_each_reading(&mut |name, value| {
            let Some(probe) = probes.iter_mut().find(|p| p.name == name) else {
                trace!("Ignoring unknown temperature probe {}", name);
                return;
            };
            if probe.readings.push(value).is_err() {
                trace!("Too many readings for {}", name);
            }
        });

        let mut published = 0;
        for probe in self.probes.iter_mut() {
            let Some(value) = median(&mut probe.readings) else {
                continue;
            };
            if let Err(err) = probe.sensor.set_state(SensorValue::Float(value)) {
                warn!("Temperature of {} not set: {}", probe.name.as_str(), err);
                continue;
            }
            published += usize::from(probe.sensor.publish(link));
        }
        published
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// The sensor created for `probe`, if any.
    pub fn sensor(&self, probe: &str) -> Option<&Sensor<'d>> {
        self.probes.iter().find(|p| p.name == probe).map(|p| &p.sensor)
    }

    /// All sensors, e.g. to attach them to a `ComponentRegistry`.
    pub fn sensors_mut(&mut self) -> impl Iterator<Item = &mut Sensor<'d>> {
        self.probes.iter_mut().map(|p| &mut p.sensor)
    }
}

fn create_probe<'d>(device: &'d Device<'d>, probe: &str) -> Result<Probe<'d>, Error> {
    let mut name = ProbeName::new();
    name.push_str(probe).map_err(|_| Error::Capacity)?;

    let mut label = Name::new();
    write!(label, "Temperature {probe}").map_err(|_| Error::Capacity)?;
    let mut raw_uid = String::<{ MAX_NAME_LEN * 2 }>::new();
    write!(raw_uid, "temperature_{probe}").map_err(|_| Error::Capacity)?;
    let uid: Name = slugify(&raw_uid);

    let sensor = Sensor::new(device, &label, &uid)?
        .with_device_class("temperature")
        .with_state_class("measurement")
        .with_unit("°C")
        .with_precision(0);
    debug!("Temperature probe {} has uid {}", probe, sensor.uid());

    Ok(Probe {
        name,
        sensor,
        readings: Vec::new(),
    })
}

#[cfg(feature = "std")]
pub use hwmon::HwmonProbes;

#[cfg(feature = "std")]
mod hwmon {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::TemperatureProbes;

    const HWMON_ROOT: &str = "/sys/class/hwmon";

    /// Reads the Linux hwmon sysfs tree: every `hwmonN/name` is a probe name,
    /// every `hwmonN/temp*_input` a reading in millidegrees.
    ///
    /// On hosts without the tree no readings are produced.
    #[derive(Debug, Clone)]
    pub struct HwmonProbes {
        root: PathBuf,
    }

    impl HwmonProbes {
        pub fn new() -> Self {
            Self::with_root(HWMON_ROOT)
        }

        /// Reads from a different sysfs root.
        pub fn with_root(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    impl Default for HwmonProbes {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TemperatureProbes for HwmonProbes {
        fn for_each_reading(&mut self, visit: &mut dyn FnMut(&str, f64)) {
            let Ok(chips) = fs::read_dir(&self.root) else {
                debug!("Temperature sensors not available");
                return;
            };

            for chip in chips.flatten() {
                let path = chip.path();
                let Ok(name) = fs::read_to_string(path.join("name")) else {
                    continue;
                };
                let Ok(entries) = fs::read_dir(&path) else {
                    continue;
                };
                for entry in entries.flatten() {
                    if let Some(value) = read_input(&entry.path()) {
                        visit(name.trim(), value);
                    }
                }
            }
        }
    }

    fn read_input(path: &Path) -> Option<f64> {
        let file_name = path.file_name()?.to_str()?;
        if !(file_name.starts_with("temp") && file_name.ends_with("_input")) {
            return None;
        }
        let millidegrees: i64 = fs::read_to_string(path).ok()?.trim().parse().ok()?;
        Some(millidegrees as f64 / 1000.0)
    }
}
