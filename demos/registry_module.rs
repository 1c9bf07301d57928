//! Example: Driving a set of components through a `ComponentRegistry`
//!
//! A relay, an RGB strip and a temperature sensor share one device. The
//! registry announces them, publishes their states and routes incoming
//! commands back to the owning component. A `BufferedOutbox` stands in for
//! the MQTT client: everything it collects is printed instead of sent.
//!
//! # Key Concepts
//!
//! - Build components against a shared `Device`
//! - `attach()` them to a registry sized for the device
//! - `publish_configs()` once after connecting; command topics are
//!   subscribed on the first call only
//! - `dispatch()` every received message, then drain the outbox
//!
//! Run with `cargo run --example registry_module`.

use myrtio_ha_components::component::light::RgbLight;
use myrtio_ha_components::component::sensor::Sensor;
use myrtio_ha_components::component::switch::Switch;
use myrtio_ha_components::runtime::{BufferedOutbox, ComponentRegistry};
use myrtio_ha_components::{Device, Error, OnOff, Publish, StatefulComponent};

type Outbox = BufferedOutbox<16, 128, 1536>;

fn main() -> Result<(), Error> {
    let device = Device::builder()
        .id("myrtio_board_0A1B")
        .name("Board")
        .manufacturer(Some("MyrtIO"))
        .build();

    let mut relay = Switch::new(&device, "Relay", "relay")?.with_state(OnOff::Off);
    let mut strip = RgbLight::new(&device, "Strip", "strip")?;
    let mut uptime = Sensor::new(&device, "Uptime", "uptime")?.with_unit("s");
    uptime.set_state(42_i64.into())?;

    let mut outbox = Outbox::new();
    let mut registry = ComponentRegistry::<4>::new();
    registry.attach(&mut relay)?;
    registry.attach(&mut strip)?;
    registry.attach(&mut uptime)?;

    registry.publish_configs(&mut outbox);
    registry.publish_states(&mut outbox);
    flush("startup", &mut outbox);

    // Messages as the client would hand them over after subscribing
    let inbox = [
        Publish::new("homeassistant/switch/myrtio_board_0A1B/relay/command", b"ON"),
        Publish::new("homeassistant/light/myrtio_board_0A1B/strip/command/brightness", b"80"),
        Publish::new("homeassistant/light/myrtio_board_0A1B/strip/command/rgb", b"255,0,300"),
    ];
    for msg in &inbox {
        let outcome = registry.dispatch(msg, &mut outbox);
        println!("{} -> {:?}", msg.topic, outcome);
    }
    flush("commands", &mut outbox);

    Ok(())
}

fn flush(stage: &str, outbox: &mut Outbox) {
    println!("== {stage}");
    for topic in outbox.subscriptions().iter() {
        println!("SUB {topic}");
    }
    for request in outbox.drain() {
        println!("PUB {} {}", request.topic, request.payload_str().unwrap_or("<binary>"));
    }
}
