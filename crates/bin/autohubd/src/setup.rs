//! Wiring — turns a validated [`Config`] into a populated [`Controller`].
//!
//! Areas are created in the order they are first named by an entry. Every
//! roller shutter and lamp is backed by a virtual device.

use std::sync::Arc;

use anyhow::Context;

use autohub_adapter_virtual::{VirtualLamp, VirtualRollerShutter};
use autohub_app::automation::conditions::{all_of, night, time_range};
use autohub_app::automation::{ConditionalAutomation, ServiceContext};
use autohub_app::controller::Controller;
use autohub_domain::area::Area;
use autohub_domain::id::AreaId;
use autohub_domain::time::Timestamp;

use crate::config::Config;

/// A controller together with the devices it drives.
pub struct Installation {
    pub controller: Controller,
    pub shutters: Vec<Arc<VirtualRollerShutter>>,
    pub lamps: Vec<Arc<VirtualLamp>>,
}

/// Create areas, devices and automations described by `config`, activated
/// at `now`.
///
/// # Errors
///
/// Returns an error naming the entry that could not be set up.
pub fn build(
    config: &Config,
    context: ServiceContext,
    now: Timestamp,
) -> anyhow::Result<Installation> {
    let daylight = Arc::clone(&context.daylight);
    let mut controller = Controller::new(context);
    let mut areas: Vec<(String, AreaId)> = Vec::new();
    let mut shutters = Vec::with_capacity(config.roller_shutters.len());
    let mut lamps = Vec::with_capacity(config.lamps.len());

    for entry in &config.roller_shutters {
        let area_id = area_for(&mut controller, &mut areas, &entry.area)?;
        let settings = entry
            .to_config()
            .with_context(|| format!("roller shutter {:?}", entry.name))?;
        let shutter = Arc::new(VirtualRollerShutter::new(entry.name.clone()));
        controller
            .setup_roller_shutter(area_id, shutter.clone(), settings, now)
            .with_context(|| format!("registering roller shutter {:?}", entry.name))?;
        shutters.push(shutter);
    }

    for entry in &config.lamps {
        let area_id = area_for(&mut controller, &mut areas, &entry.area)?;
        let (on_after, off_after) = entry
            .window()
            .with_context(|| format!("lamp {:?}", entry.name))?;
        let window = time_range(on_after, off_after);
        let condition = if entry.only_at_night {
            all_of(vec![window, night(Arc::clone(&daylight))])
        } else {
            window
        };
        let lamp = Arc::new(VirtualLamp::new(entry.name.clone()));
        let builder = ConditionalAutomation::builder()
            .name(entry.name.clone())
            .condition(condition)
            .switch_actuator(lamp.clone());
        controller
            .setup_conditional(area_id, builder, now)
            .with_context(|| format!("registering lamp {:?}", entry.name))?;
        lamps.push(lamp);
    }

    Ok(Installation {
        controller,
        shutters,
        lamps,
    })
}

fn area_for(
    controller: &mut Controller,
    areas: &mut Vec<(String, AreaId)>,
    name: &str,
) -> anyhow::Result<AreaId> {
    if let Some((_, id)) = areas.iter().find(|(known, _)| known == name) {
        return Ok(*id);
    }
    let area = Area::builder()
        .name(name)
        .build()
        .with_context(|| format!("area {name:?}"))?;
    let id = controller.add_area(area)?;
    areas.push((name.to_string(), id));
    Ok(id)
}
