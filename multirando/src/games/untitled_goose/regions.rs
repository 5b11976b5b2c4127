use multirando_game::{ConfigError, ItemClassification, ItemRef, Requirement, WorldGraph};

use super::items::{ALL_GOALS_EVENT, ALL_MAIN_GOALS_EVENT};
use super::locations::{ACCESS_AREAS, Area, PlannedLocation, SetKind};

pub const MENU: &str = "Menu";

pub fn entrance_name(area: Area) -> String {
    format!("To {area}")
}

fn place_event(world: &mut WorldGraph, location: &str, event: &str) -> Result<(), ConfigError> {
    let item = world.define_item(event, None, ItemClassification::Progression)?;
    let player = world.player;
    world.place_locked_item(location, ItemRef { player, item })
}

// Menu -> Hub, then Hub -> each area. Access rules are attached later, in set_rules.
pub fn create_regions(
    world: &mut WorldGraph,
    trace: &[PlannedLocation],
) -> Result<(), ConfigError> {
    world.add_region(MENU)?;
    world.add_region(&Area::Hub.to_string())?;
    for area in ACCESS_AREAS {
        world.add_region(&area.to_string())?;
    }

    world.connect_by_name(MENU, &Area::Hub.to_string(), None, Requirement::Free)?;
    for area in ACCESS_AREAS {
        world.connect_by_name(
            &Area::Hub.to_string(),
            &area.to_string(),
            Some(&entrance_name(area)),
            Requirement::Free,
        )?;
    }

    for planned in trace {
        let region = world.get_region(&planned.data.area.to_string())?;
        world.add_location(region, planned.data.name, planned.id, Requirement::Free)?;
        match planned.kind {
            SetKind::MainMilestone => place_event(world, planned.data.name, ALL_MAIN_GOALS_EVENT)?,
            SetKind::AllMilestone => place_event(world, planned.data.name, ALL_GOALS_EVENT)?,
            _ => {}
        }
    }
    Ok(())
}
