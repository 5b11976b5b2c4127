use multirando_game::{ConfigError, Requirement, WorldGraph};

use super::items::{ALL_GOALS_EVENT, ALL_MAIN_GOALS_EVENT, BELL_PROPS, GOLDEN_BELL};
use super::locations::{ACCESS_AREAS, Area, LocationData, PlannedLocation, SetKind, prop_soul_item};
use super::options::{Goal, GooseOptions};
use super::regions::entrance_name;
use crate::completion::{CompletionOracle, RequirementOracle};

pub const ALL_MAIN_TASKS: &str = "All Main Tasks";
pub const ALL_EXTRA_TASKS: &str = "All Extra Tasks";
pub const ALL_TASKS: &str = "All Tasks";

pub fn area_tasks_rule(area: Area) -> String {
    format!("{area} Tasks")
}

fn location_requirement(
    world: &mut WorldGraph,
    options: &GooseOptions,
    data: &LocationData,
) -> Result<Requirement, ConfigError> {
    let mut reqs: Vec<Requirement> = vec![];
    if options.include_npc_souls {
        for npc in data.npcs {
            reqs.push(world.has(&npc.soul_item()));
        }
    }
    if options.include_prop_souls {
        for prop in data.props {
            reqs.push(world.has(&prop_soul_item(prop)));
        }
    }
    for area in data.needs {
        reqs.push(world.region_reachable(&area.to_string())?);
    }
    Ok(Requirement::make_and(reqs))
}

// Being able to do a goal from anywhere: its region is reachable and its own rule holds.
fn goal_requirement(world: &WorldGraph, name: &str) -> Result<Requirement, ConfigError> {
    let loc_idx = world.get_location(name)?;
    let loc = &world.locations[loc_idx];
    Ok(Requirement::make_and(vec![
        Requirement::Region(loc.region),
        loc.requirement.clone(),
    ]))
}

fn goals_requirement<'a>(
    world: &WorldGraph,
    goals: impl Iterator<Item = &'a PlannedLocation>,
) -> Result<Requirement, ConfigError> {
    let reqs = goals
        .map(|p| goal_requirement(world, p.data.name))
        .collect::<Result<Vec<Requirement>, ConfigError>>()?;
    Ok(Requirement::make_and(reqs))
}

pub fn set_rules(
    world: &mut WorldGraph,
    options: &GooseOptions,
    trace: &[PlannedLocation],
) -> Result<Box<dyn CompletionOracle>, ConfigError> {
    for area in ACCESS_AREAS {
        let req = match area {
            Area::ModelVillage => world.has_all(&[
                Area::Pub.access_item().as_str(),
                Area::ModelVillage.access_item().as_str(),
            ]),
            _ => world.has(&area.access_item()),
        };
        world.set_connection_rule(&entrance_name(area), req)?;
    }

    for planned in trace {
        let req = location_requirement(world, options, planned.data)?;
        world.set_location_rule(planned.data.name, req)?;
    }

    for area in ACCESS_AREAS {
        let req = goals_requirement(
            world,
            trace
                .iter()
                .filter(|p| p.kind == SetKind::MainGoals && p.data.area == area),
        )?;
        world.define_rule(&area_tasks_rule(area), req)?;
    }
    let area_rules: Vec<Requirement> = ACCESS_AREAS
        .iter()
        .map(|&area| world.rule(&area_tasks_rule(area)))
        .collect();
    world.define_rule(ALL_MAIN_TASKS, Requirement::make_and(area_rules))?;

    if options.include_extra_goals {
        let req = goals_requirement(
            world,
            trace.iter().filter(|p| p.kind == SetKind::ExtraGoals),
        )?;
        world.define_rule(ALL_EXTRA_TASKS, req)?;
    }
    for planned in trace {
        match planned.kind {
            SetKind::Completion => {
                let req = world.rule(ALL_EXTRA_TASKS);
                world.add_location_rule(planned.data.name, req)?;
            }
            SetKind::SpeedrunGoals => {
                let req = world.rule(&area_tasks_rule(planned.data.area));
                world.add_location_rule(planned.data.name, req)?;
            }
            SetKind::MainMilestone => {
                let req = world.rule(ALL_MAIN_TASKS);
                world.add_location_rule(planned.data.name, req)?;
            }
            _ => {}
        }
    }
    if options.goal == Goal::AllGoals {
        let req = goals_requirement(world, trace.iter().filter(|p| p.kind.is_goal()))?;
        world.define_rule(ALL_TASKS, req)?;
        for planned in trace.iter().filter(|p| p.kind == SetKind::AllMilestone) {
            let req = world.rule(ALL_TASKS);
            world.add_location_rule(planned.data.name, req)?;
        }
    }

    let mut victory: Vec<String> = vec![GOLDEN_BELL.to_string()];
    match options.goal {
        Goal::StealBell => {}
        Goal::AllMainGoals => victory.push(ALL_MAIN_GOALS_EVENT.to_string()),
        Goal::AllGoals => victory.push(ALL_GOALS_EVENT.to_string()),
    }
    victory.extend(ACCESS_AREAS.iter().map(|a| a.access_item()));
    if options.include_prop_souls {
        victory.extend(BELL_PROPS.iter().map(|p| prop_soul_item(p)));
    }
    let names: Vec<&str> = victory.iter().map(|s| s.as_str()).collect();
    let req = world.has_all(&names);
    Ok(Box::new(RequirementOracle::new(world, req)?))
}
