use anyhow::Result;
use hashbrown::HashSet;
use multirando::games::generate_player_world;
use multirando::games::untitled_goose::GAME_NAME;
use multirando::games::untitled_goose::items::GOLDEN_BELL;
use multirando::games::untitled_goose::locations::ACCESS_AREAS;
use multirando::multiworld::Multiworld;
use multirando::plugin::PlayerWorld;
use multirando::randomize::{Randomizer, seeded_rng};
use multirando_logic::InventoryState;
use serde_json::{Map, Value, json};

const TOGGLES: [&str; 7] = [
    "include_extra_goals",
    "include_speedrun_goals",
    "include_item_pickups",
    "include_drag_items",
    "include_interactions",
    "include_npc_souls",
    "include_prop_souls",
];

fn build_world(options: &Value) -> Result<PlayerWorld> {
    let empty = Map::new();
    let options = options.as_object().unwrap_or(&empty);
    let mut rng = seeded_rng(7);
    Ok(generate_player_world(GAME_NAME, 0, "Goose", options, &mut rng)?)
}

fn location_names(world: &PlayerWorld) -> HashSet<String> {
    world.graph.locations.iter().map(|l| l.name.clone()).collect()
}

#[test]
fn full_inventory_completes_every_combination() -> Result<()> {
    for goal in ["steal_bell", "all_main_goals", "all_goals"] {
        for mask in 0..(1u32 << TOGGLES.len()) {
            let mut options = Map::new();
            options.insert("goal".to_string(), json!(goal));
            for (i, toggle) in TOGGLES.iter().enumerate() {
                options.insert(toggle.to_string(), json!(mask & (1 << i) != 0));
            }
            let world = build_world(&Value::Object(options))?;
            let mut multiworld = Multiworld::new(0);
            multiworld.add_player(world);
            let randomizer = Randomizer::new(&multiworld);
            if let Err(e) = randomizer.validate_logic() {
                panic!("goal={goal} toggles={mask:07b}: {e}");
            }
        }
    }
    Ok(())
}

#[test]
fn bell_and_access_items_are_exactly_enough() -> Result<()> {
    let world = build_world(&json!({"goal": "steal_bell", "include_prop_souls": false}))?;
    let graph = &world.graph;
    let mut required = vec![graph.get_item(GOLDEN_BELL)?];
    for area in ACCESS_AREAS {
        required.push(graph.get_item(&area.access_item())?);
    }

    let mut inventory = InventoryState::new(graph.item_defs.len());
    for &item in &required {
        inventory.add(item, 1);
    }
    assert!(world.oracle.is_complete(&inventory));

    for skip in 0..required.len() {
        let mut inventory = InventoryState::new(graph.item_defs.len());
        for (i, &item) in required.iter().enumerate() {
            if i != skip {
                inventory.add(item, 1);
            }
        }
        assert!(
            !world.oracle.is_complete(&inventory),
            "complete without {}",
            graph.item_name(required[skip])
        );
    }
    Ok(())
}

#[test]
fn item_pickups_toggle_only_removes_pickup_locations() -> Result<()> {
    let with = build_world(&json!({"include_item_pickups": true}))?;
    let without = build_world(&json!({"include_item_pickups": false}))?;
    let with_names = location_names(&with);
    let without_names = location_names(&without);
    assert!(without_names.is_subset(&with_names));

    let removed: Vec<&String> = with_names.difference(&without_names).collect();
    assert_eq!(removed.len(), 57 + 10);
    for name in &removed {
        let loc = &with.graph.locations[with.graph.get_location(name)?];
        let id = loc.id.unwrap() - 119_000_000;
        assert!((1000..1310).contains(&id), "{name} has offset {id}");
    }
    Ok(())
}

#[test]
fn region_graph_shape() -> Result<()> {
    let world = build_world(&json!({}))?;
    let graph = &world.graph;
    assert_eq!(graph.regions.len(), 7);

    let menu = graph.get_region("Menu")?;
    let hub = graph.get_region("Hub")?;
    assert_eq!(graph.regions[menu].exits.len(), 1);
    assert_eq!(graph.connections[graph.regions[menu].exits[0]].dst, hub);
    assert!(graph.regions[menu].entrances.is_empty());

    let leaves: HashSet<usize> = graph.regions[hub]
        .exits
        .iter()
        .map(|&c| graph.connections[c].dst)
        .collect();
    assert_eq!(leaves.len(), 5);
    for area in ACCESS_AREAS {
        let region = graph.get_region(&area.to_string())?;
        assert!(leaves.contains(&region));
        assert!(graph.regions[region].exits.is_empty());
    }
    Ok(())
}

#[test]
fn model_village_needs_pub_access() -> Result<()> {
    let world = build_world(&json!({"starting_area": "garden"}))?;
    let graph = &world.graph;
    let conn = &graph.connections[graph.get_connection("To Model Village")?];
    let pub_access = graph.get_item("Pub Access")?;
    let village_access = graph.get_item("Model Village Access")?;
    assert!(conn.requirement.referenced_items().contains(&pub_access));
    assert!(conn.requirement.referenced_items().contains(&village_access));
    Ok(())
}
