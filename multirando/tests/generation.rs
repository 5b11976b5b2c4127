use anyhow::Result;
use multirando::randomize::{Randomizer, build_multiworld, generate};
use multirando::settings::{GenerationSettings, parse_generation_settings};
use multirando::{GenerationError, LogicError};
use multirando_game::ConfigError;
use serde_json::json;

fn two_player_settings() -> Result<GenerationSettings> {
    parse_generation_settings(
        r#"{
            "players": [
                {"name": "Alice", "game": "Untitled Goose Game", "options": {"goal": "all_goals", "include_extra_goals": true}},
                {"name": "Bob", "game": "Untitled Goose Game", "options": {"starting_area": "high_street", "include_prop_souls": false}}
            ]
        }"#,
    )
}

#[test]
fn two_player_seed_is_beatable() -> Result<()> {
    let settings = two_player_settings()?;
    let randomization = generate(&settings, 2024, 10)?;

    let multiworld = build_multiworld(&settings, 2024)?;
    let randomizer = Randomizer::new(&multiworld);
    let mut placements: Vec<Vec<Option<_>>> = multiworld
        .worlds
        .iter()
        .map(|w| vec![None; w.locations.len()])
        .collect();
    for p in &randomization.placements {
        placements[p.location.player][p.location.location] = Some(p.item);
    }
    let (spheres, _) = randomizer.playthrough(placements)?;
    assert!(!spheres.is_empty());

    // Every location with an id got exactly one item.
    let num_open: usize = multiworld
        .worlds
        .iter()
        .map(|w| w.locations.iter().filter(|l| l.id.is_some()).count())
        .sum();
    let num_placed = randomization
        .placements
        .iter()
        .filter(|p| multiworld.worlds[p.location.player].locations[p.location.location].id.is_some())
        .count();
    assert_eq!(num_placed, num_open);
    Ok(())
}

// Only the goals and sandcastle pecks are locations, so nearly every one of them must hold a
// progression item.
fn few_locations_settings(goal: &str) -> Result<GenerationSettings> {
    let settings = json!({
        "players": [{
            "name": "Alice",
            "game": "Untitled Goose Game",
            "options": {
                "goal": goal,
                "include_item_pickups": false,
                "include_drag_items": false,
                "include_interactions": false
            }
        }]
    });
    parse_generation_settings(&settings.to_string())
}

#[test]
fn few_locations_seeds_generate() -> Result<()> {
    for goal in ["steal_bell", "all_main_goals", "all_goals"] {
        let settings = few_locations_settings(goal)?;
        for seed in 0..20 {
            let randomization = generate(&settings, seed, 10)?;
            let multiworld = build_multiworld(&settings, seed)?;
            let world = &multiworld.worlds[0];
            let num_open = world.locations.iter().filter(|l| l.id.is_some()).count();
            let num_progression = multiworld
                .item_pool
                .iter()
                .filter(|item| {
                    world
                        .item_def(item.item)
                        .is_some_and(|def| def.classification.is_progression())
                })
                .count();
            assert_eq!(num_open, 37);
            assert_eq!(num_progression, 35);
            assert_eq!(randomization.placements.len(), world.locations.len());
        }
    }
    Ok(())
}

#[test]
fn generation_is_deterministic() -> Result<()> {
    let settings = two_player_settings()?;
    let r1 = generate(&settings, 99, 10)?;
    let r2 = generate(&settings, 99, 10)?;
    assert_eq!(r1.placement_seed, r2.placement_seed);
    assert_eq!(r1.placements, r2.placements);
    assert_eq!(r1.spoiler_log, r2.spoiler_log);

    let r3 = generate(&settings, 100, 10)?;
    assert_ne!(r1.placements, r3.placements);
    Ok(())
}

#[test]
fn items_cross_between_players() -> Result<()> {
    let settings = two_player_settings()?;
    let randomization = generate(&settings, 5, 10)?;
    let crossed = randomization
        .placements
        .iter()
        .filter(|p| p.location.player != p.item.player)
        .count();
    assert!(crossed > 0);
    Ok(())
}

#[test]
fn spoiler_lists_both_players() -> Result<()> {
    let settings = two_player_settings()?;
    let randomization = generate(&settings, 11, 10)?;
    let log = &randomization.spoiler_log;
    let names: Vec<&str> = log.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob"]);
    assert_eq!(log.players[1].options["starting_area"], "high_street");
    assert_eq!(log.players[1].precollected, ["High Street Access"]);
    assert!(!log.playthrough.is_empty());
    let bell_finds = log
        .playthrough
        .iter()
        .flat_map(|s| s.items.iter())
        .filter(|i| i.item == "Golden Bell")
        .count();
    assert_eq!(bell_finds, 2);
    Ok(())
}

#[test]
fn config_errors_are_not_retried() -> Result<()> {
    let unknown_game = parse_generation_settings(
        r#"{"players": [{"name": "Alice", "game": "Untitled Moose Game"}]}"#,
    )?;
    let err = generate(&unknown_game, 1, 10).err().unwrap();
    assert!(matches!(
        err,
        GenerationError::Config(ConfigError::UnknownGame(_))
    ));
    assert!(!err.is_retriable());

    let bad_option = parse_generation_settings(
        r#"{"players": [{"name": "Alice", "game": "Untitled Goose Game", "options": {"goal": "honk"}}]}"#,
    )?;
    let err = generate(&bad_option, 1, 10).err().unwrap();
    assert!(matches!(
        err,
        GenerationError::Config(ConfigError::InvalidOption { .. })
    ));

    let duplicate = parse_generation_settings(
        r#"{"players": [
            {"name": "Alice", "game": "Untitled Goose Game"},
            {"name": "Alice", "game": "Untitled Goose Game"}
        ]}"#,
    )?;
    assert!(generate(&duplicate, 1, 10).is_err());
    Ok(())
}

#[test]
fn not_beatable_is_retriable() {
    let err = GenerationError::from(LogicError::NotBeatable {
        players: vec!["Alice".to_string()],
    });
    assert!(err.is_retriable());
    assert!(!GenerationError::Internal("x".to_string()).is_retriable());
}
