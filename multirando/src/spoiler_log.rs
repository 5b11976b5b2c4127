use anyhow::{Context, Result};
use multirando_game::ItemClassification;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    multiworld::Multiworld,
    randomize::{Collection, Placement, RandomizationState},
    traverse::get_spoiler_route,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpoilerPlayer {
    pub id: usize,
    pub name: String,
    pub game: String,
    pub options: serde_json::Value,
    pub precollected: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SpoilerSphereItem {
    pub item: String,
    pub owner: String,
    pub location: String,
    pub finder: String,
    pub route: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SpoilerSphere {
    pub sphere: usize,
    pub items: Vec<SpoilerSphereItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SpoilerPlacement {
    pub location: String,
    pub location_id: Option<u64>,
    pub finder: String,
    pub item: String,
    pub item_code: Option<u64>,
    pub owner: String,
    pub classification: Option<ItemClassification>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpoilerLog {
    pub seed: u64,
    pub placement_seed: u64,
    pub players: Vec<SpoilerPlayer>,
    pub playthrough: Vec<SpoilerSphere>,
    pub placements: Vec<SpoilerPlacement>,
}

// Only progression items (events included) appear in the playthrough.
pub fn build_spoiler_log(
    mw: &Multiworld,
    placement_seed: u64,
    spheres: &[Vec<Collection>],
    final_state: &RandomizationState,
    placements: &[Placement],
) -> SpoilerLog {
    let players: Vec<SpoilerPlayer> = mw
        .worlds
        .iter()
        .enumerate()
        .map(|(id, w)| SpoilerPlayer {
            id,
            name: w.player_name.clone(),
            game: w.game.clone(),
            options: mw.options[id].clone(),
            precollected: mw.precollected[id]
                .iter()
                .map(|&item| mw.item_name(item).to_string())
                .collect(),
        })
        .collect();

    let mut playthrough: Vec<SpoilerSphere> = vec![];
    for (i, sphere) in spheres.iter().enumerate() {
        let mut items: Vec<SpoilerSphereItem> = vec![];
        for c in sphere {
            let owner_world = &mw.worlds[c.item.player];
            let is_progression = owner_world
                .item_def(c.item.item)
                .is_some_and(|def| def.classification.is_progression());
            if !is_progression {
                continue;
            }
            let finder_world = &mw.worlds[c.location.player];
            let region = finder_world.locations[c.location.location].region;
            let traverser = &final_state.players[c.location.player].traverser;
            let route = get_spoiler_route(traverser, finder_world, region)
                .into_iter()
                .map(|conn_idx| finder_world.connections[conn_idx].name.clone())
                .collect();
            items.push(SpoilerSphereItem {
                item: mw.item_name(c.item).to_string(),
                owner: owner_world.player_name.clone(),
                location: mw.location_name(c.location).to_string(),
                finder: finder_world.player_name.clone(),
                route,
            });
        }
        if !items.is_empty() {
            playthrough.push(SpoilerSphere {
                sphere: i + 1,
                items,
            });
        }
    }

    let placements = placements
        .iter()
        .map(|p| {
            let finder_world = &mw.worlds[p.location.player];
            let owner_world = &mw.worlds[p.item.player];
            let def = owner_world.item_def(p.item.item);
            SpoilerPlacement {
                location: mw.location_name(p.location).to_string(),
                location_id: finder_world.locations[p.location.location].id,
                finder: finder_world.player_name.clone(),
                item: mw.item_name(p.item).to_string(),
                item_code: def.and_then(|d| d.code),
                owner: owner_world.player_name.clone(),
                classification: def.map(|d| d.classification),
            }
        })
        .collect();

    SpoilerLog {
        seed: mw.seed,
        placement_seed,
        players,
        playthrough,
        placements,
    }
}

pub fn write_spoiler_log(spoiler_log: &SpoilerLog, path: &Path) -> Result<()> {
    let spoiler_str = serde_json::to_string_pretty(spoiler_log)?;
    std::fs::write(path, spoiler_str)
        .with_context(|| format!("Unable to write spoiler log to {}", path.display()))?;
    Ok(())
}
