use multirando_game::{
    ConfigError, ItemRef, LocationIdx, LocationRef, PlayerId, RegionId, WorldGraph,
};
use multirando_logic::InventoryState;
use serde_json::Value;

use crate::completion::CompletionOracle;
use crate::plugin::PlayerWorld;

// All players of one generation. Everything here is indexed by PlayerId and is immutable once
// the players have been added.
pub struct Multiworld {
    pub seed: u64,
    pub worlds: Vec<WorldGraph>,
    pub completion_condition: Vec<Box<dyn CompletionOracle>>,
    pub precollected: Vec<Vec<ItemRef>>,
    pub item_pool: Vec<ItemRef>, // Shared by all players: any item may land in any player's location
    pub options: Vec<Value>,
}

impl Multiworld {
    pub fn new(seed: u64) -> Self {
        Multiworld {
            seed,
            worlds: vec![],
            completion_condition: vec![],
            precollected: vec![],
            item_pool: vec![],
            options: vec![],
        }
    }

    pub fn add_player(&mut self, player_world: PlayerWorld) -> PlayerId {
        let player = self.worlds.len();
        let PlayerWorld {
            mut graph,
            pool,
            oracle,
            options,
        } = player_world;
        graph.player = player;
        self.item_pool
            .extend(pool.items.iter().map(|&item| ItemRef { player, item }));
        self.precollected.push(
            pool.precollected
                .iter()
                .map(|&item| ItemRef { player, item })
                .collect(),
        );
        self.worlds.push(graph);
        self.completion_condition.push(oracle);
        self.options.push(options);
        player
    }

    pub fn num_players(&self) -> usize {
        self.worlds.len()
    }

    pub fn player_name(&self, player: PlayerId) -> &str {
        &self.worlds[player].player_name
    }

    pub fn get_region(&self, name: &str, player: PlayerId) -> Result<RegionId, ConfigError> {
        self.world(player)?.get_region(name)
    }

    pub fn get_location(&self, name: &str, player: PlayerId) -> Result<LocationRef, ConfigError> {
        let location: LocationIdx = self.world(player)?.get_location(name)?;
        Ok(LocationRef { player, location })
    }

    fn world(&self, player: PlayerId) -> Result<&WorldGraph, ConfigError> {
        self.worlds.get(player).ok_or(ConfigError::UnknownPlayer {
            player,
            num_players: self.worlds.len(),
        })
    }

    pub fn item_name(&self, item: ItemRef) -> &str {
        self.worlds[item.player].item_name(item.item)
    }

    pub fn location_name(&self, location: LocationRef) -> &str {
        &self.worlds[location.player].locations[location.location].name
    }

    pub fn starting_inventories(&self) -> Vec<InventoryState> {
        let mut inventories: Vec<InventoryState> = self
            .worlds
            .iter()
            .map(|w| InventoryState::new(w.item_isv.len()))
            .collect();
        for items in &self.precollected {
            for item in items {
                inventories[item.player].add(item.item, 1);
            }
        }
        inventories
    }

    // Every item that can ever be obtained: starting items, the pool, and locked event items.
    pub fn full_inventories(&self) -> Vec<InventoryState> {
        let mut inventories = self.starting_inventories();
        for item in &self.item_pool {
            inventories[item.player].add(item.item, 1);
        }
        for world in &self.worlds {
            for loc in &world.locations {
                if let (true, Some(item)) = (loc.locked, loc.item) {
                    inventories[item.player].add(item.item, 1);
                }
            }
        }
        inventories
    }

    pub fn is_complete(&self, player: PlayerId, inventory: &InventoryState) -> bool {
        self.completion_condition[player].is_complete(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::generate_player_world;
    use crate::games::untitled_goose::GAME_NAME;
    use crate::randomize::seeded_rng;
    use serde_json::Map;

    #[test]
    fn test_lookups_by_player() {
        let mut rng = seeded_rng(3);
        let world = generate_player_world(GAME_NAME, 0, "Goose", &Map::new(), &mut rng).unwrap();
        let mut multiworld = Multiworld::new(3);
        let player = multiworld.add_player(world);

        let hub = multiworld.get_region("Hub", player).unwrap();
        assert_eq!(multiworld.worlds[player].regions[hub].name, "Hub");
        let peck = multiworld.get_location("Sandcastle Peck 1", player).unwrap();
        assert_eq!(multiworld.location_name(peck), "Sandcastle Peck 1");
        assert!(matches!(
            multiworld.get_region("Moon", player),
            Err(ConfigError::UnknownRegion { .. })
        ));
    }

    #[test]
    fn test_unknown_player() {
        let multiworld = Multiworld::new(0);
        assert!(matches!(
            multiworld.get_region("Hub", 0),
            Err(ConfigError::UnknownPlayer {
                player: 0,
                num_players: 0
            })
        ));
        assert!(matches!(
            multiworld.get_location("Sandcastle Peck 1", 2),
            Err(ConfigError::UnknownPlayer { player: 2, .. })
        ));
    }
}
