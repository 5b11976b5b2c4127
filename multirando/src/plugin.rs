use hashbrown::HashSet;
use log::{debug, info};
use multirando_game::{ConfigError, ItemIdx, PlayerId, WorldGraph};
use multirando_logic::helpers::collect_item_refs;
use rand::rngs::StdRng;
use serde_json::{Map, Value};

use crate::completion::CompletionOracle;
use crate::settings::{OptionSpec, ResolvedOptions, normalize_options};

// Items created by a game for one player. Precollected items start in the player's inventory
// and are never placed.
#[derive(Clone, Debug, Default)]
pub struct ItemPool {
    pub items: Vec<ItemIdx>,
    pub precollected: Vec<ItemIdx>,
}

// Game content: option schema, world construction, item table, and victory condition.
pub trait GamePlugin {
    type Options;

    fn game_name(&self) -> &'static str;

    fn get_options(&self) -> Vec<OptionSpec>;

    fn parse_options(&self, options: &ResolvedOptions) -> Result<Self::Options, ConfigError>;

    // Resolves randomized option values. Options are immutable after this.
    fn generate_early(&self, options: &mut Self::Options, rng: &mut StdRng);

    fn create_regions(
        &self,
        world: &mut WorldGraph,
        options: &Self::Options,
    ) -> Result<(), ConfigError>;

    fn create_items(
        &self,
        world: &mut WorldGraph,
        options: &Self::Options,
        rng: &mut StdRng,
    ) -> Result<ItemPool, ConfigError>;

    fn set_rules(
        &self,
        world: &mut WorldGraph,
        options: &Self::Options,
    ) -> Result<Box<dyn CompletionOracle>, ConfigError>;

    // Option values as they were used, for the spoiler log.
    fn describe_options(&self, options: &Self::Options) -> Value;
}

pub struct PlayerWorld {
    pub graph: WorldGraph,
    pub pool: ItemPool,
    pub oracle: Box<dyn CompletionOracle>,
    pub options: Value,
}

// Progression items are exactly the items that gate something.
pub fn check_progression_soundness(
    graph: &WorldGraph,
    pool: &ItemPool,
    oracle: &dyn CompletionOracle,
) -> Result<(), ConfigError> {
    let mut referenced: HashSet<ItemIdx> = oracle.referenced_items();
    for req in graph.requirements() {
        referenced.extend(collect_item_refs(req, &graph.rules));
    }
    let mut referenced_sorted: Vec<ItemIdx> = referenced.iter().copied().collect();
    referenced_sorted.sort();
    for item in referenced_sorted {
        let Some(def) = graph.item_def(item) else {
            return Err(ConfigError::UnknownItem {
                player: graph.player_name.clone(),
                name: graph.item_name(item).to_string(),
            });
        };
        if !def.classification.is_progression() {
            return Err(ConfigError::UnclassifiedRequirement {
                player: graph.player_name.clone(),
                name: def.name.clone(),
                classification: def.classification.to_string(),
            });
        }
    }

    let locked_items = graph
        .locations
        .iter()
        .filter_map(|loc| loc.item)
        .filter(|item_ref| item_ref.player == graph.player)
        .map(|item_ref| item_ref.item);
    let mut owned: Vec<ItemIdx> = pool
        .items
        .iter()
        .chain(pool.precollected.iter())
        .copied()
        .chain(locked_items)
        .collect();
    owned.sort();
    owned.dedup();
    for item in owned {
        let Some(def) = graph.item_def(item) else {
            return Err(ConfigError::UnknownItem {
                player: graph.player_name.clone(),
                name: graph.item_name(item).to_string(),
            });
        };
        if def.classification.is_progression() && !referenced.contains(&item) {
            return Err(ConfigError::UnreferencedProgression {
                player: graph.player_name.clone(),
                name: def.name.clone(),
            });
        }
    }
    Ok(())
}

// Locations that fill may place items into.
pub fn num_open_locations(graph: &WorldGraph) -> usize {
    graph
        .locations
        .iter()
        .filter(|loc| loc.item.is_none() && loc.id.is_some())
        .count()
}

pub fn generate_player_world<P: GamePlugin>(
    plugin: &P,
    player: PlayerId,
    player_name: &str,
    raw_options: &Map<String, Value>,
    rng: &mut StdRng,
) -> Result<PlayerWorld, ConfigError> {
    let resolved = normalize_options(&plugin.get_options(), raw_options)?;
    let mut options = plugin.parse_options(&resolved)?;
    plugin.generate_early(&mut options, rng);

    let mut graph = WorldGraph::new(player, player_name, plugin.game_name());
    plugin.create_regions(&mut graph, &options)?;
    let pool = plugin.create_items(&mut graph, &options, rng)?;
    let oracle = plugin.set_rules(&mut graph, &options)?;
    graph.validate()?;
    check_progression_soundness(&graph, &pool, oracle.as_ref())?;

    let open_locations = num_open_locations(&graph);
    if pool.items.len() > open_locations {
        return Err(ConfigError::NotEnoughLocations {
            player: player_name.to_string(),
            items: pool.items.len(),
            locations: open_locations,
        });
    }
    debug!("[{player_name}] completion condition: {}", oracle.describe());
    info!(
        "[{player_name}] {}: {} regions, {} locations, {} items in pool, {} precollected",
        plugin.game_name(),
        graph.regions.len(),
        graph.locations.len(),
        pool.items.len(),
        pool.precollected.len()
    );
    Ok(PlayerWorld {
        graph,
        pool,
        oracle,
        options: plugin.describe_options(&options),
    })
}
