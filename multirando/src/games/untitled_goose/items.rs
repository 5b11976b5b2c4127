use hashbrown::HashSet;
use log::debug;
use multirando_game::{ConfigError, ItemClassification, ItemCode, ItemIdx, WorldGraph};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;

use super::ID_BASE;
use super::locations::{ACCESS_AREAS, ALL_NPCS, Npc, PlannedLocation, all_props, prop_soul_item};
use super::options::GooseOptions;
use crate::plugin::{ItemPool, num_open_locations};

pub const GOLDEN_BELL: &str = "Golden Bell";
pub const ALL_MAIN_GOALS_EVENT: &str = "All Main Goals Complete";
pub const ALL_GOALS_EVENT: &str = "All Goals Complete";
pub const FALLBACK_FILLER: &str = "Mega Honk";

// Victory needs these prop souls even though the bell can be stolen without them.
pub const BELL_PROPS: [&str; 2] = ["Timber Handle", "Golden Bell"];

const GOLDEN_BELL_CODE: ItemCode = ID_BASE + 10;
const FILLER_CODE_BASE: ItemCode = ID_BASE + 20;
const TRAP_CODE_BASE: ItemCode = ID_BASE + 30;
const NPC_SOUL_CODE_BASE: ItemCode = ID_BASE + 100;
const PROP_SOUL_CODE_BASE: ItemCode = ID_BASE + 200;

pub fn referenced_npcs(trace: &[PlannedLocation]) -> Vec<Npc> {
    let npcs: HashSet<Npc> = trace
        .iter()
        .flat_map(|p| p.data.npcs.iter().copied())
        .collect();
    ALL_NPCS.iter().copied().filter(|n| npcs.contains(n)).collect()
}

// Props referenced by the constructed locations (plus the bell props), in code order.
pub fn referenced_props(trace: &[PlannedLocation]) -> Vec<(usize, &'static str)> {
    let props: HashSet<&str> = trace
        .iter()
        .flat_map(|p| p.data.props.iter().copied())
        .chain(BELL_PROPS)
        .collect();
    all_props()
        .into_iter()
        .enumerate()
        .filter(|(_, prop)| props.contains(prop))
        .collect()
}

pub fn create_items(
    world: &mut WorldGraph,
    options: &GooseOptions,
    trace: &[PlannedLocation],
    rng: &mut StdRng,
) -> Result<ItemPool, ConfigError> {
    let mut pool = ItemPool::default();
    let starting_area = options.starting_area.area();

    for (i, &area) in ACCESS_AREAS.iter().enumerate() {
        let item = world.define_item(
            &area.access_item(),
            Some(ID_BASE + i as u64),
            ItemClassification::Progression,
        )?;
        if starting_area == Some(area) {
            pool.precollected.push(item);
        } else {
            pool.items.push(item);
        }
    }
    let bell = world.define_item(
        GOLDEN_BELL,
        Some(GOLDEN_BELL_CODE),
        ItemClassification::Progression,
    )?;
    pool.items.push(bell);

    if options.include_npc_souls {
        let npcs = referenced_npcs(trace);
        for (i, npc) in ALL_NPCS.iter().enumerate() {
            if npcs.contains(npc) {
                let item = world.define_item(
                    &npc.soul_item(),
                    Some(NPC_SOUL_CODE_BASE + i as u64),
                    ItemClassification::Progression,
                )?;
                pool.items.push(item);
            }
        }
    }
    if options.include_prop_souls {
        for (i, prop) in referenced_props(trace) {
            let item = world.define_item(
                &prop_soul_item(prop),
                Some(PROP_SOUL_CODE_BASE + i as u64),
                ItemClassification::Progression,
            )?;
            pool.items.push(item);
        }
    }

    let mut padding: Vec<(ItemIdx, u32)> = vec![];
    for (i, &(item_name, weight)) in options.filler_weights.iter().enumerate() {
        let item = world.define_item(
            item_name,
            Some(FILLER_CODE_BASE + i as u64),
            ItemClassification::Filler,
        )?;
        padding.push((item, weight));
    }
    for (i, &(item_name, weight)) in options.trap_weights.iter().enumerate() {
        let item = world.define_item(
            item_name,
            Some(TRAP_CODE_BASE + i as u64),
            ItemClassification::Trap,
        )?;
        padding.push((item, weight));
    }

    let open_locations = num_open_locations(world);
    if pool.items.len() > open_locations {
        return Err(ConfigError::NotEnoughLocations {
            player: world.player_name.clone(),
            items: pool.items.len(),
            locations: open_locations,
        });
    }
    let num_padding = open_locations - pool.items.len();
    padding.retain(|&(_, weight)| weight > 0);
    if padding.is_empty() {
        let fallback = world.get_item(FALLBACK_FILLER)?;
        pool.items.extend(std::iter::repeat_n(fallback, num_padding));
    } else {
        let dist = WeightedIndex::new(padding.iter().map(|&(_, w)| w)).map_err(|e| {
            ConfigError::InvalidOption {
                option: "filler and trap weights".to_string(),
                reason: e.to_string(),
            }
        })?;
        for _ in 0..num_padding {
            pool.items.push(padding[dist.sample(rng)].0);
        }
    }
    debug!(
        "[{}] {} padding items over {} open locations",
        world.player_name, num_padding, open_locations
    );
    Ok(pool)
}
