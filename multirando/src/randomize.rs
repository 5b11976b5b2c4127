use log::{debug, info};
use multirando_game::{ItemRef, LocationRef, PlayerId};
use multirando_logic::InventoryState;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, LogicError};
use crate::games;
use crate::multiworld::Multiworld;
use crate::settings::GenerationSettings;
use crate::spoiler_log::{SpoilerLog, build_spoiler_log};
use crate::traverse::Traverser;

pub fn seeded_rng(seed: u64) -> StdRng {
    let mut rng_seed = [0u8; 32];
    rng_seed[..8].copy_from_slice(&seed.to_le_bytes());
    StdRng::from_seed(rng_seed)
}

#[derive(Clone)]
pub struct PlayerState {
    pub inventory: InventoryState,
    pub traverser: Traverser,
    pub collected: Vec<bool>, // Indexed by LocationIdx
}

// An item picked up during a sweep.
#[derive(Clone, Copy, Debug)]
pub struct Collection {
    pub location: LocationRef,
    pub item: ItemRef,
}

#[derive(Clone)]
pub struct RandomizationState {
    pub step_num: usize,
    pub players: Vec<PlayerState>,
    pub placements: Vec<Vec<Option<ItemRef>>>, // [player][location]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub location: LocationRef,
    pub item: ItemRef,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Randomization {
    pub seed: u64,
    pub placement_seed: u64,
    pub placements: Vec<Placement>,
    pub spoiler_log: SpoilerLog,
}

pub struct Randomizer<'a> {
    pub multiworld: &'a Multiworld,
}

impl<'a> Randomizer<'a> {
    pub fn new(multiworld: &'a Multiworld) -> Self {
        Randomizer { multiworld }
    }

    fn initial_state(&self, placements: Vec<Vec<Option<ItemRef>>>) -> RandomizationState {
        let inventories = self.multiworld.starting_inventories();
        let players = self
            .multiworld
            .worlds
            .iter()
            .zip(inventories)
            .map(|(world, inventory)| PlayerState {
                inventory,
                traverser: Traverser::new(world),
                collected: vec![false; world.locations.len()],
            })
            .collect();
        RandomizationState {
            step_num: 1,
            players,
            placements,
        }
    }

    // Locked event items are in place before any fill.
    fn locked_placements(&self) -> Vec<Vec<Option<ItemRef>>> {
        self.multiworld
            .worlds
            .iter()
            .map(|w| w.locations.iter().map(|loc| loc.item).collect())
            .collect()
    }

    fn update_reachability(&self, state: &mut RandomizationState) -> Result<(), GenerationError> {
        let step_num = state.step_num;
        let results: Vec<Result<(), GenerationError>> = state
            .players
            .par_iter_mut()
            .zip(self.multiworld.worlds.par_iter())
            .map(|(ps, world)| {
                if ps.traverser.is_current(&ps.inventory) {
                    Ok(())
                } else {
                    ps.traverser.traverse(world, &ps.inventory, step_num)
                }
            })
            .collect();
        for r in results {
            r?;
        }
        Ok(())
    }

    // Picks up every placed item at a reachable location not yet visited.
    fn collect_reachable(&self, state: &mut RandomizationState) -> Vec<Collection> {
        let mut collections: Vec<Collection> = vec![];
        for player in 0..state.players.len() {
            let ps = &mut state.players[player];
            for (loc_idx, placement) in state.placements[player].iter().enumerate() {
                if ps.collected[loc_idx] || !ps.traverser.is_location_reachable(loc_idx) {
                    continue;
                }
                if let Some(item) = *placement {
                    ps.collected[loc_idx] = true;
                    collections.push(Collection {
                        location: LocationRef {
                            player,
                            location: loc_idx,
                        },
                        item,
                    });
                }
            }
        }
        for c in &collections {
            state.players[c.item.player]
                .inventory
                .add(c.item.item, 1);
        }
        collections
    }

    // Alternates reachability updates and item collection until nothing more can be picked up.
    // Returns the collections of each round (the playthrough spheres).
    fn sweep(&self, state: &mut RandomizationState) -> Result<Vec<Vec<Collection>>, GenerationError> {
        let mut spheres: Vec<Vec<Collection>> = vec![];
        loop {
            self.update_reachability(state)?;
            let collections = self.collect_reachable(state);
            if collections.is_empty() {
                break;
            }
            spheres.push(collections);
            state.step_num += 1;
        }
        Ok(spheres)
    }

    fn incomplete_players(&self, state: &RandomizationState) -> Vec<String> {
        (0..self.multiworld.num_players())
            .filter(|&p| !self.multiworld.is_complete(p, &state.players[p].inventory))
            .map(|p| self.multiworld.player_name(p).to_string())
            .collect()
    }

    fn validate_player(
        &self,
        player: PlayerId,
        inventory: &InventoryState,
    ) -> Result<(), GenerationError> {
        let world = &self.multiworld.worlds[player];
        let mut traverser = Traverser::new(world);
        traverser.traverse(world, inventory, 0)?;
        for (region_id, region) in world.regions.iter().enumerate() {
            if !traverser.is_region_reachable(region_id) {
                return Err(LogicError::UnreachableRegion {
                    player: world.player_name.clone(),
                    region: region.name.clone(),
                }
                .into());
            }
        }
        for (loc_idx, loc) in world.locations.iter().enumerate() {
            if !traverser.is_location_reachable(loc_idx) {
                return Err(LogicError::UnreachableLocation {
                    player: world.player_name.clone(),
                    location: loc.name.clone(),
                }
                .into());
            }
        }
        if !self.multiworld.is_complete(player, inventory) {
            return Err(LogicError::GoalUnreachable {
                player: world.player_name.clone(),
            }
            .into());
        }
        Ok(())
    }

    // With every obtainable item in hand, every region and location of every player must be
    // reachable and every completion condition must hold.
    pub fn validate_logic(&self) -> Result<(), GenerationError> {
        let inventories = self.multiworld.full_inventories();
        let results: Vec<Result<(), GenerationError>> = (0..self.multiworld.num_players())
            .into_par_iter()
            .map(|p| self.validate_player(p, &inventories[p]))
            .collect();
        for r in results {
            r?;
        }
        Ok(())
    }

    fn reachable_empty_locations(&self, state: &RandomizationState) -> Vec<LocationRef> {
        let mut out: Vec<LocationRef> = vec![];
        for (player, world) in self.multiworld.worlds.iter().enumerate() {
            let ps = &state.players[player];
            for (loc_idx, loc) in world.locations.iter().enumerate() {
                if loc.id.is_some()
                    && state.placements[player][loc_idx].is_none()
                    && ps.traverser.is_location_reachable(loc_idx)
                {
                    out.push(LocationRef {
                        player,
                        location: loc_idx,
                    });
                }
            }
        }
        out
    }

    // Every player holding their starting items plus `unplaced`, after picking up whatever that
    // opens among the placements made so far.
    fn assumed_state(
        &self,
        placements: &[Vec<Option<ItemRef>>],
        unplaced: &[ItemRef],
    ) -> Result<RandomizationState, GenerationError> {
        let mut state = self.initial_state(placements.to_vec());
        for item in unplaced {
            state.players[item.player].inventory.add(item.item, 1);
        }
        self.sweep(&mut state)?;
        Ok(state)
    }

    pub fn randomize(
        &self,
        attempt_num: usize,
        placement_seed: u64,
    ) -> Result<Randomization, GenerationError> {
        let mw = self.multiworld;
        let mut rng = seeded_rng(placement_seed);
        let mut placements = self.locked_placements();

        let (mut progression, mut other): (Vec<ItemRef>, Vec<ItemRef>) =
            mw.item_pool.iter().partition(|item| {
                mw.worlds[item.player]
                    .item_def(item.item)
                    .is_some_and(|def| def.classification.is_progression())
            });
        progression.shuffle(&mut rng);
        other.shuffle(&mut rng);
        info!(
            "[attempt {attempt_num}] placing {} progression items and {} other items",
            progression.len(),
            other.len()
        );

        // Progression items are placed last-needed first: each one goes to a location reachable
        // without it, assuming every progression item still to be placed is held. Locations that
        // need none of those items are kept for the items needed first while there is a choice.
        while let Some(item) = progression.pop() {
            let assumed = self.assumed_state(&placements, &progression)?;
            let empty = self.reachable_empty_locations(&assumed);
            let reached = self.assumed_state(&placements, &[])?;
            let deep: Vec<LocationRef> = empty
                .iter()
                .copied()
                .filter(|loc| {
                    !reached.players[loc.player]
                        .traverser
                        .is_location_reachable(loc.location)
                })
                .collect();
            let candidates = if deep.is_empty() { &empty } else { &deep };
            let Some(&location) = candidates.choose(&mut rng) else {
                return Err(GenerationError::FillFailed(format!(
                    "no reachable empty location left for {} ({}), {} progression items to go",
                    mw.item_name(item),
                    mw.player_name(item.player),
                    progression.len() + 1
                )));
            };
            placements[location.player][location.location] = Some(item);
            debug!(
                "[attempt {attempt_num}] {} ({}) placed at {} ({}), {} candidate locations",
                mw.item_name(item),
                mw.player_name(item.player),
                mw.location_name(location),
                mw.player_name(location.player),
                candidates.len()
            );
        }

        // Everything else goes into the remaining open locations in random order.
        let mut remaining: Vec<LocationRef> = vec![];
        for (player, world) in mw.worlds.iter().enumerate() {
            for (loc_idx, loc) in world.locations.iter().enumerate() {
                if loc.id.is_some() && placements[player][loc_idx].is_none() {
                    remaining.push(LocationRef {
                        player,
                        location: loc_idx,
                    });
                }
            }
        }
        if other.len() > remaining.len() {
            return Err(GenerationError::FillFailed(format!(
                "{} items left for {} open locations",
                other.len(),
                remaining.len()
            )));
        }
        remaining.shuffle(&mut rng);
        for (&loc, item) in remaining.iter().zip(other.drain(..)) {
            placements[loc.player][loc.location] = Some(item);
        }

        let (spheres, final_state) = self.playthrough(placements.clone())?;
        info!(
            "[attempt {attempt_num}] seed is beatable in {} spheres",
            spheres.len()
        );

        let mut placement_list: Vec<Placement> = vec![];
        for (player, locs) in placements.iter().enumerate() {
            for (loc_idx, item) in locs.iter().enumerate() {
                if let Some(item) = *item {
                    placement_list.push(Placement {
                        location: LocationRef {
                            player,
                            location: loc_idx,
                        },
                        item,
                    });
                }
            }
        }
        let spoiler_log =
            build_spoiler_log(mw, placement_seed, &spheres, &final_state, &placement_list);
        Ok(Randomization {
            seed: mw.seed,
            placement_seed,
            placements: placement_list,
            spoiler_log,
        })
    }

    // Replays a finished placement from the starting inventories, sphere by sphere.
    pub fn playthrough(
        &self,
        placements: Vec<Vec<Option<ItemRef>>>,
    ) -> Result<(Vec<Vec<Collection>>, RandomizationState), GenerationError> {
        let mut state = self.initial_state(placements);
        let spheres = self.sweep(&mut state)?;
        let incomplete = self.incomplete_players(&state);
        if !incomplete.is_empty() {
            return Err(LogicError::NotBeatable {
                players: incomplete,
            }
            .into());
        }
        Ok((spheres, state))
    }
}

pub fn build_multiworld(
    settings: &GenerationSettings,
    seed: u64,
) -> Result<Multiworld, GenerationError> {
    settings.validate()?;
    let mut rng = seeded_rng(seed);
    let mut multiworld = Multiworld::new(seed);
    for (player, p) in settings.players.iter().enumerate() {
        let player_world =
            games::generate_player_world(&p.game, player, &p.name, &p.options, &mut rng)?;
        multiworld.add_player(player_world);
    }
    Ok(multiworld)
}

// Builds and validates the multiworld, then tries placement seeds derived from `seed` until one
// produces a beatable seed.
pub fn generate(
    settings: &GenerationSettings,
    seed: u64,
    max_attempts: usize,
) -> Result<Randomization, GenerationError> {
    let multiworld = build_multiworld(settings, seed)?;
    let randomizer = Randomizer::new(&multiworld);
    randomizer.validate_logic()?;

    let mut rng = seeded_rng(seed);
    let mut last_err: Option<GenerationError> = None;
    for attempt_num in 1..=max_attempts {
        let placement_seed = rng.next_u64();
        info!("Attempt {attempt_num}/{max_attempts}: seed={seed}, item placement seed={placement_seed}");
        match randomizer.randomize(attempt_num, placement_seed) {
            Ok(randomization) => return Ok(randomization),
            Err(e) if e.is_retriable() => {
                info!("Attempt {attempt_num}/{max_attempts}: Randomization failed: {e}");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(GenerationError::FillFailed(match last_err {
        Some(e) => format!("exhausted {max_attempts} attempts, last failure: {e}"),
        None => "no attempts were made".to_string(),
    }))
}
