use hashbrown::HashSet;
use multirando_game::{ConnectionIdx, LocationIdx, RegionId, WorldGraph};
use multirando_logic::{InventoryState, LogicContext, apply_requirement};

use crate::error::GenerationError;

#[derive(Clone, Debug)]
pub enum TraversalUpdate {
    Region(RegionId),
    Location(LocationIdx),
}

#[derive(Clone, Debug)]
pub struct TraversalStep {
    pub updates: Vec<TraversalUpdate>,
    pub step_num: usize,
    pub inventory_generation: u64,
}

// Reachability of one player's graph, grown incrementally as the inventory grows. Each call to
// `traverse` is recorded as a step that can be rolled back with `pop_step`.
#[derive(Clone, Debug)]
pub struct Traverser {
    pub reachable_regions: Vec<bool>, // Indexed by RegionId
    pub region_step: Vec<Option<usize>>, // Step number at which each region became reachable
    pub region_trail: Vec<Option<ConnectionIdx>>, // Connection through which each region was first reached
    pub location_step: Vec<Option<usize>>, // Indexed by LocationIdx
    pub step: TraversalStep,
    pub past_steps: Vec<TraversalStep>,
}

#[derive(Clone, Debug, Default)]
pub struct ReachableSets {
    pub regions: HashSet<RegionId>,
    pub locations: HashSet<LocationIdx>,
}

impl Traverser {
    pub fn new(graph: &WorldGraph) -> Self {
        Self {
            reachable_regions: vec![false; graph.regions.len()],
            region_step: vec![None; graph.regions.len()],
            region_trail: vec![None; graph.regions.len()],
            location_step: vec![None; graph.locations.len()],
            step: TraversalStep {
                updates: vec![],
                step_num: 0,
                inventory_generation: 0,
            },
            past_steps: vec![],
        }
    }

    fn add_region(&mut self, region: RegionId, trail: Option<ConnectionIdx>, step_num: usize) {
        self.reachable_regions[region] = true;
        self.region_step[region] = Some(step_num);
        self.region_trail[region] = trail;
        self.step.updates.push(TraversalUpdate::Region(region));
    }

    fn add_location(&mut self, location: LocationIdx, step_num: usize) {
        self.location_step[location] = Some(step_num);
        self.step.updates.push(TraversalUpdate::Location(location));
    }

    pub fn finish_step(&mut self, step_num: usize) {
        let mut step = TraversalStep {
            updates: vec![],
            step_num: 0,
            inventory_generation: 0,
        };
        std::mem::swap(&mut self.step, &mut step);
        step.step_num = step_num;
        self.past_steps.push(step);
    }

    pub fn pop_step(&mut self) {
        let Some(step) = self.past_steps.pop() else {
            return;
        };
        for u in step.updates.iter().rev() {
            match *u {
                TraversalUpdate::Region(region) => {
                    self.reachable_regions[region] = false;
                    self.region_step[region] = None;
                    self.region_trail[region] = None;
                }
                TraversalUpdate::Location(location) => {
                    self.location_step[location] = None;
                }
            }
        }
    }

    // True if the last recorded step was computed from this inventory.
    pub fn is_current(&self, inventory: &InventoryState) -> bool {
        self.past_steps
            .last()
            .is_some_and(|s| s.inventory_generation == inventory.generation())
    }

    pub fn is_region_reachable(&self, region: RegionId) -> bool {
        self.reachable_regions[region]
    }

    pub fn is_location_reachable(&self, location: LocationIdx) -> bool {
        self.location_step[location].is_some()
    }

    pub fn num_reachable_locations(&self) -> usize {
        self.location_step.iter().filter(|x| x.is_some()).count()
    }

    // Expands reachability to a fixpoint under `inventory`. Reachability never shrinks: content
    // reached in an earlier step stays reached.
    pub fn traverse(
        &mut self,
        graph: &WorldGraph,
        inventory: &InventoryState,
        step_num: usize,
    ) -> Result<(), GenerationError> {
        self.step.inventory_generation = inventory.generation();
        if !self.reachable_regions.is_empty() && !self.reachable_regions[graph.root()] {
            self.add_region(graph.root(), None, step_num);
        }

        let max_passes = graph.regions.len() + graph.locations.len() + 1;
        let mut num_passes = 0;
        loop {
            num_passes += 1;
            if num_passes > max_passes {
                return Err(GenerationError::Internal(format!(
                    "[{}] reachability search did not converge within {max_passes} passes",
                    graph.player_name
                )));
            }

            // All checks in a pass see the reachable set as it was at the start of the pass.
            let (new_regions, new_locations) = {
                let cx = LogicContext {
                    inventory,
                    reachable_regions: &self.reachable_regions,
                    rules: &graph.rules,
                };
                let mut new_regions: Vec<(RegionId, ConnectionIdx)> = vec![];
                for (conn_idx, conn) in graph.connections.iter().enumerate() {
                    if !self.reachable_regions[conn.src]
                        || self.reachable_regions[conn.dst]
                        || new_regions.iter().any(|&(r, _)| r == conn.dst)
                    {
                        continue;
                    }
                    if apply_requirement(&conn.requirement, &cx) {
                        new_regions.push((conn.dst, conn_idx));
                    }
                }
                let mut new_locations: Vec<LocationIdx> = vec![];
                for (loc_idx, loc) in graph.locations.iter().enumerate() {
                    if !self.reachable_regions[loc.region] || self.location_step[loc_idx].is_some()
                    {
                        continue;
                    }
                    if apply_requirement(&loc.requirement, &cx) {
                        new_locations.push(loc_idx);
                    }
                }
                (new_regions, new_locations)
            };

            if new_regions.is_empty() && new_locations.is_empty() {
                break;
            }
            for (region, conn_idx) in new_regions {
                self.add_region(region, Some(conn_idx), step_num);
            }
            for loc_idx in new_locations {
                self.add_location(loc_idx, step_num);
            }
        }
        self.finish_step(step_num);
        Ok(())
    }

    pub fn reachable_sets(&self) -> ReachableSets {
        ReachableSets {
            regions: (0..self.reachable_regions.len())
                .filter(|&r| self.reachable_regions[r])
                .collect(),
            locations: (0..self.location_step.len())
                .filter(|&l| self.location_step[l].is_some())
                .collect(),
        }
    }
}

// One-shot search from the root region.
pub fn get_reachable_sets(
    graph: &WorldGraph,
    inventory: &InventoryState,
) -> Result<ReachableSets, GenerationError> {
    let mut traverser = Traverser::new(graph);
    traverser.traverse(graph, inventory, 0)?;
    Ok(traverser.reachable_sets())
}

// Connections taken from the root region to reach `region`, in travel order.
pub fn get_spoiler_route(
    traverser: &Traverser,
    graph: &WorldGraph,
    region: RegionId,
) -> Vec<ConnectionIdx> {
    let mut route: Vec<ConnectionIdx> = vec![];
    let mut region = region;
    while let Some(conn_idx) = traverser.region_trail[region] {
        route.push(conn_idx);
        region = graph.connections[conn_idx].src;
        if route.len() > graph.connections.len() {
            break;
        }
    }
    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use multirando_game::{ItemClassification, Requirement};

    // Menu -> A (free) -> B (needs key) -> C (needs B reachable and lamp)
    fn make_graph() -> WorldGraph {
        let mut graph = WorldGraph::new(0, "Alice", "Test Game");
        for name in ["Menu", "A", "B", "C"] {
            graph.add_region(name).unwrap();
        }
        graph
            .define_item("Key", Some(1), ItemClassification::Progression)
            .unwrap();
        graph
            .define_item("Lamp", Some(2), ItemClassification::Progression)
            .unwrap();
        graph.connect_by_name("Menu", "A", None, Requirement::Free).unwrap();
        let key = graph.has("Key");
        graph.connect_by_name("A", "B", None, key).unwrap();
        let lamp = graph.has("Lamp");
        let req = Requirement::make_and(vec![graph.region_reachable("B").unwrap(), lamp]);
        graph.connect_by_name("A", "C", None, req).unwrap();
        let a = graph.get_region("A").unwrap();
        let b = graph.get_region("B").unwrap();
        let c = graph.get_region("C").unwrap();
        graph.add_location(a, "Chest A", Some(10), Requirement::Free).unwrap();
        let count = graph.count_ge("Key", 2);
        graph.add_location(b, "Chest B", Some(11), count).unwrap();
        graph.add_location(c, "Chest C", Some(12), Requirement::Free).unwrap();
        graph.validate().unwrap();
        graph
    }

    fn inventory(graph: &WorldGraph, items: &[(&str, u32)]) -> InventoryState {
        let mut inventory = InventoryState::new(graph.item_isv.len());
        for &(name, count) in items {
            inventory.add(graph.get_item(name).unwrap(), count);
        }
        inventory
    }

    #[test]
    fn test_fixpoint() {
        let graph = make_graph();
        let sets = get_reachable_sets(&graph, &inventory(&graph, &[])).unwrap();
        assert_eq!(sets.regions, HashSet::from([0, 1]));
        assert_eq!(sets.locations, HashSet::from([0]));

        let sets =
            get_reachable_sets(&graph, &inventory(&graph, &[("Key", 1), ("Lamp", 1)])).unwrap();
        assert_eq!(sets.regions, HashSet::from([0, 1, 2, 3]));
        assert_eq!(sets.locations, HashSet::from([0, 2]));

        let sets =
            get_reachable_sets(&graph, &inventory(&graph, &[("Key", 2), ("Lamp", 1)])).unwrap();
        assert_eq!(sets.locations, HashSet::from([0, 1, 2]));
    }

    #[test]
    fn test_region_predicate_needs_other_region() {
        let graph = make_graph();
        let sets = get_reachable_sets(&graph, &inventory(&graph, &[("Lamp", 1)])).unwrap();
        assert!(!sets.regions.contains(&3));
    }

    #[test]
    fn test_monotonic() {
        let graph = make_graph();
        let subsets: Vec<Vec<(&str, u32)>> = vec![
            vec![],
            vec![("Key", 1)],
            vec![("Key", 1), ("Lamp", 1)],
            vec![("Key", 2), ("Lamp", 1)],
        ];
        let mut prev = ReachableSets::default();
        for items in &subsets {
            let sets = get_reachable_sets(&graph, &inventory(&graph, items)).unwrap();
            assert!(prev.regions.is_subset(&sets.regions));
            assert!(prev.locations.is_subset(&sets.locations));
            prev = sets;
        }
    }

    #[test]
    fn test_incremental_and_pop() {
        let graph = make_graph();
        let mut inv = inventory(&graph, &[]);
        let mut traverser = Traverser::new(&graph);
        traverser.traverse(&graph, &inv, 1).unwrap();
        assert!(traverser.is_current(&inv));
        assert_eq!(traverser.num_reachable_locations(), 1);

        inv.add(graph.get_item("Key").unwrap(), 1);
        assert!(!traverser.is_current(&inv));
        let mut tentative = inv.clone();
        tentative.add(graph.get_item("Lamp").unwrap(), 1);
        traverser.traverse(&graph, &tentative, 2).unwrap();
        assert!(traverser.is_location_reachable(2));
        assert_eq!(traverser.region_step[3], Some(2));

        traverser.pop_step();
        assert!(!traverser.is_region_reachable(3));
        assert!(!traverser.is_location_reachable(2));
        assert!(traverser.is_location_reachable(0));

        traverser.traverse(&graph, &inv, 2).unwrap();
        assert!(traverser.is_region_reachable(2));
        assert!(!traverser.is_region_reachable(3));
    }

    #[test]
    fn test_spoiler_route() {
        let graph = make_graph();
        let inv = inventory(&graph, &[("Key", 1), ("Lamp", 1)]);
        let mut traverser = Traverser::new(&graph);
        traverser.traverse(&graph, &inv, 0).unwrap();
        let route: Vec<&str> = get_spoiler_route(&traverser, &graph, 3)
            .into_iter()
            .map(|c| graph.connections[c].name.as_str())
            .collect();
        assert_eq!(route, vec!["Menu -> A", "A -> C"]);
    }
}
