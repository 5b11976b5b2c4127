pub mod helpers;

use multirando_game::{ItemIdx, RegionId, Requirement};
use serde::{Deserialize, Serialize};

// Simulated item holdings of one player. Counts are indexed by the player's ItemIdx.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    pub counts: Vec<u32>,
    // Bumped on every add; a traversal synced to an older generation is stale.
    generation: u64,
}

impl InventoryState {
    pub fn new(num_items: usize) -> Self {
        InventoryState {
            counts: vec![0; num_items],
            generation: 0,
        }
    }

    pub fn add(&mut self, item: ItemIdx, count: u32) {
        if item >= self.counts.len() {
            self.counts.resize(item + 1, 0);
        }
        self.counts[item] = self.counts[item].saturating_add(count);
        self.generation += 1;
    }

    pub fn count(&self, item: ItemIdx) -> u32 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn has(&self, item: ItemIdx) -> bool {
        self.count(item) > 0
    }

    pub fn has_all(&self, items: &[ItemIdx]) -> bool {
        items.iter().all(|&item| self.has(item))
    }

    pub fn has_any(&self, items: &[ItemIdx]) -> bool {
        items.iter().any(|&item| self.has(item))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // Held items with their counts, in index order.
    pub fn items(&self) -> impl Iterator<Item = (ItemIdx, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| if c > 0 { Some((i, c)) } else { None })
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().fold(0, |total, &c| total.saturating_add(c))
    }
}

pub struct LogicContext<'a> {
    pub inventory: &'a InventoryState,
    pub reachable_regions: &'a [bool], // Indexed by RegionId
    pub rules: &'a [Option<Requirement>], // Indexed by RuleId
}

impl<'a> LogicContext<'a> {
    // Context for inventory-only requirements (completion conditions): no region is reachable.
    pub fn inventory_only(inventory: &'a InventoryState, rules: &'a [Option<Requirement>]) -> Self {
        LogicContext {
            inventory,
            reachable_regions: &[],
            rules,
        }
    }

    fn region_reachable(&self, region: RegionId) -> bool {
        self.reachable_regions.get(region).copied().unwrap_or(false)
    }
}

pub fn apply_requirement(req: &Requirement, cx: &LogicContext) -> bool {
    match req {
        Requirement::Free => true,
        Requirement::Never => false,
        Requirement::Item(item) => cx.inventory.has(*item),
        Requirement::ItemCount(item, count) => cx.inventory.count(*item) >= *count,
        Requirement::AllItems(items) => cx.inventory.has_all(items),
        Requirement::AnyItem(items) => cx.inventory.has_any(items),
        Requirement::Region(region) => cx.region_reachable(*region),
        Requirement::Rule(rule) => match cx.rules.get(*rule) {
            Some(Some(rule_req)) => apply_requirement(rule_req, cx),
            _ => false,
        },
        Requirement::Not(inner) => !apply_requirement(inner, cx),
        Requirement::And(reqs) => reqs.iter().all(|r| apply_requirement(r, cx)),
        Requirement::Or(reqs) => reqs.iter().any(|r| apply_requirement(r, cx)),
    }
}
