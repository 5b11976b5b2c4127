pub mod error;
pub mod graph;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::borrow::ToOwned;
use std::hash::Hash;
use strum_macros::{Display, EnumString, VariantNames};

pub use crate::error::ConfigError;
pub use crate::graph::{Connection, ItemDef, Location, Region, WorldGraph};

pub type PlayerId = usize; // Index into Multiworld.worlds (0-based; shown to users as the player name)
pub type RegionId = usize; // Index into WorldGraph.region_isv.keys: distinct region names of one player
pub type ConnectionIdx = usize; // Index into WorldGraph.connections
pub type LocationIdx = usize; // Index into WorldGraph.locations
pub type LocationId = u64; // Stable numeric location id, unique within a player's namespace
pub type ItemIdx = usize; // Index into WorldGraph.item_isv.keys: every item name defined or referenced by a player
pub type ItemCode = u64; // Stable numeric item id (events have none)
pub type RuleId = usize; // Index into WorldGraph.rule_isv.keys: named shared requirements

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        if !self.index_by_key.contains_key(&name.to_owned()) {
            let idx = self.keys.len();
            self.index_by_key.insert(name.to_owned(), self.keys.len());
            self.keys.push(name.to_owned());
            idx
        } else {
            self.index_by_key[&name.to_owned()]
        }
    }

    pub fn get<U: ToOwned<Owned = T> + ?Sized>(&self, name: &U) -> Option<usize> {
        self.index_by_key.get(&name.to_owned()).copied()
    }

    pub fn contains<U: ToOwned<Owned = T> + ?Sized>(&self, name: &U) -> bool {
        self.index_by_key.contains_key(&name.to_owned())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
pub enum ItemClassification {
    // Gates access to regions, locations, or the completion condition.
    Progression,
    Useful,
    Filler,
    Trap,
}

impl ItemClassification {
    pub fn is_progression(self) -> bool {
        self == ItemClassification::Progression
    }
}

// An item owned by a particular player. Items in the shared pool may be placed in any player's location.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemRef {
    pub player: PlayerId,
    pub item: ItemIdx,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationRef {
    pub player: PlayerId,
    pub location: LocationIdx,
}

// Access predicates, compiled against one player's graph: item and region references are indices
// into that player's registries, so a requirement can never read another player's state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    Free,
    Never,
    Item(ItemIdx),
    ItemCount(ItemIdx, u32),
    AllItems(Vec<ItemIdx>),
    AnyItem(Vec<ItemIdx>),
    Region(RegionId),
    Rule(RuleId),
    Not(Box<Requirement>),
    And(Vec<Requirement>),
    Or(Vec<Requirement>),
}

impl Requirement {
    pub fn make_and(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                return Requirement::Never;
            } else if let Requirement::Free = req {
                continue;
            } else if let Requirement::And(and_reqs) = req {
                out_reqs.extend(and_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        match out_reqs.len() {
            0 => Requirement::Free,
            1 => out_reqs.remove(0),
            _ => Requirement::And(out_reqs),
        }
    }

    pub fn make_or(reqs: Vec<Requirement>) -> Requirement {
        let mut out_reqs: Vec<Requirement> = vec![];
        for req in reqs {
            if let Requirement::Never = req {
                continue;
            } else if let Requirement::Free = req {
                return Requirement::Free;
            } else if let Requirement::Or(or_reqs) = req {
                out_reqs.extend(or_reqs);
            } else {
                out_reqs.push(req);
            }
        }
        match out_reqs.len() {
            0 => Requirement::Never,
            1 => out_reqs.remove(0),
            _ => Requirement::Or(out_reqs),
        }
    }

    pub fn make_not(req: Requirement) -> Requirement {
        match req {
            Requirement::Free => Requirement::Never,
            Requirement::Never => Requirement::Free,
            Requirement::Not(inner) => *inner,
            other => Requirement::Not(Box::new(other)),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Requirement::Free)
    }

    // Calls `f` on this requirement and every sub-requirement, without following named rules.
    pub fn visit<F: FnMut(&Requirement)>(&self, f: &mut F) {
        f(self);
        match self {
            Requirement::Not(inner) => inner.visit(f),
            Requirement::And(reqs) | Requirement::Or(reqs) => {
                for req in reqs {
                    req.visit(f);
                }
            }
            _ => {}
        }
    }

    pub fn referenced_items(&self) -> Vec<ItemIdx> {
        let mut out: Vec<ItemIdx> = vec![];
        self.visit(&mut |req| match req {
            Requirement::Item(item) | Requirement::ItemCount(item, _) => out.push(*item),
            Requirement::AllItems(items) | Requirement::AnyItem(items) => {
                out.extend(items.iter().copied())
            }
            _ => {}
        });
        out
    }

    pub fn referenced_regions(&self) -> Vec<RegionId> {
        let mut out: Vec<RegionId> = vec![];
        self.visit(&mut |req| {
            if let Requirement::Region(region) = req {
                out.push(*region);
            }
        });
        out
    }

    pub fn referenced_rules(&self) -> Vec<RuleId> {
        let mut out: Vec<RuleId> = vec![];
        self.visit(&mut |req| {
            if let Requirement::Rule(rule) = req {
                out.push(*rule);
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_and_flattens() {
        let req = Requirement::make_and(vec![
            Requirement::Free,
            Requirement::Item(0),
            Requirement::make_and(vec![Requirement::Item(1), Requirement::Region(2)]),
        ]);
        assert_eq!(
            req,
            Requirement::And(vec![
                Requirement::Item(0),
                Requirement::Item(1),
                Requirement::Region(2)
            ])
        );
        assert_eq!(Requirement::make_and(vec![]), Requirement::Free);
        assert_eq!(
            Requirement::make_and(vec![Requirement::Item(0), Requirement::Never]),
            Requirement::Never
        );
    }

    #[test]
    fn test_make_or_short_circuits() {
        assert_eq!(
            Requirement::make_or(vec![Requirement::Item(3), Requirement::Free]),
            Requirement::Free
        );
        assert_eq!(
            Requirement::make_or(vec![Requirement::Never, Requirement::Item(3)]),
            Requirement::Item(3)
        );
        assert_eq!(Requirement::make_or(vec![]), Requirement::Never);
    }

    #[test]
    fn test_referenced_items() {
        let req = Requirement::make_and(vec![
            Requirement::AllItems(vec![1, 2]),
            Requirement::make_not(Requirement::ItemCount(4, 3)),
            Requirement::make_or(vec![Requirement::AnyItem(vec![5]), Requirement::Rule(0)]),
        ]);
        let mut items = req.referenced_items();
        items.sort();
        assert_eq!(items, vec![1, 2, 4, 5]);
        assert_eq!(req.referenced_rules(), vec![0]);
        assert!(req.referenced_regions().is_empty());
    }

    #[test]
    fn test_indexed_vec() {
        let mut isv: IndexedVec<String> = IndexedVec::default();
        assert_eq!(isv.add("Menu"), 0);
        assert_eq!(isv.add("Hub"), 1);
        assert_eq!(isv.add("Menu"), 0);
        assert_eq!(isv.get("Hub"), Some(1));
        assert_eq!(isv.get("Pub"), None);
        assert_eq!(isv.len(), 2);
    }
}
