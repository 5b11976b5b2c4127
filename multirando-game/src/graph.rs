use std::collections::VecDeque;

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ConnectionIdx, IndexedVec, ItemClassification, ItemCode, ItemIdx, ItemRef,
    LocationId, LocationIdx, PlayerId, RegionId, Requirement, RuleId,
};

#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub exits: Vec<ConnectionIdx>,
    pub entrances: Vec<ConnectionIdx>,
    pub locations: Vec<LocationIdx>,
}

#[derive(Clone, Debug)]
pub struct Connection {
    pub name: String,
    pub src: RegionId,
    pub dst: RegionId,
    pub requirement: Requirement,
}

#[derive(Clone, Debug)]
pub struct Location {
    pub name: String,
    pub id: Option<LocationId>, // None for event locations
    pub region: RegionId,
    pub requirement: Requirement,
    pub item: Option<ItemRef>,
    pub locked: bool, // if true, the item was placed during world construction and fill must not touch it
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    pub code: Option<ItemCode>, // None for event items
    pub classification: ItemClassification,
}

// The entity graph of one player: regions, gated connections, locations, and the item and rule
// registries that requirements are compiled against.
#[derive(Clone, Debug)]
pub struct WorldGraph {
    pub player: PlayerId,
    pub player_name: String,
    pub game: String,
    pub region_isv: IndexedVec<String>,
    pub regions: Vec<Region>, // Corresponds to region_isv.keys
    pub connection_isv: IndexedVec<String>,
    pub connections: Vec<Connection>, // Corresponds to connection_isv.keys
    pub location_isv: IndexedVec<String>,
    pub locations: Vec<Location>, // Corresponds to location_isv.keys
    pub location_by_id: HashMap<LocationId, LocationIdx>,
    pub item_isv: IndexedVec<String>,
    pub item_defs: Vec<Option<ItemDef>>, // Corresponds to item_isv.keys; None while only referenced
    pub item_by_code: HashMap<ItemCode, ItemIdx>,
    pub rule_isv: IndexedVec<String>,
    pub rules: Vec<Option<Requirement>>, // Corresponds to rule_isv.keys; None while only referenced
}

impl WorldGraph {
    pub fn new(player: PlayerId, player_name: &str, game: &str) -> Self {
        WorldGraph {
            player,
            player_name: player_name.to_string(),
            game: game.to_string(),
            region_isv: IndexedVec::default(),
            regions: vec![],
            connection_isv: IndexedVec::default(),
            connections: vec![],
            location_isv: IndexedVec::default(),
            locations: vec![],
            location_by_id: HashMap::new(),
            item_isv: IndexedVec::default(),
            item_defs: vec![],
            item_by_code: HashMap::new(),
            rule_isv: IndexedVec::default(),
            rules: vec![],
        }
    }

    // The first region added is the origin of every traversal.
    pub fn root(&self) -> RegionId {
        0
    }

    pub fn add_region(&mut self, name: &str) -> Result<RegionId, ConfigError> {
        if self.region_isv.contains(name) {
            return Err(ConfigError::DuplicateRegion {
                player: self.player_name.clone(),
                name: name.to_string(),
            });
        }
        let region_id = self.region_isv.add(name);
        self.regions.push(Region {
            name: name.to_string(),
            exits: vec![],
            entrances: vec![],
            locations: vec![],
        });
        Ok(region_id)
    }

    pub fn get_region(&self, name: &str) -> Result<RegionId, ConfigError> {
        self.region_isv
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRegion {
                player: self.player_name.clone(),
                name: name.to_string(),
            })
    }

    fn check_region(&self, region_id: RegionId) -> Result<(), ConfigError> {
        if region_id >= self.regions.len() {
            return Err(ConfigError::UnknownRegion {
                player: self.player_name.clone(),
                name: format!("#{region_id}"),
            });
        }
        Ok(())
    }

    pub fn connect(
        &mut self,
        src: RegionId,
        dst: RegionId,
        label: Option<&str>,
        requirement: Requirement,
    ) -> Result<ConnectionIdx, ConfigError> {
        self.check_region(src)?;
        self.check_region(dst)?;
        let name = match label {
            Some(label) => label.to_string(),
            None => format!(
                "{} -> {}",
                self.region_isv.keys[src], self.region_isv.keys[dst]
            ),
        };
        if self.connection_isv.contains(&name) {
            return Err(ConfigError::DuplicateConnection {
                player: self.player_name.clone(),
                name,
            });
        }
        let conn_idx = self.connection_isv.add(&name);
        self.connections.push(Connection {
            name,
            src,
            dst,
            requirement,
        });
        self.regions[src].exits.push(conn_idx);
        self.regions[dst].entrances.push(conn_idx);
        Ok(conn_idx)
    }

    pub fn connect_by_name(
        &mut self,
        src: &str,
        dst: &str,
        label: Option<&str>,
        requirement: Requirement,
    ) -> Result<ConnectionIdx, ConfigError> {
        let src_id = self.get_region(src)?;
        let dst_id = self.get_region(dst)?;
        self.connect(src_id, dst_id, label, requirement)
    }

    pub fn get_connection(&self, name: &str) -> Result<ConnectionIdx, ConfigError> {
        self.connection_isv
            .get(name)
            .ok_or_else(|| ConfigError::UnknownConnection {
                player: self.player_name.clone(),
                name: name.to_string(),
            })
    }

    pub fn add_location(
        &mut self,
        region_id: RegionId,
        name: &str,
        id: Option<LocationId>,
        requirement: Requirement,
    ) -> Result<LocationIdx, ConfigError> {
        self.check_region(region_id)?;
        if self.location_isv.contains(name) {
            return Err(ConfigError::DuplicateLocation {
                player: self.player_name.clone(),
                name: name.to_string(),
            });
        }
        if let Some(id) = id {
            if let Some(&existing) = self.location_by_id.get(&id) {
                return Err(ConfigError::DuplicateLocationId {
                    player: self.player_name.clone(),
                    id,
                    name: name.to_string(),
                    existing: self.locations[existing].name.clone(),
                });
            }
        }
        let loc_idx = self.location_isv.add(name);
        if let Some(id) = id {
            self.location_by_id.insert(id, loc_idx);
        }
        self.locations.push(Location {
            name: name.to_string(),
            id,
            region: region_id,
            requirement,
            item: None,
            locked: false,
        });
        self.regions[region_id].locations.push(loc_idx);
        Ok(loc_idx)
    }

    pub fn get_location(&self, name: &str) -> Result<LocationIdx, ConfigError> {
        self.location_isv
            .get(name)
            .ok_or_else(|| ConfigError::UnknownLocation {
                player: self.player_name.clone(),
                name: name.to_string(),
            })
    }

    // Registers an item name (defined or not yet defined) and returns its index.
    pub fn item(&mut self, name: &str) -> ItemIdx {
        let item_idx = self.item_isv.add(name);
        if self.item_defs.len() < self.item_isv.len() {
            self.item_defs.resize(self.item_isv.len(), None);
        }
        item_idx
    }

    pub fn define_item(
        &mut self,
        name: &str,
        code: Option<ItemCode>,
        classification: ItemClassification,
    ) -> Result<ItemIdx, ConfigError> {
        let item_idx = self.item(name);
        if self.item_defs[item_idx].is_some() {
            return Err(ConfigError::DuplicateItem {
                player: self.player_name.clone(),
                name: name.to_string(),
            });
        }
        if let Some(code) = code {
            if let Some(&existing) = self.item_by_code.get(&code) {
                return Err(ConfigError::DuplicateItemCode {
                    player: self.player_name.clone(),
                    code,
                    name: name.to_string(),
                    existing: self.item_isv.keys[existing].clone(),
                });
            }
            self.item_by_code.insert(code, item_idx);
        }
        self.item_defs[item_idx] = Some(ItemDef {
            name: name.to_string(),
            code,
            classification,
        });
        Ok(item_idx)
    }

    pub fn get_item(&self, name: &str) -> Result<ItemIdx, ConfigError> {
        match self.item_isv.get(name) {
            Some(item_idx) if self.item_defs[item_idx].is_some() => Ok(item_idx),
            _ => Err(ConfigError::UnknownItem {
                player: self.player_name.clone(),
                name: name.to_string(),
            }),
        }
    }

    pub fn item_def(&self, item_idx: ItemIdx) -> Option<&ItemDef> {
        self.item_defs.get(item_idx).and_then(|x| x.as_ref())
    }

    pub fn item_name(&self, item_idx: ItemIdx) -> &str {
        &self.item_isv.keys[item_idx]
    }

    pub fn has(&mut self, name: &str) -> Requirement {
        Requirement::Item(self.item(name))
    }

    pub fn has_all(&mut self, names: &[&str]) -> Requirement {
        if names.is_empty() {
            return Requirement::Free;
        }
        Requirement::AllItems(names.iter().map(|name| self.item(name)).collect())
    }

    pub fn has_any(&mut self, names: &[&str]) -> Requirement {
        if names.is_empty() {
            return Requirement::Never;
        }
        Requirement::AnyItem(names.iter().map(|name| self.item(name)).collect())
    }

    pub fn count_ge(&mut self, name: &str, count: u32) -> Requirement {
        match count {
            0 => Requirement::Free,
            1 => self.has(name),
            _ => Requirement::ItemCount(self.item(name), count),
        }
    }

    pub fn region_reachable(&self, name: &str) -> Result<Requirement, ConfigError> {
        Ok(Requirement::Region(self.get_region(name)?))
    }

    fn rule_id(&mut self, name: &str) -> RuleId {
        let rule_id = self.rule_isv.add(name);
        if self.rules.len() < self.rule_isv.len() {
            self.rules.resize(self.rule_isv.len(), None);
        }
        rule_id
    }

    // References a named rule, which may be defined later.
    pub fn rule(&mut self, name: &str) -> Requirement {
        Requirement::Rule(self.rule_id(name))
    }

    pub fn define_rule(
        &mut self,
        name: &str,
        requirement: Requirement,
    ) -> Result<RuleId, ConfigError> {
        let rule_id = self.rule_id(name);
        if self.rules[rule_id].is_some() {
            return Err(ConfigError::DuplicateRule {
                player: self.player_name.clone(),
                name: name.to_string(),
            });
        }
        self.rules[rule_id] = Some(requirement);
        Ok(rule_id)
    }

    pub fn set_connection_rule(
        &mut self,
        name: &str,
        requirement: Requirement,
    ) -> Result<(), ConfigError> {
        let conn_idx = self.get_connection(name)?;
        self.connections[conn_idx].requirement = requirement;
        Ok(())
    }

    pub fn set_location_rule(
        &mut self,
        name: &str,
        requirement: Requirement,
    ) -> Result<(), ConfigError> {
        let loc_idx = self.get_location(name)?;
        self.locations[loc_idx].requirement = requirement;
        Ok(())
    }

    pub fn add_location_rule(
        &mut self,
        name: &str,
        requirement: Requirement,
    ) -> Result<(), ConfigError> {
        let loc_idx = self.get_location(name)?;
        let old_req = std::mem::replace(&mut self.locations[loc_idx].requirement, Requirement::Free);
        self.locations[loc_idx].requirement = Requirement::make_and(vec![old_req, requirement]);
        Ok(())
    }

    pub fn place_locked_item(&mut self, location: &str, item: ItemRef) -> Result<(), ConfigError> {
        let loc_idx = self.get_location(location)?;
        let loc = &mut self.locations[loc_idx];
        if loc.item.is_some() {
            return Err(ConfigError::LocationFilled {
                player: self.player_name.clone(),
                name: location.to_string(),
            });
        }
        loc.item = Some(item);
        loc.locked = true;
        Ok(())
    }

    // All requirements attached to the graph: connections, then locations, then named rules.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.connections
            .iter()
            .map(|c| &c.requirement)
            .chain(self.locations.iter().map(|l| &l.requirement))
            .chain(self.rules.iter().flatten())
    }

    pub fn describe_requirement(&self, req: &Requirement) -> String {
        let join = |reqs: &[Requirement], sep: &str| -> String {
            reqs.iter()
                .map(|r| self.describe_requirement(r))
                .collect::<Vec<String>>()
                .join(sep)
        };
        let item_names = |items: &[ItemIdx]| -> String {
            items
                .iter()
                .map(|&i| self.item_name(i).to_string())
                .collect::<Vec<String>>()
                .join(", ")
        };
        match req {
            Requirement::Free => "free".to_string(),
            Requirement::Never => "never".to_string(),
            Requirement::Item(item) => self.item_name(*item).to_string(),
            Requirement::ItemCount(item, count) => format!("{count}x {}", self.item_name(*item)),
            Requirement::AllItems(items) => format!("all of [{}]", item_names(items)),
            Requirement::AnyItem(items) => format!("any of [{}]", item_names(items)),
            Requirement::Region(region) => format!("can reach '{}'", self.regions[*region].name),
            Requirement::Rule(rule) => format!("rule '{}'", self.rule_isv.keys[*rule]),
            Requirement::Not(inner) => format!("not ({})", self.describe_requirement(inner)),
            Requirement::And(reqs) => format!("({})", join(reqs, " and ")),
            Requirement::Or(reqs) => format!("({})", join(reqs, " or ")),
        }
    }

    fn check_rule_cycles(&self) -> Result<(), ConfigError> {
        // 0 = unvisited, 1 = on the DFS stack, 2 = finished
        let mut visit_state: Vec<u8> = vec![0; self.rules.len()];
        let mut stack: Vec<RuleId> = vec![];
        for rule_id in 0..self.rules.len() {
            if visit_state[rule_id] == 0 {
                self.visit_rule(rule_id, &mut visit_state, &mut stack)?;
            }
        }
        Ok(())
    }

    fn visit_rule(
        &self,
        rule_id: RuleId,
        visit_state: &mut [u8],
        stack: &mut Vec<RuleId>,
    ) -> Result<(), ConfigError> {
        visit_state[rule_id] = 1;
        stack.push(rule_id);
        if let Some(req) = &self.rules[rule_id] {
            for dep in req.referenced_rules() {
                match visit_state[dep] {
                    0 => self.visit_rule(dep, visit_state, stack)?,
                    1 => {
                        let start = stack.iter().position(|&r| r == dep).unwrap_or(0);
                        let mut cycle: Vec<String> = stack[start..]
                            .iter()
                            .map(|&r| self.rule_isv.keys[r].clone())
                            .collect();
                        cycle.push(self.rule_isv.keys[dep].clone());
                        return Err(ConfigError::CyclicRule {
                            player: self.player_name.clone(),
                            cycle,
                        });
                    }
                    _ => {}
                }
            }
        }
        stack.pop();
        visit_state[rule_id] = 2;
        Ok(())
    }

    // Build-time checks on the finished graph. Reachability under the full inventory is checked
    // separately, by the search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions {
                player: self.player_name.clone(),
            });
        }
        for (item_idx, def) in self.item_defs.iter().enumerate() {
            if def.is_none() {
                return Err(ConfigError::UnknownItem {
                    player: self.player_name.clone(),
                    name: self.item_isv.keys[item_idx].clone(),
                });
            }
        }
        for (rule_id, rule) in self.rules.iter().enumerate() {
            if rule.is_none() {
                return Err(ConfigError::UnknownRule {
                    player: self.player_name.clone(),
                    name: self.rule_isv.keys[rule_id].clone(),
                });
            }
        }
        self.check_rule_cycles()?;

        for conn in &self.connections {
            let top_level: &[Requirement] = match &conn.requirement {
                Requirement::And(reqs) => reqs,
                other => std::slice::from_ref(other),
            };
            if top_level
                .iter()
                .any(|r| matches!(r, Requirement::Region(region) if *region == conn.dst))
            {
                return Err(ConfigError::SelfGatedConnection {
                    player: self.player_name.clone(),
                    name: conn.name.clone(),
                });
            }
        }

        // Structural connectivity, ignoring requirements:
        let mut seen = vec![false; self.regions.len()];
        let mut queue: VecDeque<RegionId> = VecDeque::new();
        seen[self.root()] = true;
        queue.push_back(self.root());
        while let Some(region_id) = queue.pop_front() {
            for &conn_idx in &self.regions[region_id].exits {
                let dst = self.connections[conn_idx].dst;
                if !seen[dst] {
                    seen[dst] = true;
                    queue.push_back(dst);
                }
            }
        }
        if let Some(region_id) = seen.iter().position(|&x| !x) {
            return Err(ConfigError::DisconnectedRegion {
                player: self.player_name.clone(),
                name: self.regions[region_id].name.clone(),
            });
        }

        debug!(
            "[{}] graph validated: {} regions, {} connections, {} locations, {} items, {} rules",
            self.player_name,
            self.regions.len(),
            self.connections.len(),
            self.locations.len(),
            self.item_isv.len(),
            self.rules.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph() -> WorldGraph {
        let mut graph = WorldGraph::new(0, "Alice", "Test Game");
        graph.add_region("Menu").unwrap();
        graph.add_region("Hub").unwrap();
        graph
            .connect_by_name("Menu", "Hub", None, Requirement::Free)
            .unwrap();
        graph
    }

    #[test]
    fn test_duplicate_region() {
        let mut graph = make_graph();
        let err = graph.add_region("Hub").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRegion { .. }));
    }

    #[test]
    fn test_connect_unknown_region() {
        let mut graph = make_graph();
        let err = graph
            .connect_by_name("Hub", "Garden", None, Requirement::Free)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRegion { ref name, .. } if name == "Garden"));
        let err = graph.connect(0, 7, None, Requirement::Free).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRegion { .. }));
    }

    #[test]
    fn test_default_connection_label() {
        let graph = make_graph();
        assert_eq!(graph.get_connection("Menu -> Hub").unwrap(), 0);
    }

    #[test]
    fn test_duplicate_location_id() {
        let mut graph = make_graph();
        let hub = graph.get_region("Hub").unwrap();
        graph
            .add_location(hub, "Ring the bell", Some(100), Requirement::Free)
            .unwrap();
        let err = graph
            .add_location(hub, "Honk", Some(100), Requirement::Free)
            .unwrap_err();
        match err {
            ConfigError::DuplicateLocationId { id, existing, .. } => {
                assert_eq!(id, 100);
                assert_eq!(existing, "Ring the bell");
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = graph
            .add_location(hub, "Ring the bell", Some(101), Requirement::Free)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLocation { .. }));
    }

    #[test]
    fn test_undefined_item_is_rejected() {
        let mut graph = make_graph();
        let req = graph.has("Rake");
        graph.set_connection_rule("Menu -> Hub", req).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(ConfigError::UnknownItem { ref name, .. }) if name == "Rake"
        ));
        graph
            .define_item("Rake", Some(1), ItemClassification::Progression)
            .unwrap();
        graph.validate().unwrap();
    }

    #[test]
    fn test_cyclic_rules() {
        let mut graph = make_graph();
        let b = graph.rule("b");
        graph.define_rule("a", b).unwrap();
        let c = graph.rule("c");
        graph.define_rule("b", c).unwrap();
        let a = graph.rule("a");
        graph.define_rule("c", a).unwrap();
        match graph.validate() {
            Err(ConfigError::CyclicRule { cycle, .. }) => {
                assert_eq!(cycle, vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected cyclic rule error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_gated_connection() {
        let mut graph = make_graph();
        let req = graph.region_reachable("Hub").unwrap();
        graph.set_connection_rule("Menu -> Hub", req).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(ConfigError::SelfGatedConnection { .. })
        ));
    }

    #[test]
    fn test_disconnected_region() {
        let mut graph = make_graph();
        graph.add_region("Attic").unwrap();
        assert!(matches!(
            graph.validate(),
            Err(ConfigError::DisconnectedRegion { ref name, .. }) if name == "Attic"
        ));
    }

    #[test]
    fn test_locked_item() {
        let mut graph = make_graph();
        let hub = graph.get_region("Hub").unwrap();
        graph
            .add_location(hub, "Milestone", None, Requirement::Free)
            .unwrap();
        let event = graph
            .define_item("Victory", None, ItemClassification::Progression)
            .unwrap();
        let item = ItemRef {
            player: 0,
            item: event,
        };
        graph.place_locked_item("Milestone", item).unwrap();
        assert!(graph.locations[0].locked);
        assert!(matches!(
            graph.place_locked_item("Milestone", item),
            Err(ConfigError::LocationFilled { .. })
        ));
    }
}
