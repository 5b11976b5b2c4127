use hashbrown::HashSet;
use multirando_game::{ConfigError, ItemIdx, Requirement, WorldGraph};
use multirando_logic::helpers::{collect_item_refs, is_inventory_only};
use multirando_logic::{InventoryState, LogicContext, apply_requirement};

// A player's victory condition. Oracles are built once per generation and queried many times,
// possibly from several threads.
pub trait CompletionOracle: Send + Sync {
    fn is_complete(&self, inventory: &InventoryState) -> bool;

    // Items the condition depends on; these must all be progression items.
    fn referenced_items(&self) -> HashSet<ItemIdx>;

    fn describe(&self) -> String;
}

pub struct RequirementOracle {
    requirement: Requirement,
    rules: Vec<Option<Requirement>>,
    description: String,
}

impl RequirementOracle {
    pub fn new(world: &WorldGraph, requirement: Requirement) -> Result<Self, ConfigError> {
        if !is_inventory_only(&requirement, &world.rules) {
            return Err(ConfigError::OracleNotInventoryOnly {
                player: world.player_name.clone(),
            });
        }
        Ok(RequirementOracle {
            description: world.describe_requirement(&requirement),
            rules: world.rules.clone(),
            requirement,
        })
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

impl CompletionOracle for RequirementOracle {
    fn is_complete(&self, inventory: &InventoryState) -> bool {
        let cx = LogicContext::inventory_only(inventory, &self.rules);
        apply_requirement(&self.requirement, &cx)
    }

    fn referenced_items(&self) -> HashSet<ItemIdx> {
        collect_item_refs(&self.requirement, &self.rules)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
