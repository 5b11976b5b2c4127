use std::str::FromStr;

use multirando_game::ConfigError;
use serde_json::{Value, json};
use strum::VariantNames;
use strum_macros::{Display, EnumString, VariantNames};

use super::locations::Area;
use crate::settings::{OptionKind, OptionSpec, ResolvedOptions};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum Goal {
    StealBell,
    AllMainGoals,
    AllGoals,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum StartingArea {
    Garden,
    HighStreet,
    BackGardens,
    Pub,
    Random,
}

impl StartingArea {
    pub fn area(self) -> Option<Area> {
        match self {
            StartingArea::Garden => Some(Area::Garden),
            StartingArea::HighStreet => Some(Area::HighStreet),
            StartingArea::BackGardens => Some(Area::BackGardens),
            StartingArea::Pub => Some(Area::Pub),
            StartingArea::Random => None,
        }
    }
}

// (option name, display name, item name, default weight)
pub const FILLER_WEIGHTS: [(&str, &str, &str, i64); 4] = [
    ("filler_weight_mega_honk", "Filler Weight: Mega Honk", "Mega Honk", 10),
    ("filler_weight_speedy_feet", "Filler Weight: Speedy Feet", "Speedy Feet", 10),
    ("filler_weight_silent_steps", "Filler Weight: Silent Steps", "Silent Steps", 5),
    ("filler_weight_goose_day", "Filler Weight: A Goose Day", "A Goose Day", 10),
];

pub const TRAP_WEIGHTS: [(&str, &str, &str, i64); 4] = [
    ("trap_weight_tired_goose", "Trap Weight: Tired Goose", "Tired Goose", 5),
    ("trap_weight_confused_feet", "Trap Weight: Confused Feet", "Confused Feet", 5),
    ("trap_weight_butterbeak", "Trap Weight: Butterbeak", "Butterbeak", 5),
    ("trap_weight_suspicious_goose", "Trap Weight: Suspicious Goose", "Suspicious Goose", 5),
];

#[derive(Clone, Debug)]
pub struct GooseOptions {
    pub starting_area: StartingArea,
    pub include_extra_goals: bool,
    pub include_speedrun_goals: bool,
    pub include_item_pickups: bool,
    pub include_drag_items: bool,
    pub include_interactions: bool,
    pub include_npc_souls: bool,
    pub include_prop_souls: bool,
    pub filler_weights: Vec<(&'static str, u32)>, // (item name, weight)
    pub trap_weights: Vec<(&'static str, u32)>,
    pub goal: Goal,
    pub death_link: bool,
}

fn toggle(
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    default: bool,
) -> OptionSpec {
    OptionSpec {
        name,
        display_name,
        description,
        kind: OptionKind::Toggle { default },
    }
}

fn weight(name: &'static str, display_name: &'static str, default: i64) -> OptionSpec {
    OptionSpec {
        name,
        display_name,
        description: "Relative weight of this item when padding the pool. 0 disables it.",
        kind: OptionKind::Range {
            min: 0,
            max: 100,
            default,
        },
    }
}

pub fn option_specs() -> Vec<OptionSpec> {
    let mut specs = vec![
        OptionSpec {
            name: "starting_area",
            display_name: "Starting Area",
            description: "Area unlocked from the start. Model Village is never a starting area.",
            kind: OptionKind::Choice {
                choices: StartingArea::VARIANTS,
                default: 4,
            },
        },
        toggle(
            "include_extra_goals",
            "Include Extra Goals",
            "Post-game extra goals become locations.",
            false,
        ),
        toggle(
            "include_speedrun_goals",
            "Include Speedrun Goals",
            "Completing an area before noon becomes a location.",
            false,
        ),
        toggle(
            "include_item_pickups",
            "Include Item Pickups",
            "First pickup of each item becomes a location.",
            true,
        ),
        toggle(
            "include_drag_items",
            "Include Drag Items",
            "First drag of each heavy item becomes a location.",
            true,
        ),
        toggle(
            "include_interactions",
            "Include Interactions",
            "Ringing bells, spinning windmills and similar become locations.",
            true,
        ),
        toggle(
            "include_npc_souls",
            "Include NPC Souls",
            "NPCs are absent until their soul item is received.",
            true,
        ),
        toggle(
            "include_prop_souls",
            "Include Prop Souls",
            "Props cannot be picked up or dragged until their soul item is received.",
            true,
        ),
    ];
    for &(name, display_name, _, default) in FILLER_WEIGHTS.iter().chain(TRAP_WEIGHTS.iter()) {
        specs.push(weight(name, display_name, default));
    }
    specs.push(OptionSpec {
        name: "goal",
        display_name: "Goal",
        description: "What is required to complete the game.",
        kind: OptionKind::Choice {
            choices: Goal::VARIANTS,
            default: 0,
        },
    });
    specs.push(toggle(
        "death_link",
        "Death Link",
        "Getting shooed is shared with every linked player.",
        false,
    ));
    specs
}

fn parse_choice<T: FromStr>(
    options: &ResolvedOptions,
    name: &str,
    variants: &[&str],
) -> Result<T, ConfigError> {
    let idx = options.choice(name)?;
    variants
        .get(idx)
        .and_then(|v| T::from_str(v).ok())
        .ok_or_else(|| ConfigError::InvalidOption {
            option: name.to_string(),
            reason: format!("no choice #{idx}"),
        })
}

fn parse_weights(
    options: &ResolvedOptions,
    table: &[(&'static str, &'static str, &'static str, i64)],
) -> Result<Vec<(&'static str, u32)>, ConfigError> {
    table
        .iter()
        .map(|&(name, _, item, _)| Ok((item, options.range(name)? as u32)))
        .collect()
}

impl GooseOptions {
    pub fn parse(options: &ResolvedOptions) -> Result<Self, ConfigError> {
        Ok(GooseOptions {
            starting_area: parse_choice(options, "starting_area", StartingArea::VARIANTS)?,
            include_extra_goals: options.toggle("include_extra_goals")?,
            include_speedrun_goals: options.toggle("include_speedrun_goals")?,
            include_item_pickups: options.toggle("include_item_pickups")?,
            include_drag_items: options.toggle("include_drag_items")?,
            include_interactions: options.toggle("include_interactions")?,
            include_npc_souls: options.toggle("include_npc_souls")?,
            include_prop_souls: options.toggle("include_prop_souls")?,
            filler_weights: parse_weights(options, &FILLER_WEIGHTS)?,
            trap_weights: parse_weights(options, &TRAP_WEIGHTS)?,
            goal: parse_choice(options, "goal", Goal::VARIANTS)?,
            death_link: options.toggle("death_link")?,
        })
    }

    pub fn to_json(&self) -> Value {
        let weights: serde_json::Map<String, Value> = self
            .filler_weights
            .iter()
            .chain(self.trap_weights.iter())
            .map(|(item, w)| (item.to_string(), json!(w)))
            .collect();
        json!({
            "starting_area": self.starting_area.to_string(),
            "include_extra_goals": self.include_extra_goals,
            "include_speedrun_goals": self.include_speedrun_goals,
            "include_item_pickups": self.include_item_pickups,
            "include_drag_items": self.include_drag_items,
            "include_interactions": self.include_interactions,
            "include_npc_souls": self.include_npc_souls,
            "include_prop_souls": self.include_prop_souls,
            "weights": weights,
            "goal": self.goal.to_string(),
            "death_link": self.death_link,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::normalize_options;
    use serde_json::Map;

    #[test]
    fn test_defaults() {
        let resolved = normalize_options(&option_specs(), &Map::new()).unwrap();
        let options = GooseOptions::parse(&resolved).unwrap();
        assert_eq!(options.starting_area, StartingArea::Random);
        assert_eq!(options.goal, Goal::StealBell);
        assert!(!options.include_extra_goals);
        assert!(options.include_item_pickups);
        assert!(options.include_prop_souls);
        assert!(!options.death_link);
        assert_eq!(options.filler_weights[2], ("Silent Steps", 5));
        assert_eq!(options.trap_weights[0], ("Tired Goose", 5));
    }

    #[test]
    fn test_choice_names() {
        assert_eq!(
            StartingArea::VARIANTS,
            &["garden", "high_street", "back_gardens", "pub", "random"]
        );
        assert_eq!(Goal::VARIANTS, &["steal_bell", "all_main_goals", "all_goals"]);
        let raw = json!({"goal": 2, "starting_area": "pub"});
        let resolved = normalize_options(&option_specs(), raw.as_object().unwrap()).unwrap();
        let options = GooseOptions::parse(&resolved).unwrap();
        assert_eq!(options.goal, Goal::AllGoals);
        assert_eq!(options.starting_area, StartingArea::Pub);
    }
}
