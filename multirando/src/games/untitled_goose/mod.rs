pub mod items;
pub mod locations;
pub mod options;
pub mod regions;
pub mod rules;

use multirando_game::{ConfigError, WorldGraph};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde_json::Value;

use crate::completion::CompletionOracle;
use crate::plugin::{GamePlugin, ItemPool};
use crate::settings::{OptionSpec, ResolvedOptions};
use locations::construction_trace;
use options::{GooseOptions, StartingArea};

pub const GAME_NAME: &str = "Untitled Goose Game";
pub const ID_BASE: u64 = 119_000_000;

const RANDOM_STARTING_AREAS: [StartingArea; 4] = [
    StartingArea::Garden,
    StartingArea::HighStreet,
    StartingArea::BackGardens,
    StartingArea::Pub,
];

pub struct UntitledGoosePlugin;

impl GamePlugin for UntitledGoosePlugin {
    type Options = GooseOptions;

    fn game_name(&self) -> &'static str {
        GAME_NAME
    }

    fn get_options(&self) -> Vec<OptionSpec> {
        options::option_specs()
    }

    fn parse_options(&self, options: &ResolvedOptions) -> Result<GooseOptions, ConfigError> {
        GooseOptions::parse(options)
    }

    fn generate_early(&self, options: &mut GooseOptions, rng: &mut StdRng) {
        if options.starting_area == StartingArea::Random {
            if let Some(&area) = RANDOM_STARTING_AREAS.choose(rng) {
                options.starting_area = area;
            }
        }
    }

    fn create_regions(
        &self,
        world: &mut WorldGraph,
        options: &GooseOptions,
    ) -> Result<(), ConfigError> {
        regions::create_regions(world, &construction_trace(options))
    }

    fn create_items(
        &self,
        world: &mut WorldGraph,
        options: &GooseOptions,
        rng: &mut StdRng,
    ) -> Result<ItemPool, ConfigError> {
        items::create_items(world, options, &construction_trace(options), rng)
    }

    fn set_rules(
        &self,
        world: &mut WorldGraph,
        options: &GooseOptions,
    ) -> Result<Box<dyn CompletionOracle>, ConfigError> {
        rules::set_rules(world, options, &construction_trace(options))
    }

    fn describe_options(&self, options: &GooseOptions) -> Value {
        options.to_json()
    }
}
