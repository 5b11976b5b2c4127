pub mod untitled_goose;

use multirando_game::{ConfigError, PlayerId};
use rand::rngs::StdRng;
use serde_json::{Map, Value};

use crate::plugin::{GamePlugin, PlayerWorld, generate_player_world as generate_with};
use crate::settings::OptionSpec;
use untitled_goose::UntitledGoosePlugin;

pub const GAME_NAMES: [&str; 1] = [untitled_goose::GAME_NAME];

pub fn game_options(game: &str) -> Result<Vec<OptionSpec>, ConfigError> {
    match game {
        untitled_goose::GAME_NAME => Ok(UntitledGoosePlugin.get_options()),
        _ => Err(ConfigError::UnknownGame(game.to_string())),
    }
}

// Dispatches world construction to the plugin registered under `game`.
pub fn generate_player_world(
    game: &str,
    player: PlayerId,
    player_name: &str,
    options: &Map<String, Value>,
    rng: &mut StdRng,
) -> Result<PlayerWorld, ConfigError> {
    match game {
        untitled_goose::GAME_NAME => {
            generate_with(&UntitledGoosePlugin, player, player_name, options, rng)
        }
        _ => Err(ConfigError::UnknownGame(game.to_string())),
    }
}
