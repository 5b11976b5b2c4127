use crate::{ItemCode, LocationId, PlayerId};

// Build-time failures. Any of these aborts generation for the whole player set.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("[{player}] duplicate region '{name}'")]
    DuplicateRegion { player: String, name: String },

    #[error("[{player}] unknown region '{name}'")]
    UnknownRegion { player: String, name: String },

    #[error("[{player}] duplicate connection '{name}'")]
    DuplicateConnection { player: String, name: String },

    #[error("[{player}] unknown connection '{name}'")]
    UnknownConnection { player: String, name: String },

    #[error("[{player}] duplicate location '{name}'")]
    DuplicateLocation { player: String, name: String },

    #[error("[{player}] location id {id} of '{name}' is already used by '{existing}'")]
    DuplicateLocationId {
        player: String,
        id: LocationId,
        name: String,
        existing: String,
    },

    #[error("[{player}] unknown location '{name}'")]
    UnknownLocation { player: String, name: String },

    #[error("[{player}] duplicate item '{name}'")]
    DuplicateItem { player: String, name: String },

    #[error("[{player}] item code {code} of '{name}' is already used by '{existing}'")]
    DuplicateItemCode {
        player: String,
        code: ItemCode,
        name: String,
        existing: String,
    },

    #[error("[{player}] item '{name}' is referenced but never defined")]
    UnknownItem { player: String, name: String },

    #[error("[{player}] duplicate rule '{name}'")]
    DuplicateRule { player: String, name: String },

    #[error("[{player}] rule '{name}' is referenced but never defined")]
    UnknownRule { player: String, name: String },

    #[error("[{player}] cyclic rule dependency: {}", cycle.join(" -> "))]
    CyclicRule { player: String, cycle: Vec<String> },

    #[error("[{player}] connection '{name}' requires its own destination to be reachable")]
    SelfGatedConnection { player: String, name: String },

    #[error("[{player}] region '{name}' is not connected to the root region")]
    DisconnectedRegion { player: String, name: String },

    #[error("[{player}] world has no regions")]
    NoRegions { player: String },

    #[error("[{player}] location '{name}' already holds an item")]
    LocationFilled { player: String, name: String },

    #[error("[{player}] completion condition must depend on items only")]
    OracleNotInventoryOnly { player: String },

    #[error("[{player}] progression item '{name}' is not referenced by any rule")]
    UnreferencedProgression { player: String, name: String },

    #[error("[{player}] item '{name}' gates access but is classified as {classification}")]
    UnclassifiedRequirement {
        player: String,
        name: String,
        classification: String,
    },

    #[error("[{player}] {items} items to place but only {locations} open locations")]
    NotEnoughLocations {
        player: String,
        items: usize,
        locations: usize,
    },

    #[error("unknown player #{player} ({num_players} players)")]
    UnknownPlayer { player: PlayerId, num_players: usize },

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("unknown game '{0}'")]
    UnknownGame(String),
}
