use multirando_game::ConfigError;

// Failures found by searching a fully built multiworld.
#[derive(Debug, thiserror::Error)]
pub enum LogicError {
    #[error("[{player}] location '{location}' is unreachable even with every progression item")]
    UnreachableLocation { player: String, location: String },

    #[error("[{player}] region '{region}' is unreachable even with every progression item")]
    UnreachableRegion { player: String, region: String },

    #[error("[{player}] completion condition is unsatisfied even with every progression item")]
    GoalUnreachable { player: String },

    #[error("seed is not beatable: {} cannot complete", players.join(", "))]
    NotBeatable { players: Vec<String> },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("item placement failed: {0}")]
    FillFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    // Placement failures can succeed with a different placement seed; nothing else can.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            GenerationError::FillFailed(_) | GenerationError::Logic(LogicError::NotBeatable { .. })
        )
    }
}
