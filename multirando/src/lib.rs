// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

pub mod completion;
pub mod error;
pub mod games;
pub mod multiworld;
pub mod plugin;
pub mod randomize;
pub mod settings;
pub mod spoiler_log;
pub mod traverse;

pub use error::{GenerationError, LogicError};
