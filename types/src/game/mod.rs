//! Treasure hunt domain types.
//!
//! Defines the grid, player and game state records, the rejection taxonomy, and the constants used
//! by the execution layer and clients.

mod constants;
mod error;
mod grid;
mod player;
mod state;

pub use constants::*;
pub use error::*;
pub use grid::*;
pub use player::*;
pub use state::*;
