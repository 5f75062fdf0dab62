/// Width (and height) of the square grid.
pub const GRID_SIZE: u32 = 3;

/// Number of addressable cells on the grid.
pub const GRID_CELLS: u32 = GRID_SIZE * GRID_SIZE;

/// One gwei expressed in the smallest fee unit.
pub const GWEI: u64 = 1_000_000_000;

/// Minimum payment required to join the game.
pub const PARTICIPATION_FEE: u64 = 20_000 * GWEI;

/// Minimum payment required for every move attempt.
pub const MOVE_FEE: u64 = 10_000 * GWEI;

/// Share of the ledger paid to the winner, in percent (the remainder stays in the ledger).
pub const REWARD_PERCENT: u64 = 90;

/// Treasure cell used when the game is read before genesis wrote one.
pub const INITIAL_TREASURE_POSITION: u32 = GRID_CELLS - 1;

/// Upper bound on the turn queue (also bounds decoding).
pub const MAX_PLAYERS: usize = 1_024;

/// Preimage of the owner role identifier.
pub const OWNER_ROLE_PREIMAGE: &[u8] = b"OWNER_ROLE";

/// Maximum length of a rejection message carried in an event.
pub const MAX_MESSAGE_LENGTH: usize = 256;

/// Error codes for Rejected events
pub const ERROR_INSUFFICIENT_FEE: u8 = 1;
pub const ERROR_ALREADY_PARTICIPATING: u8 = 2;
pub const ERROR_NOT_YOUR_TURN: u8 = 3;
pub const ERROR_OUT_OF_BOUNDS: u8 = 4;
pub const ERROR_INVALID_POSITION: u8 = 5;
pub const ERROR_UNAUTHORIZED: u8 = 6;
pub const ERROR_TRANSFER_FAILED: u8 = 7;
pub const ERROR_GAME_FULL: u8 = 8;
pub const ERROR_LEDGER_OVERFLOW: u8 = 9;
