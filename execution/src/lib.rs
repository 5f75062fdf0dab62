//! Treasure hunt execution layer.
//!
//! This crate contains the deterministic game logic ([`Layer`]) together with the seams it
//! depends on: a key-value [`State`], a payment [`Rail`](rail::Rail) and an [`Authority`]
//! deciding who owns the game.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Do not use randomness inside execution; treasure placement is an owner instruction.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Atomicity
//! Every operation either commits all of its writes and its rail transfer, or none of them.
//! The rail is always the last fallible step, so a rejected transfer never leaves staged
//! writes behind.
//!
//! ## Minimal game round (example)
//! ```rust,ignore
//! use treasure_hunt_execution::{mocks::{create_account_keypair, MockRail}, Layer, Memory, Owner};
//! use treasure_hunt_types::game::{MOVE_FEE, PARTICIPATION_FEE};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let state = Memory::default();
//! let mut rail = MockRail::new();
//! let (_, owner) = create_account_keypair(0);
//! let (_, player) = create_account_keypair(1);
//! let authority = Owner(owner);
//!
//! let mut layer = Layer::new(&state, &mut rail, &authority);
//! layer.participate(&player, PARTICIPATION_FEE).await?;
//! layer.move_right(&player, MOVE_FEE).await?;
//! let changes = layer.commit();
//! # Ok(())
//! # }
//! ```

mod authority;
mod layer;
pub mod rail;
mod state;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use authority::{Authority, Owner};
pub use layer::{genesis, ExecutionError, Layer};
pub use state::{game, nonce, player_position, PrepareError, State, Status};

#[cfg(any(test, feature = "mocks"))]
pub use state::Memory;
