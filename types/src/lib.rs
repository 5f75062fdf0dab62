//! Common types used throughout treasure-hunt.
//!
//! [`game`] holds the rule constants and the records that make up a running game, while
//! [`execution`] holds the storage keys/values, signed transactions and the events emitted when
//! they are applied.

pub mod execution;
pub mod game;

pub use execution::{transaction_namespace, NAMESPACE};
