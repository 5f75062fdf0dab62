use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};
use std::fmt;
use thiserror::Error;

use super::{
    Direction, ERROR_ALREADY_PARTICIPATING, ERROR_GAME_FULL, ERROR_INSUFFICIENT_FEE,
    ERROR_INVALID_POSITION, ERROR_LEDGER_OVERFLOW, ERROR_NOT_YOUR_TURN, ERROR_OUT_OF_BOUNDS,
    ERROR_TRANSFER_FAILED, ERROR_UNAUTHORIZED, GWEI,
};

/// The fee a payment was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fee {
    Participation,
    Move,
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participation => f.write_str("Participation fee"),
            Self::Move => f.write_str("move fee"),
        }
    }
}

/// Failure reported by the payment rail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds on rail (available={available}, requested={requested})")]
    InsufficientFunds { available: u64, requested: u64 },
    #[error("payout to recipient rejected")]
    Rejected,
}

/// Rejection of a requested game operation.
///
/// Every variant leaves the game exactly as it was before the request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{fee}: < {} gwei", .required / GWEI)]
    InsufficientFee { fee: Fee, paid: u64, required: u64 },
    #[error("Already participating")]
    AlreadyParticipating,
    #[error("not your turn")]
    NotYourTurn,
    #[error("move {0} out of bounds")]
    OutOfBounds(Direction),
    #[error("invalid treasure position: {0}")]
    InvalidPosition(u32),
    #[error("account is missing the owner role")]
    Unauthorized { account: PublicKey, role: Digest },
    #[error("Transfer failed")]
    TransferFailed(#[source] TransferError),
    #[error("turn queue full (max={max})")]
    GameFull { max: usize },
    #[error("ledger balance out of range")]
    LedgerOverflow,
}

impl GameError {
    /// Error code carried by `Event::Rejected`.
    pub fn code(&self) -> u8 {
        match self {
            Self::InsufficientFee { .. } => ERROR_INSUFFICIENT_FEE,
            Self::AlreadyParticipating => ERROR_ALREADY_PARTICIPATING,
            Self::NotYourTurn => ERROR_NOT_YOUR_TURN,
            Self::OutOfBounds(_) => ERROR_OUT_OF_BOUNDS,
            Self::InvalidPosition(_) => ERROR_INVALID_POSITION,
            Self::Unauthorized { .. } => ERROR_UNAUTHORIZED,
            Self::TransferFailed(_) => ERROR_TRANSFER_FAILED,
            Self::GameFull { .. } => ERROR_GAME_FULL,
            Self::LedgerOverflow => ERROR_LEDGER_OVERFLOW,
        }
    }
}
