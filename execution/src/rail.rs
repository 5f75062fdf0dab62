//! Payment rail seam.
//!
//! Funds live outside the game: the rail escrows the value attached to a call and pays out
//! rewards and withdrawals. The game only ever hands the rail one [`Transfer`] per operation,
//! carrying both legs, so a payout can never land without the matching fee intake (or vice
//! versa).

use commonware_cryptography::ed25519::PublicKey;
pub use treasure_hunt_types::game::TransferError;

/// One leg of a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub account: PublicKey,
    pub amount: u64,
}

impl Payment {
    pub fn new(account: PublicKey, amount: u64) -> Self {
        Self { account, amount }
    }
}

/// Funds moved by a single committed operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Value attached to the call, accepted into the pool.
    pub incoming: Option<Payment>,
    /// Reward or withdrawal paid out of the pool.
    pub outgoing: Option<Payment>,
}

impl Transfer {
    pub fn incoming(account: PublicKey, amount: u64) -> Self {
        Self {
            incoming: Some(Payment::new(account, amount)),
            outgoing: None,
        }
    }

    pub fn outgoing(account: PublicKey, amount: u64) -> Self {
        Self {
            incoming: None,
            outgoing: Some(Payment::new(account, amount)),
        }
    }

    pub fn with_outgoing(mut self, account: PublicKey, amount: u64) -> Self {
        self.outgoing = Some(Payment::new(account, amount));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.iter().chain(self.outgoing.iter()).all(|p| p.amount == 0)
    }

    pub fn incoming_amount(&self) -> u64 {
        self.incoming.as_ref().map_or(0, |p| p.amount)
    }

    pub fn outgoing_amount(&self) -> u64 {
        self.outgoing.as_ref().map_or(0, |p| p.amount)
    }
}

/// External ledger holding the pool's funds.
pub trait Rail {
    /// Funds currently held for the game.
    fn balance(&self) -> u64;

    /// Apply both legs of `transfer` or neither.
    fn transfer(&mut self, transfer: &Transfer) -> Result<(), TransferError>;
}
