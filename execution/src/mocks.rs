use crate::rail::{Rail, Transfer, TransferError};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashMap;

/// Creates an account keypair for Ed25519 signatures used by players and the owner
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// In-memory rail that tracks the pool balance and what each account received.
#[derive(Default, Debug)]
pub struct MockRail {
    balance: u64,
    paid_in: HashMap<PublicKey, u64>,
    paid_out: HashMap<PublicKey, u64>,
    fail_payouts: bool,
}

impl MockRail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every transfer with an outgoing leg until reset.
    pub fn fail_payouts(&mut self, fail: bool) {
        self.fail_payouts = fail;
    }

    /// Total received by `account` from the pool.
    pub fn received(&self, account: &PublicKey) -> u64 {
        self.paid_out.get(account).copied().unwrap_or(0)
    }

    /// Total paid by `account` into the pool.
    pub fn spent(&self, account: &PublicKey) -> u64 {
        self.paid_in.get(account).copied().unwrap_or(0)
    }
}

impl Rail for MockRail {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn transfer(&mut self, transfer: &Transfer) -> Result<(), TransferError> {
        if self.fail_payouts && transfer.outgoing.is_some() {
            return Err(TransferError::Rejected);
        }
        let available = self.balance.saturating_add(transfer.incoming_amount());
        let requested = transfer.outgoing_amount();
        if requested > available {
            return Err(TransferError::InsufficientFunds {
                available,
                requested,
            });
        }

        self.balance = available - requested;
        if let Some(payment) = &transfer.incoming {
            *self.paid_in.entry(payment.account.clone()).or_default() += payment.amount;
        }
        if let Some(payment) = &transfer.outgoing {
            *self.paid_out.entry(payment.account.clone()).or_default() += payment.amount;
        }
        Ok(())
    }
}
