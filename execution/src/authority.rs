use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};
use treasure_hunt_types::game::owner_role;

/// Decides who may run privileged instructions.
pub trait Authority {
    fn is_owner(&self, account: &PublicKey) -> bool;

    /// Role reported when an account is rejected.
    fn role(&self) -> Digest {
        owner_role()
    }
}

/// A single designated owner.
#[derive(Clone, Debug)]
pub struct Owner(pub PublicKey);

impl Authority for Owner {
    fn is_owner(&self, account: &PublicKey) -> bool {
        &self.0 == account
    }
}
