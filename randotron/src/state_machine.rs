use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, warn};
use treasure_hunt_types::{
    execution::{Event, Instruction, Transaction},
    game::{Direction, MOVE_FEE, PARTICIPATION_FEE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Joining,
    Playing { position: u32 },
}

/// A single signing account and what it knows about its own game state.
pub struct Bot {
    private_key: PrivateKey,
    public_key: PublicKey,
    nonce: u64,
    status: Status,
    wins: u64,
}

impl Bot {
    pub fn new(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
            nonce: 0,
            status: Status::Idle,
            wins: 0,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    fn create_transaction(&mut self, instruction: Instruction, value: u64) -> Transaction {
        let tx = Transaction::sign(&self.private_key, self.nonce, instruction, value);
        self.nonce += 1;
        tx
    }

    /// Sync with the next nonce the executor expects.
    pub fn apply_nonce(&mut self, next: u64) {
        if self.nonce != next {
            warn!(account = ?self.public_key, local = self.nonce, next, "Update nonce");
            self.nonce = next;
        }
    }

    pub fn join(&mut self) -> Option<Transaction> {
        if self.status != Status::Idle {
            return None;
        }
        self.status = Status::Joining;
        Some(self.create_transaction(Instruction::Participate, PARTICIPATION_FEE))
    }

    /// Pick a random direction that stays on the grid.
    pub fn pick_move(&mut self, rng: &mut impl Rng) -> Option<Transaction> {
        let Status::Playing { position } = self.status else {
            return None;
        };
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| direction.step(position).is_some())
            .collect();
        let direction = *options.choose(rng)?;
        debug!(account = ?self.public_key, position, %direction, "Move");
        Some(self.create_transaction(Instruction::Move { direction }, MOVE_FEE))
    }

    pub fn relocate(&mut self, position: u32) -> Transaction {
        self.create_transaction(Instruction::UpdateTreasurePosition { position }, 0)
    }

    pub fn withdraw(&mut self) -> Transaction {
        self.create_transaction(Instruction::Withdraw, 0)
    }

    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::Participated { player, .. } if player == &self.public_key => {
                self.status = Status::Playing { position: 0 };
            }
            Event::Moved { player, to, .. } if player == &self.public_key => {
                self.status = Status::Playing { position: *to };
            }
            Event::TreasureFound {
                winner,
                position,
                reward,
                ..
            } if winner == &self.public_key => {
                self.wins += 1;
                info!(account = ?self.public_key, position, reward, wins = self.wins, "Found treasure");
            }
            Event::Rejected {
                player, message, ..
            } if player == &self.public_key => {
                if self.status == Status::Joining {
                    self.status = Status::Idle;
                }
                warn!(account = ?self.public_key, %message, "Rejected");
            }
            _ => {}
        }
    }
}
