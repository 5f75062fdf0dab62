use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::{
    ed25519::PublicKey,
    sha256::{Digest, Sha256},
    Hasher,
};
use thiserror::Error as ThisError;

use super::{
    in_bounds, GameError, GRID_CELLS, GRID_SIZE, INITIAL_TREASURE_POSITION, MAX_PLAYERS,
    OWNER_ROLE_PREIMAGE, REWARD_PERCENT,
};

/// Identifier of the role allowed to relocate the treasure and withdraw funds.
pub fn owner_role() -> Digest {
    Sha256::hash(OWNER_ROLE_PREIMAGE)
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum GameInvariantError {
    #[error("treasure outside grid (got={got}, cells={cells})")]
    TreasureOutOfBounds { got: u32, cells: u32 },
    #[error("turn index out of range (index={index}, players={players})")]
    TurnIndexOutOfRange { index: u32, players: usize },
    #[error("ledger imbalance (balance={balance}, fees={fees}, payouts={payouts})")]
    LedgerImbalance { balance: u64, fees: u64, payouts: u64 },
}

/// Singleton game record: turn rotation, treasure cell and the fee ledger.
///
/// Player positions live in their own records (see [`super::Player`]); this record only tracks
/// who plays next and how much is in the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Participants in admission order.
    pub turn_queue: Vec<PublicKey>,
    pub current_turn_index: u32,
    pub treasure_position: u32,
    pub ledger_balance: u64,

    // Running totals used to audit the ledger.
    pub total_fees: u64,
    pub total_payouts: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(INITIAL_TREASURE_POSITION)
    }
}

impl GameState {
    pub fn new(treasure_position: u32) -> Self {
        Self {
            turn_queue: Vec::new(),
            current_turn_index: 0,
            treasure_position,
            ledger_balance: 0,
            total_fees: 0,
            total_payouts: 0,
        }
    }

    pub fn grid_size(&self) -> u32 {
        GRID_SIZE
    }

    /// Participant whose move is currently accepted.
    pub fn current_turn(&self) -> Option<&PublicKey> {
        self.turn_queue.get(self.current_turn_index as usize)
    }

    pub fn is_turn_of(&self, public: &PublicKey) -> bool {
        self.current_turn() == Some(public)
    }

    pub fn treasure_position(&self) -> u32 {
        self.treasure_position
    }

    pub fn ledger_balance(&self) -> u64 {
        self.ledger_balance
    }

    pub fn players(&self) -> usize {
        self.turn_queue.len()
    }

    /// Append a participant to the rotation. The first participant holds the turn immediately.
    pub fn enqueue(&mut self, public: PublicKey) -> Result<(), GameError> {
        if self.turn_queue.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull { max: MAX_PLAYERS });
        }
        if self.turn_queue.is_empty() {
            self.current_turn_index = 0;
        }
        self.turn_queue.push(public);
        Ok(())
    }

    /// Pass the turn to the next participant (round-robin) and return them.
    pub fn advance_turn(&mut self) -> Option<&PublicKey> {
        if self.turn_queue.is_empty() {
            return None;
        }
        let next = (self.current_turn_index as usize + 1) % self.turn_queue.len();
        self.current_turn_index = next as u32;
        self.current_turn()
    }

    pub fn credit(&mut self, amount: u64) -> Result<(), GameError> {
        let balance = self
            .ledger_balance
            .checked_add(amount)
            .ok_or(GameError::LedgerOverflow)?;
        let fees = self
            .total_fees
            .checked_add(amount)
            .ok_or(GameError::LedgerOverflow)?;
        self.ledger_balance = balance;
        self.total_fees = fees;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), GameError> {
        let balance = self
            .ledger_balance
            .checked_sub(amount)
            .ok_or(GameError::LedgerOverflow)?;
        let payouts = self
            .total_payouts
            .checked_add(amount)
            .ok_or(GameError::LedgerOverflow)?;
        self.ledger_balance = balance;
        self.total_payouts = payouts;
        Ok(())
    }

    /// Winner's share of the current ledger (integer division, remainder stays).
    pub fn reward(&self) -> u64 {
        (self.ledger_balance as u128 * REWARD_PERCENT as u128 / 100) as u64
    }

    pub fn relocate_treasure(&mut self, position: u32) -> Result<(), GameError> {
        if !in_bounds(position) {
            return Err(GameError::InvalidPosition(position));
        }
        self.treasure_position = position;
        Ok(())
    }

    pub fn validate_invariants(&self) -> Result<(), GameInvariantError> {
        if !in_bounds(self.treasure_position) {
            return Err(GameInvariantError::TreasureOutOfBounds {
                got: self.treasure_position,
                cells: GRID_CELLS,
            });
        }
        if !self.turn_queue.is_empty()
            && self.current_turn_index as usize >= self.turn_queue.len()
        {
            return Err(GameInvariantError::TurnIndexOutOfRange {
                index: self.current_turn_index,
                players: self.turn_queue.len(),
            });
        }
        if self.total_fees.checked_sub(self.total_payouts) != Some(self.ledger_balance) {
            return Err(GameInvariantError::LedgerImbalance {
                balance: self.ledger_balance,
                fees: self.total_fees,
                payouts: self.total_payouts,
            });
        }
        Ok(())
    }
}

impl Write for GameState {
    fn write(&self, writer: &mut impl BufMut) {
        self.turn_queue.write(writer);
        self.current_turn_index.write(writer);
        self.treasure_position.write(writer);
        self.ledger_balance.write(writer);
        self.total_fees.write(writer);
        self.total_payouts.write(writer);
    }
}

impl Read for GameState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let state = Self {
            turn_queue: Vec::<PublicKey>::read_range(reader, 0..=MAX_PLAYERS)?,
            current_turn_index: u32::read(reader)?,
            treasure_position: u32::read(reader)?,
            ledger_balance: u64::read(reader)?,
            total_fees: u64::read(reader)?,
            total_payouts: u64::read(reader)?,
        };
        if state.validate_invariants().is_err() {
            return Err(Error::Invalid("GameState", "invariant violated"));
        }
        Ok(state)
    }
}

impl EncodeSize for GameState {
    fn encode_size(&self) -> usize {
        self.turn_queue.encode_size()
            + self.current_turn_index.encode_size()
            + self.treasure_position.encode_size()
            + self.ledger_balance.encode_size()
            + self.total_fees.encode_size()
            + self.total_payouts.encode_size()
    }
}
