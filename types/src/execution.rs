use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    Signer, Verifier,
};
use commonware_utils::union;

use crate::game::{Direction, GameState, Player, MAX_MESSAGE_LENGTH};

pub const NAMESPACE: &[u8] = b"_TREASURE_HUNT";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

/// Operation requested by a caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Join the game. The attached value must cover the participation fee.
    /// Binary: [0]
    Participate,

    /// Move one cell. The attached value must cover the move fee.
    /// Binary: [1] [direction:u8]
    Move { direction: Direction },

    /// Owner-only: relocate the treasure.
    /// Binary: [2] [position:u32 BE]
    UpdateTreasurePosition { position: u32 },

    /// Owner-only: drain the ledger to the owner.
    /// Binary: [3]
    Withdraw,
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Participate => 0u8.write(writer),
            Self::Move { direction } => {
                1u8.write(writer);
                direction.write(writer);
            }
            Self::UpdateTreasurePosition { position } => {
                2u8.write(writer);
                position.write(writer);
            }
            Self::Withdraw => 3u8.write(writer),
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let instruction = match u8::read(reader)? {
            0 => Self::Participate,
            1 => Self::Move {
                direction: Direction::read(reader)?,
            },
            2 => Self::UpdateTreasurePosition {
                position: u32::read(reader)?,
            },
            3 => Self::Withdraw,
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Participate | Self::Withdraw => 0,
                Self::Move { .. } => Direction::SIZE,
                Self::UpdateTreasurePosition { .. } => u32::SIZE,
            }
    }
}

/// A signed request. `value` is the payment attached to the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub instruction: Instruction,
    pub value: u64,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Transaction {
    fn payload(nonce: &u64, instruction: &Instruction, value: &u64) -> Vec<u8> {
        let mut payload = Vec::new();
        nonce.write(&mut payload);
        instruction.write(&mut payload);
        value.write(&mut payload);

        payload
    }

    pub fn sign(
        private: &ed25519::PrivateKey,
        nonce: u64,
        instruction: Instruction,
        value: u64,
    ) -> Self {
        let signature = private.sign(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&nonce, &instruction, &value),
        );

        Self {
            nonce,
            instruction,
            value,
            public: private.public_key(),
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&self.nonce, &self.instruction, &self.value),
            &self.signature,
        )
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
        self.instruction.write(writer);
        self.value.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            nonce: u64::read(reader)?,
            instruction: Instruction::read(reader)?,
            value: u64::read(reader)?,
            public: ed25519::PublicKey::read(reader)?,
            signature: ed25519::Signature::read(reader)?,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
            + self.instruction.encode_size()
            + self.value.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

/// Minimal account structure for transaction nonce tracking.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Account {
    pub nonce: u64,
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            nonce: u64::read(reader)?,
        })
    }
}

impl EncodeSize for Account {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
    }
}

#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    /// Account for nonce tracking (tag 0)
    Account(PublicKey),
    /// Player record (tag 1)
    Player(PublicKey),
    /// Singleton game record (tag 2)
    Game,
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(pk) => {
                0u8.write(writer);
                pk.write(writer);
            }
            Self::Player(pk) => {
                1u8.write(writer);
                pk.write(writer);
            }
            Self::Game => 2u8.write(writer),
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let key = match u8::read(reader)? {
            0 => Self::Account(PublicKey::read(reader)?),
            1 => Self::Player(PublicKey::read(reader)?),
            2 => Self::Game,
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) | Self::Player(_) => PublicKey::SIZE,
                Self::Game => 0,
            }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Value {
    Account(Account),
    Player(Player),
    Game(GameState),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::Player(player) => {
                1u8.write(writer);
                player.write(writer);
            }
            Self::Game(game) => {
                2u8.write(writer);
                game.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = match u8::read(reader)? {
            0 => Self::Account(Account::read(reader)?),
            1 => Self::Player(Player::read(reader)?),
            2 => Self::Game(GameState::read(reader)?),
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(account) => account.encode_size(),
                Self::Player(player) => player.encode_size(),
                Self::Game(game) => game.encode_size(),
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Participated {
        player: PublicKey,
        paid: u64,
    },
    Moved {
        player: PublicKey,
        direction: Direction,
        from: u32,
        to: u32,
        paid: u64,
    },
    TurnAdvanced {
        next: PublicKey,
    },
    TreasureFound {
        winner: PublicKey,
        position: u32,
        reward: u64,
        remaining: u64,
    },
    TreasureRelocated {
        position: u32,
    },
    Withdrawn {
        owner: PublicKey,
        amount: u64,
    },
    Rejected {
        player: PublicKey,
        error_code: u8,
        message: String,
    },
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Participated { player, paid } => {
                0u8.write(writer);
                player.write(writer);
                paid.write(writer);
            }
            Self::Moved {
                player,
                direction,
                from,
                to,
                paid,
            } => {
                1u8.write(writer);
                player.write(writer);
                direction.write(writer);
                from.write(writer);
                to.write(writer);
                paid.write(writer);
            }
            Self::TurnAdvanced { next } => {
                2u8.write(writer);
                next.write(writer);
            }
            Self::TreasureFound {
                winner,
                position,
                reward,
                remaining,
            } => {
                3u8.write(writer);
                winner.write(writer);
                position.write(writer);
                reward.write(writer);
                remaining.write(writer);
            }
            Self::TreasureRelocated { position } => {
                4u8.write(writer);
                position.write(writer);
            }
            Self::Withdrawn { owner, amount } => {
                5u8.write(writer);
                owner.write(writer);
                amount.write(writer);
            }
            Self::Rejected {
                player,
                error_code,
                message,
            } => {
                6u8.write(writer);
                player.write(writer);
                error_code.write(writer);
                message.as_bytes().to_vec().write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let event = match u8::read(reader)? {
            0 => Self::Participated {
                player: PublicKey::read(reader)?,
                paid: u64::read(reader)?,
            },
            1 => Self::Moved {
                player: PublicKey::read(reader)?,
                direction: Direction::read(reader)?,
                from: u32::read(reader)?,
                to: u32::read(reader)?,
                paid: u64::read(reader)?,
            },
            2 => Self::TurnAdvanced {
                next: PublicKey::read(reader)?,
            },
            3 => Self::TreasureFound {
                winner: PublicKey::read(reader)?,
                position: u32::read(reader)?,
                reward: u64::read(reader)?,
                remaining: u64::read(reader)?,
            },
            4 => Self::TreasureRelocated {
                position: u32::read(reader)?,
            },
            5 => Self::Withdrawn {
                owner: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
            },
            6 => {
                let player = PublicKey::read(reader)?;
                let error_code = u8::read(reader)?;
                let bytes = Vec::<u8>::read_range(reader, 0..=MAX_MESSAGE_LENGTH)?;
                let message = String::from_utf8(bytes)
                    .map_err(|_| Error::Invalid("Event", "invalid UTF-8 in error message"))?;
                Self::Rejected {
                    player,
                    error_code,
                    message,
                }
            }
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Participated { paid, .. } => PublicKey::SIZE + paid.encode_size(),
                Self::Moved {
                    from, to, paid, ..
                } => {
                    PublicKey::SIZE
                        + Direction::SIZE
                        + from.encode_size()
                        + to.encode_size()
                        + paid.encode_size()
                }
                Self::TurnAdvanced { .. } => PublicKey::SIZE,
                Self::TreasureFound {
                    position,
                    reward,
                    remaining,
                    ..
                } => {
                    PublicKey::SIZE
                        + position.encode_size()
                        + reward.encode_size()
                        + remaining.encode_size()
                }
                Self::TreasureRelocated { position } => position.encode_size(),
                Self::Withdrawn { amount, .. } => PublicKey::SIZE + amount.encode_size(),
                Self::Rejected {
                    error_code,
                    message,
                    ..
                } => {
                    PublicKey::SIZE
                        + error_code.encode_size()
                        + message.as_bytes().to_vec().encode_size()
                }
            }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Output {
    Event(Event),
    Transaction(Transaction),
}

impl Write for Output {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Event(event) => {
                0u8.write(writer);
                event.write(writer);
            }
            Self::Transaction(transaction) => {
                1u8.write(writer);
                transaction.write(writer);
            }
        }
    }
}

impl Read for Output {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Event(Event::read(reader)?)),
            1 => Ok(Self::Transaction(Transaction::read(reader)?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Output {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Event(event) => event.encode_size(),
            Self::Transaction(transaction) => transaction.encode_size(),
        }
    }
}
