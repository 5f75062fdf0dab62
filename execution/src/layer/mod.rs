use anyhow::{Context as _, Result};
use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};
use treasure_hunt_types::{
    execution::{Event, Instruction, Key, Output, Transaction, Value},
    game::{
        Direction, Fee, GameError, GameState, Player, GRID_SIZE, MAX_MESSAGE_LENGTH, MOVE_FEE,
        PARTICIPATION_FEE,
    },
};

use crate::authority::Authority;
use crate::rail::{Rail, Transfer};
use crate::state::{
    load_account, load_player, validate_and_increment_nonce, PrepareError, State, Status,
};

mod handlers;


/// Failure of a single operation.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The request was rejected; nothing it touched was kept.
    #[error(transparent)]
    Game(#[from] GameError),
    /// The underlying store failed.
    #[error("state error: {0:#}")]
    State(#[from] anyhow::Error),
}

/// Change set that opens a game with the treasure on `treasure_position`.
pub fn genesis(treasure_position: u32) -> Result<Vec<(Key, Status)>, GameError> {
    let mut game = GameState::default();
    game.relocate_treasure(treasure_position)?;
    Ok(vec![(Key::Game, Status::Update(Value::Game(game)))])
}

fn rejected(player: &PublicKey, err: &GameError) -> Event {
    let mut message = err.to_string();
    message.truncate(MAX_MESSAGE_LENGTH);
    Event::Rejected {
        player: player.clone(),
        error_code: err.code(),
        message,
    }
}

/// Executes game operations over a staged view of `state`.
///
/// Writes stay in `pending` until [`Layer::commit`]. Each operation is atomic: a rejected
/// operation leaves `pending` (and the rail) exactly as it found them.
pub struct Layer<'a, S: State, R: Rail, A: Authority> {
    state: &'a S,
    rail: &'a mut R,
    authority: &'a A,
    pending: BTreeMap<Key, Status>,
}

impl<'a, S: State, R: Rail, A: Authority> Layer<'a, S, R, A> {
    pub fn new(state: &'a S, rail: &'a mut R, authority: &'a A) -> Self {
        Self {
            state,
            rail,
            authority,
            pending: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    async fn prepare(&mut self, transaction: &Transaction) -> Result<(), PrepareError> {
        let mut account = load_account(self, &transaction.public)
            .await
            .map_err(PrepareError::State)?;
        validate_and_increment_nonce(&mut account, transaction.nonce)?;
        self.insert(
            Key::Account(transaction.public.clone()),
            Value::Account(account),
        );

        Ok(())
    }

    async fn load_game(&self) -> Result<GameState> {
        crate::state::game(self).await
    }

    fn authorize(&self, public: &PublicKey) -> Result<(), GameError> {
        if self.authority.is_owner(public) {
            return Ok(());
        }
        Err(GameError::Unauthorized {
            account: public.clone(),
            role: self.authority.role(),
        })
    }

    /// Hand the operation's funds to the rail. Must be the last fallible step of a handler.
    fn transfer(&mut self, transfer: Transfer) -> Result<(), GameError> {
        if transfer.is_empty() {
            return Ok(());
        }
        self.rail.transfer(&transfer).map_err(|err| {
            debug!(%err, "rail rejected transfer");
            GameError::TransferFailed(err)
        })
    }

    /// Apply `instruction` on behalf of `public` with `value` attached.
    pub async fn apply(
        &mut self,
        public: &PublicKey,
        instruction: &Instruction,
        value: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        let checkpoint = self.pending.clone();
        let result = match instruction {
            Instruction::Participate => self.handle_participate(public, value).await,
            Instruction::Move { direction } => self.handle_move(public, *direction, value).await,
            Instruction::UpdateTreasurePosition { position } => {
                self.handle_update_treasure_position(public, *position)
                    .await
            }
            Instruction::Withdraw => self.handle_withdraw(public).await,
        };
        if let Err(err) = &result {
            debug!(player = ?public, ?instruction, %err, "instruction rejected");
            self.pending = checkpoint;
        }
        result
    }

    pub async fn participate(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.apply(public, &Instruction::Participate, paid).await
    }

    pub async fn move_player(
        &mut self,
        public: &PublicKey,
        direction: Direction,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.apply(public, &Instruction::Move { direction }, paid)
            .await
    }

    pub async fn move_up(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.move_player(public, Direction::Up, paid).await
    }

    pub async fn move_down(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.move_player(public, Direction::Down, paid).await
    }

    pub async fn move_left(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.move_player(public, Direction::Left, paid).await
    }

    pub async fn move_right(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.move_player(public, Direction::Right, paid).await
    }

    pub async fn update_treasure_position(
        &mut self,
        public: &PublicKey,
        position: u32,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.apply(public, &Instruction::UpdateTreasurePosition { position }, 0)
            .await
    }

    pub async fn withdraw(&mut self, public: &PublicKey) -> Result<Vec<Event>, ExecutionError> {
        self.apply(public, &Instruction::Withdraw, 0).await
    }

    pub async fn game(&self) -> Result<GameState> {
        self.load_game().await
    }

    pub async fn current_turn(&self) -> Result<Option<PublicKey>> {
        Ok(self.load_game().await?.current_turn().cloned())
    }

    pub async fn player_position(&self, public: &PublicKey) -> Result<Option<u32>> {
        crate::state::player_position(self, public).await
    }

    pub fn grid_size(&self) -> u32 {
        GRID_SIZE
    }

    pub fn owner_role(&self) -> Digest {
        self.authority.role()
    }

    /// Balance reported by the payment rail.
    pub fn rail_balance(&self) -> u64 {
        self.rail.balance()
    }

    pub async fn execute(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> Result<(Vec<Output>, BTreeMap<PublicKey, u64>)> {
        let mut processed_nonces = BTreeMap::new();
        let mut outputs = Vec::new();

        for tx in transactions {
            if !tx.verify() {
                debug!(public = ?tx.public, "invalid signature; dropping transaction");
                continue;
            }
            match self.prepare(&tx).await {
                Ok(()) => {}
                Err(PrepareError::NonceMismatch { expected, got }) => {
                    debug!(
                        public = ?tx.public,
                        expected,
                        got,
                        "nonce mismatch; dropping transaction"
                    );
                    continue;
                }
                Err(PrepareError::State(err)) => {
                    return Err(err).context("state error during prepare");
                }
            }
            processed_nonces.insert(tx.public.clone(), tx.nonce.saturating_add(1));
            match self.apply(&tx.public, &tx.instruction, tx.value).await {
                Ok(events) => outputs.extend(events.into_iter().map(Output::Event)),
                Err(ExecutionError::Game(err)) => {
                    outputs.push(Output::Event(rejected(&tx.public, &err)));
                }
                Err(ExecutionError::State(err)) => {
                    return Err(err).context("state error during apply");
                }
            }
            outputs.push(Output::Transaction(tx));
        }

        Ok((outputs, processed_nonces))
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State, R: Rail, A: Authority> State for Layer<'a, S, R, A> {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await?,
        })
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.pending.insert(key.clone(), Status::Delete);
        Ok(())
    }
}
