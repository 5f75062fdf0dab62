mod state_machine;

use anyhow::{anyhow, Context as _, Result};
use commonware_cryptography::ed25519::PrivateKey;
use commonware_math::algebra::Random;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use state_machine::Bot;
pub use state_machine::Status;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, Level};
use treasure_hunt_execution::{
    game as load_game, genesis, mocks::MockRail, Layer, Memory, Owner, State as _,
};
use treasure_hunt_types::{
    execution::{Event, Output, Transaction},
    game::{GRID_CELLS, MAX_PLAYERS},
};

/// Configuration for randotron (from config file)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub players: usize,
    pub rounds: usize,
    pub seed: u64,
    pub owner_seed: u64,
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    /// Make the rail reject every payout, to exercise rollback.
    #[serde(default)]
    pub fail_payouts: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one player is required")]
    NoPlayers,
    #[error("too many players (got={got}, max={max})")]
    TooManyPlayers { got: usize, max: usize },
    #[error("at least one round is required")]
    NoRounds,
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("owner seed must differ from the player seed")]
    SharedSeed,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub players: usize,
    pub rounds: usize,
    pub seed: u64,
    pub owner_seed: u64,
    pub log_level: Level,
    pub json_logs: bool,
    pub fail_payouts: bool,
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.players > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                got: self.players,
                max: MAX_PLAYERS,
            });
        }
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.seed == self.owner_seed {
            return Err(ConfigError::SharedSeed);
        }
        let log_level = Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;

        Ok(ValidatedConfig {
            players: self.players,
            rounds: self.rounds,
            seed: self.seed,
            owner_seed: self.owner_seed,
            log_level,
            json_logs: self.json_logs,
            fail_payouts: self.fail_payouts,
        })
    }
}

/// Totals observed over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub moves: u64,
    pub rejected: u64,
    pub wins: u64,
    pub rewards: u64,
    pub relocations: u64,
    pub withdrawn: u64,
    /// Pool balance left after the final withdrawal.
    pub ledger: u64,
}

/// Drives a set of bots against an in-memory game.
pub struct Engine {
    config: ValidatedConfig,
    rng: ChaCha20Rng,
    state: Memory,
    rail: MockRail,
    authority: Owner,
    owner: Bot,
    bots: Vec<Bot>,
    summary: Summary,
}

impl Engine {
    pub async fn new(config: ValidatedConfig) -> Result<Self> {
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        let bots = (0..config.players)
            .map(|_| Bot::new(PrivateKey::random(&mut rng)))
            .collect();
        let owner = Bot::new(PrivateKey::random(&mut ChaCha20Rng::seed_from_u64(
            config.owner_seed,
        )));
        let authority = Owner(owner.public_key().clone());

        let mut rail = MockRail::new();
        rail.fail_payouts(config.fail_payouts);

        // Keep the treasure off the start cell so nobody wins by joining.
        let treasure = rng.gen_range(1..GRID_CELLS);
        let mut state = Memory::default();
        state
            .apply(genesis(treasure)?)
            .await
            .context("failed to apply genesis")?;
        info!(treasure, players = config.players, "Initialized game");

        Ok(Self {
            config,
            rng,
            state,
            rail,
            authority,
            owner,
            bots,
            summary: Summary::default(),
        })
    }

    /// Execute `transactions` in one batch, commit the result and route events to the bots.
    async fn submit(&mut self, transactions: Vec<Transaction>) -> Result<Vec<Event>> {
        let mut layer = Layer::new(&self.state, &mut self.rail, &self.authority);
        let (outputs, nonces) = layer.execute(transactions).await?;
        let changes = layer.commit();
        self.state.apply(changes).await?;

        for bot in self.bots.iter_mut().chain(std::iter::once(&mut self.owner)) {
            if let Some(next) = nonces.get(bot.public_key()) {
                bot.apply_nonce(*next);
            }
        }

        let mut events = Vec::new();
        for output in outputs {
            let Output::Event(event) = output else {
                continue;
            };
            self.record(&event);
            for bot in self.bots.iter_mut() {
                bot.apply_event(&event);
            }
            events.push(event);
        }
        Ok(events)
    }

    fn record(&mut self, event: &Event) {
        match event {
            Event::Moved { .. } => self.summary.moves += 1,
            Event::TreasureFound { reward, .. } => {
                self.summary.wins += 1;
                self.summary.rewards += reward;
            }
            Event::TreasureRelocated { .. } => self.summary.relocations += 1,
            Event::Withdrawn { amount, .. } => self.summary.withdrawn += amount,
            Event::Rejected { .. } => self.summary.rejected += 1,
            _ => {}
        }
    }

    async fn relocate_treasure(&mut self) -> Result<()> {
        let position = self.rng.gen_range(0..GRID_CELLS);
        let tx = self.owner.relocate(position);
        self.submit(vec![tx]).await?;
        Ok(())
    }

    pub async fn run(mut self) -> Result<Summary> {
        let joins = self.bots.iter_mut().filter_map(Bot::join).collect();
        self.submit(joins).await?;

        let turns = self.config.rounds * self.config.players;
        for turn in 0..turns {
            let game = load_game(&self.state).await?;
            let current = game
                .current_turn()
                .ok_or_else(|| anyhow!("no player holds the turn"))?;
            let bot = self
                .bots
                .iter_mut()
                .find(|bot| bot.public_key() == current)
                .ok_or_else(|| anyhow!("turn holder is not a bot"))?;
            let Some(tx) = bot.pick_move(&mut self.rng) else {
                continue;
            };

            let events = self.submit(vec![tx]).await?;
            if events
                .iter()
                .any(|event| matches!(event, Event::TreasureFound { .. }))
            {
                self.relocate_treasure().await?;
            }
            if turn % self.config.players == 0 {
                info!(
                    round = turn / self.config.players,
                    ledger = game.ledger_balance(),
                    wins = self.summary.wins,
                    "Stats"
                );
            }
        }

        let tx = self.owner.withdraw();
        self.submit(vec![tx]).await?;
        self.summary.ledger = load_game(&self.state).await?.ledger_balance();
        for bot in &self.bots {
            info!(account = ?bot.public_key(), wins = bot.wins(), status = ?bot.status(), "Bot");
        }
        Ok(self.summary)
    }
}
