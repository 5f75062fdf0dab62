use anyhow::Result;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;
use std::future::Future;
use treasure_hunt_types::{
    execution::{Account, Key, Value},
    game::{GameState, Player},
};

#[cfg(any(test, feature = "mocks"))]
use std::collections::HashMap;

#[derive(Debug)]
pub enum PrepareError {
    NonceMismatch { expected: u64, got: u64 },
    State(anyhow::Error),
}

/// Key-value store the game reads from and commits into.
pub trait State {
    fn get(&self, key: &Key) -> impl Future<Output = Result<Option<Value>>>;
    fn insert(&mut self, key: Key, value: Value) -> impl Future<Output = Result<()>>;
    fn delete(&mut self, key: &Key) -> impl Future<Output = Result<()>>;

    fn apply(&mut self, changes: Vec<(Key, Status)>) -> impl Future<Output = Result<()>> {
        async {
            for (key, status) in changes {
                match status {
                    Status::Update(value) => self.insert(key, value).await?,
                    Status::Delete => self.delete(&key).await?,
                }
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
#[derive(Default)]
pub struct Memory {
    state: HashMap<Key, Value>,
}

#[cfg(any(test, feature = "mocks"))]
impl State for Memory {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.state.get(key).cloned())
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.state.insert(key, value);
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Update(Value),
    Delete,
}

impl Write for Status {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Status::Update(value) => {
                0u8.write(writer);
                value.write(writer);
            }
            Status::Delete => 1u8.write(writer),
        }
    }
}

impl Read for Status {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Status::Update(Value::read(reader)?)),
            1 => Ok(Status::Delete),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Status {
    fn encode_size(&self) -> usize {
        1 + match self {
            Status::Update(value) => value.encode_size(),
            Status::Delete => 0,
        }
    }
}

pub async fn nonce<S: State>(state: &S, public: &PublicKey) -> Result<u64> {
    Ok(load_account(state, public).await?.nonce)
}

/// Committed game record, or a fresh game if genesis never ran.
pub async fn game<S: State>(state: &S) -> Result<GameState> {
    Ok(match state.get(&Key::Game).await? {
        Some(Value::Game(game)) => game,
        _ => GameState::default(),
    })
}

/// Committed position of `public`, if they ever joined.
pub async fn player_position<S: State>(state: &S, public: &PublicKey) -> Result<Option<u32>> {
    Ok(load_player(state, public).await?.map(|player| player.position))
}

pub(crate) async fn load_player<S: State>(state: &S, public: &PublicKey) -> Result<Option<Player>> {
    Ok(match state.get(&Key::Player(public.clone())).await? {
        Some(Value::Player(player)) => Some(player),
        _ => None,
    })
}

pub(crate) async fn load_account<S: State>(state: &S, public: &PublicKey) -> Result<Account> {
    Ok(match state.get(&Key::Account(public.clone())).await? {
        Some(Value::Account(account)) => account,
        _ => Account::default(),
    })
}

pub(crate) fn validate_and_increment_nonce(
    account: &mut Account,
    provided_nonce: u64,
) -> Result<(), PrepareError> {
    if account.nonce != provided_nonce {
        return Err(PrepareError::NonceMismatch {
            expected: account.nonce,
            got: provided_nonce,
        });
    }
    account.nonce += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::create_account_keypair;
    use commonware_codec::{DecodeExt, Encode};
    use commonware_runtime::{deterministic::Runner, Runner as _};

    #[test]
    fn test_status_roundtrip() {
        let status = Status::Update(Value::Account(Account { nonce: 3 }));
        assert_eq!(Status::decode(status.encode()).unwrap(), status);
        assert_eq!(Status::decode(Status::Delete.encode()).unwrap(), Status::Delete);
    }

    #[test]
    fn test_nonce_validation() {
        let mut account = Account::default();
        assert!(matches!(
            validate_and_increment_nonce(&mut account, 1),
            Err(PrepareError::NonceMismatch { expected: 0, got: 1 })
        ));
        validate_and_increment_nonce(&mut account, 0).unwrap();
        assert_eq!(account.nonce, 1);
    }

    #[test]
    fn test_memory_apply_and_reads() {
        let executor = Runner::default();
        executor.start(|_| async move {
            let mut state = Memory::default();
            let (_, public) = create_account_keypair(1);

            assert_eq!(game(&state).await.unwrap(), GameState::default());
            assert_eq!(player_position(&state, &public).await.unwrap(), None);

            state
                .apply(vec![
                    (
                        Key::Player(public.clone()),
                        Status::Update(Value::Player(Player::new())),
                    ),
                    (
                        Key::Account(public.clone()),
                        Status::Update(Value::Account(Account { nonce: 4 })),
                    ),
                ])
                .await
                .unwrap();
            assert_eq!(player_position(&state, &public).await.unwrap(), Some(0));
            assert_eq!(nonce(&state, &public).await.unwrap(), 4);

            state
                .apply(vec![(Key::Player(public.clone()), Status::Delete)])
                .await
                .unwrap();
            assert_eq!(player_position(&state, &public).await.unwrap(), None);
        });
    }
}
