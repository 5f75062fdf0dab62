use super::super::*;

impl<'a, S: State, R: Rail, A: Authority> Layer<'a, S, R, A> {
    pub(in crate::layer) async fn handle_participate(
        &mut self,
        public: &PublicKey,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        // A returning player is rejected no matter what they attached.
        if load_player(self, public)
            .await?
            .is_some_and(|player| player.has_participated)
        {
            return Err(GameError::AlreadyParticipating.into());
        }
        if paid < PARTICIPATION_FEE {
            return Err(GameError::InsufficientFee {
                fee: Fee::Participation,
                paid,
                required: PARTICIPATION_FEE,
            }
            .into());
        }

        let mut game = self.load_game().await?;
        game.enqueue(public.clone())?;
        game.credit(paid)?;
        let players = game.players();

        self.insert(Key::Player(public.clone()), Value::Player(Player::new()));
        self.insert(Key::Game, Value::Game(game));
        self.transfer(Transfer::incoming(public.clone(), paid))?;

        debug!(player = ?public, paid, players, "player joined");
        Ok(vec![Event::Participated {
            player: public.clone(),
            paid,
        }])
    }
}
