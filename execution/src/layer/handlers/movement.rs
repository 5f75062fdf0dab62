use super::super::*;
use super::settlement::settle;
use anyhow::Context as _;

impl<'a, S: State, R: Rail, A: Authority> Layer<'a, S, R, A> {
    pub(in crate::layer) async fn handle_move(
        &mut self,
        public: &PublicKey,
        direction: Direction,
        paid: u64,
    ) -> Result<Vec<Event>, ExecutionError> {
        let mut game = self.load_game().await?;
        if !game.is_turn_of(public) {
            return Err(GameError::NotYourTurn.into());
        }
        if paid < MOVE_FEE {
            return Err(GameError::InsufficientFee {
                fee: Fee::Move,
                paid,
                required: MOVE_FEE,
            }
            .into());
        }
        let mut player = load_player(self, public)
            .await?
            .context("turn holder has no player record")?;

        let from = player.position;
        let to = direction
            .step(from)
            .ok_or(GameError::OutOfBounds(direction))?;
        player.position = to;
        game.credit(paid)?;

        let mut events = vec![Event::Moved {
            player: public.clone(),
            direction,
            from,
            to,
            paid,
        }];
        let mut transfer = Transfer::incoming(public.clone(), paid);
        // The winner keeps the turn.
        let reward = if to == game.treasure_position() {
            let (reward, found) = settle(&mut game, public)?;
            transfer = transfer.with_outgoing(public.clone(), reward);
            events.push(found);
            Some(reward)
        } else {
            if let Some(next) = game.advance_turn() {
                events.push(Event::TurnAdvanced { next: next.clone() });
            }
            None
        };
        let remaining = game.ledger_balance();

        self.insert(Key::Player(public.clone()), Value::Player(player));
        self.insert(Key::Game, Value::Game(game));
        self.transfer(transfer)?;

        if let Some(reward) = reward {
            info!(winner = ?public, position = to, reward, remaining, "treasure found");
        }
        Ok(events)
    }
}
