use super::super::*;

impl<'a, S: State, R: Rail, A: Authority> Layer<'a, S, R, A> {
    pub(in crate::layer) async fn handle_update_treasure_position(
        &mut self,
        public: &PublicKey,
        position: u32,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.authorize(public)?;
        let mut game = self.load_game().await?;
        game.relocate_treasure(position)?;
        self.insert(Key::Game, Value::Game(game));

        info!(position, "treasure relocated");
        Ok(vec![Event::TreasureRelocated { position }])
    }

    /// Drain the whole pool to the owner.
    pub(in crate::layer) async fn handle_withdraw(
        &mut self,
        public: &PublicKey,
    ) -> Result<Vec<Event>, ExecutionError> {
        self.authorize(public)?;
        let mut game = self.load_game().await?;
        let amount = game.ledger_balance();
        game.debit(amount)?;
        self.insert(Key::Game, Value::Game(game));
        self.transfer(Transfer::outgoing(public.clone(), amount))?;

        info!(owner = ?public, amount, "pool withdrawn");
        Ok(vec![Event::Withdrawn {
            owner: public.clone(),
            amount,
        }])
    }
}
