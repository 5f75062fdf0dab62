use super::super::*;

/// Pay `winner` their share of the pool.
///
/// Only the ledger is debited here; the payout itself travels on the winning move's transfer.
pub(super) fn settle(
    game: &mut GameState,
    winner: &PublicKey,
) -> Result<(u64, Event), GameError> {
    let reward = game.reward();
    game.debit(reward)?;
    Ok((
        reward,
        Event::TreasureFound {
            winner: winner.clone(),
            position: game.treasure_position(),
            reward,
            remaining: game.ledger_balance(),
        },
    ))
}
