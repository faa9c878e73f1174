//! The tic-tac-toe rules on top of the botarena `Game` trait.

use botarena::prelude::*;
use serde::Serialize;

use crate::{Board, Module, Outcome};

/// Body of the `MOVE` request sent to the bot whose turn it is.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest<'a> {
    pub board: &'a [u8],
    /// Index of the bot being asked, `0` or `1`.
    pub player: usize,
}

/// Two bots take turns; the first bot in the roster moves first.
///
/// Points: a win is 2 for the winner and 0 for the loser, a draw is 1
/// each, and a disqualified bot gets 0 while the other gets 2.
#[derive(Debug, Default)]
pub struct TicTacToe {
    board: Option<Board>,
    current: usize,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    /// The board of the current round, `None` before the first `START`.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Roster index of the bot whose turn it is.
    pub fn current(&self) -> usize {
        self.current
    }

    fn request_move(&self, ctx: &mut GameContext) -> Result<(), GameError> {
        let (Some(board), Some(bot)) = (&self.board, ctx.bot(self.current).cloned()) else {
            return Ok(());
        };
        let request = MoveRequest {
            board: board.cells(),
            player: self.current,
        };
        ctx.request_move(&request, &bot)?;
        Ok(())
    }

    fn finish(&mut self, ctx: &mut GameContext, outcome: Outcome) -> Result<(), GameError> {
        let bots = ctx.bots().to_vec();
        let scores: Scores = match outcome {
            Outcome::Won(winner) => bots
                .iter()
                .enumerate()
                .map(|(i, bot)| (bot.clone(), if i == winner { 2 } else { 0 }))
                .collect(),
            Outcome::Draw => bots.iter().map(|bot| (bot.clone(), 1)).collect(),
            Outcome::Running => return Ok(()),
        };
        tracing::info!(?outcome, "round over");
        self.send_finished(ctx, scores)
    }
}

/// A move is a cell index; anything else is illegal.
fn parse_move(data: &Value) -> Option<usize> {
    data.as_u64().and_then(|i| usize::try_from(i).ok())
}

impl Game for TicTacToe {
    fn on_start(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        let module = Module::from_name(ctx.module_name())
            .ok_or_else(|| GameError::UnknownModule(ctx.module_name().to_owned()))?;
        if ctx.bots().len() != 2 {
            return Err(GameError::RosterSize {
                expected: 2,
                actual: ctx.bots().len(),
            });
        }
        tracing::info!(module = module.name(), "starting tic-tac-toe");

        self.board = Some(Board::new(module));
        self.reset();
        self.request_move(ctx)
    }

    fn on_move_received(
        &mut self,
        ctx: &mut GameContext,
        sender: &BotIdentity,
        data: Value,
    ) -> Result<(), GameError> {
        if !ctx.phase().is_active() {
            tracing::warn!(%sender, "move outside a round, ignoring");
            return Ok(());
        }
        if ctx.bot(self.current) != Some(sender) {
            let current = ctx.bot(self.current).map(|b| b.name());
            tracing::warn!(%sender, ?current, "move out of turn, ignoring");
            return Ok(());
        }
        let Some(board) = self.board.as_mut() else {
            return Ok(());
        };

        let placed = parse_move(&data).is_some_and(|index| board.place(index, self.current));
        if !placed {
            tracing::info!(%sender, %data, "illegal move");
            return self.disqualify(ctx, sender);
        }

        ctx.sender().send_update(&board.cells(), ctx.bots())?;

        match board.outcome() {
            Outcome::Running => {
                self.current = (self.current + 1) % 2;
                self.request_move(ctx)
            }
            outcome => self.finish(ctx, outcome),
        }
    }

    fn reset(&mut self) {
        if let Some(board) = &mut self.board {
            board.clear();
        }
        self.current = 0;
    }

    /// Disqualification ends a two-bot round: the other bot wins.
    fn disqualify(&mut self, ctx: &mut GameContext, bot: &BotIdentity) -> Result<(), GameError> {
        let other = ctx.bots().iter().find(|b| *b != bot).cloned();
        if !ctx.remove_bot(bot) {
            return Ok(());
        }
        ctx.sender().send(Payload::Disqualify(bot.clone()))?;

        let mut scores = Scores::new();
        scores.insert(bot.clone(), 0);
        if let Some(other) = other {
            scores.insert(other, 2);
        }
        self.send_finished(ctx, scores)
    }
}
