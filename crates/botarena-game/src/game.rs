//! The `Game` trait, the extension point for game developers.
//!
//! This is the single trait a game implements. The session dispatcher
//! calls these methods as platform messages arrive; the developer writes
//! the rules and talks back through the [`GameContext`].
//!
//! Callbacks are never called concurrently: the dispatcher finishes one
//! inbound message (including every callback it triggers) before it
//! decodes the next. Game state therefore needs no locking.

use botarena_protocol::{BotIdentity, Payload, Scores, Value};

use crate::{GameContext, GameError, GamePhase};

/// A turn-based game driven by the platform.
///
/// Required: [`on_start`](Game::on_start), [`on_move_received`](Game::on_move_received)
/// and [`reset`](Game::reset). Everything else has a default that
/// concrete games may override.
pub trait Game: Send + 'static {
    /// Called after the descriptor of a new round has been installed in
    /// `ctx`.
    ///
    /// Select the module from `ctx.module_name()`, call
    /// [`reset`](Game::reset), then request the first move.
    ///
    /// # Errors
    /// [`GameError::UnknownModule`] if the module isn't implemented.
    fn on_start(&mut self, ctx: &mut GameContext) -> Result<(), GameError>;

    /// Called for every move the platform relays, whatever the round phase.
    ///
    /// A move outside a round or from a bot whose turn it isn't should be
    /// logged and ignored; an illegal move from the right bot should end in
    /// [`disqualify`](Game::disqualify).
    fn on_move_received(
        &mut self,
        ctx: &mut GameContext,
        sender: &BotIdentity,
        data: Value,
    ) -> Result<(), GameError>;

    /// Returns the game-specific state to its initial, ready-to-start
    /// condition.
    fn reset(&mut self);

    /// Called when a bot sends game-internal data. Default: no-op.
    fn on_update_received(
        &mut self,
        _ctx: &mut GameContext,
        _sender: &BotIdentity,
        _data: Value,
    ) -> Result<(), GameError> {
        Ok(())
    }

    /// Called for any payload tag the protocol doesn't know.
    /// Default: logs a warning.
    fn on_other_message_received(
        &mut self,
        _ctx: &mut GameContext,
        sender: Option<&BotIdentity>,
        payload: &Payload,
    ) -> Result<(), GameError> {
        tracing::warn!(
            tag = payload.tag(),
            sender = sender.map(|b| b.name()),
            "unhandled message"
        );
        Ok(())
    }

    /// Called when the platform interrupts the round. Default: reset.
    fn on_interrupt(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        self.reset();
        ctx.set_phase(GamePhase::Idle);
        Ok(())
    }

    /// Called when a bot of this round lost its connection.
    /// Default: reset, then tell the platform the round is interrupted.
    fn on_bot_disconnected(
        &mut self,
        ctx: &mut GameContext,
        bot: &BotIdentity,
    ) -> Result<(), GameError> {
        tracing::info!(%bot, "bot disconnected, interrupting round");
        self.reset();
        ctx.set_phase(GamePhase::Idle);
        ctx.sender().send(Payload::Interrupt)?;
        Ok(())
    }

    /// Removes `bot` from the roster and, if it was in it, reports the
    /// disqualification to the platform.
    ///
    /// Two-player games usually override this to also score and finish
    /// the round, since one remaining bot can't play on.
    fn disqualify(&mut self, ctx: &mut GameContext, bot: &BotIdentity) -> Result<(), GameError> {
        if ctx.remove_bot(bot) {
            tracing::info!(%bot, "bot disqualified");
            ctx.sender().send(Payload::Disqualify(bot.clone()))?;
        }
        Ok(())
    }

    /// Reports the final scores, then resets. A finished game is
    /// always ready for the next `START`.
    fn send_finished(&mut self, ctx: &mut GameContext, scores: Scores) -> Result<(), GameError> {
        ctx.sender().send(Payload::Finished(scores))?;
        self.reset();
        ctx.set_phase(GamePhase::Idle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use botarena_protocol::{Codec, Envelope, JsonCodec, SessionDescriptor};
    use serde_json::Map;
    use uuid::Uuid;

    use super::*;
    use crate::{MessageSender, OutboundReceiver};

    /// Counts resets and nothing else; exercises the provided defaults.
    #[derive(Default)]
    struct Minimal {
        resets: usize,
    }

    impl Game for Minimal {
        fn on_start(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
            self.reset();
            Ok(())
        }

        fn on_move_received(
            &mut self,
            _ctx: &mut GameContext,
            _sender: &BotIdentity,
            _data: Value,
        ) -> Result<(), GameError> {
            Ok(())
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn bot(n: u128) -> BotIdentity {
        BotIdentity::new(Uuid::from_u128(n), format!("bot-{n}"), "owner")
    }

    fn started() -> (GameContext, OutboundReceiver) {
        let (sender, rx) = MessageSender::channel();
        let mut ctx = GameContext::new(sender);
        ctx.install(SessionDescriptor {
            name: None,
            module_name: "m".into(),
            version: "1".into(),
            settings: Map::new(),
            bots: vec![bot(1), bot(2)],
        });
        (ctx, rx)
    }

    fn drain(rx: &mut OutboundReceiver) -> Vec<Payload> {
        let mut out = Vec::new();
        while let Ok(text) = rx.try_recv() {
            let env: Envelope = JsonCodec.decode(&text).unwrap();
            out.push(env.payload);
        }
        out
    }

    #[test]
    fn test_default_interrupt_resets_to_idle_silently() {
        let (mut ctx, mut rx) = started();
        let mut game = Minimal::default();
        game.on_interrupt(&mut ctx).unwrap();
        assert_eq!(game.resets, 1);
        assert_eq!(ctx.phase(), &GamePhase::Idle);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_default_bot_disconnected_resets_and_interrupts() {
        let (mut ctx, mut rx) = started();
        let mut game = Minimal::default();
        game.on_bot_disconnected(&mut ctx, &bot(2)).unwrap();
        assert_eq!(game.resets, 1);
        assert_eq!(drain(&mut rx), vec![Payload::Interrupt]);
    }

    #[test]
    fn test_default_disqualify_only_reports_roster_members() {
        let (mut ctx, mut rx) = started();
        let mut game = Minimal::default();

        game.disqualify(&mut ctx, &bot(1)).unwrap();
        game.disqualify(&mut ctx, &bot(1)).unwrap();
        game.disqualify(&mut ctx, &bot(7)).unwrap();

        assert_eq!(drain(&mut rx), vec![Payload::Disqualify(bot(1))]);
        assert_eq!(ctx.bots(), &[bot(2)]);
    }

    #[test]
    fn test_send_finished_reports_then_resets() {
        let (mut ctx, mut rx) = started();
        let mut game = Minimal::default();
        let scores: Scores = [(bot(1), 1), (bot(2), 1)].into_iter().collect();

        game.send_finished(&mut ctx, scores.clone()).unwrap();

        assert_eq!(game.resets, 1);
        assert_eq!(ctx.phase(), &GamePhase::Idle);
        assert_eq!(drain(&mut rx), vec![Payload::Finished(scores)]);
    }

    #[test]
    fn test_default_update_and_other_are_no_ops() {
        let (mut ctx, mut rx) = started();
        let mut game = Minimal::default();
        game.on_update_received(&mut ctx, &bot(1), Value::Null).unwrap();
        game.on_other_message_received(
            &mut ctx,
            None,
            &Payload::Other {
                tag: "CHAT".into(),
                body: None,
            },
        )
        .unwrap();
        assert_eq!(game.resets, 0);
        assert!(drain(&mut rx).is_empty());
    }
}
