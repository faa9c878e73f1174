//! Framework-owned state handed to every game callback.

use botarena_protocol::{BotIdentity, SessionDescriptor};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{GamePhase, MessageSender, SendError};

/// The part of a session the framework owns on behalf of the game: the
/// descriptor of the current round, the active roster, the round phase
/// and the outbound sender.
///
/// Game-specific state (board, turn index) lives in the [`Game`](crate::Game)
/// value itself.
#[derive(Debug)]
pub struct GameContext {
    sender: MessageSender,
    descriptor: Option<SessionDescriptor>,
    roster: Vec<BotIdentity>,
    phase: GamePhase,
}

impl GameContext {
    pub fn new(sender: MessageSender) -> Self {
        Self {
            sender,
            descriptor: None,
            roster: Vec::new(),
            phase: GamePhase::Idle,
        }
    }

    /// Installs the descriptor of a new round, discarding the previous
    /// one and its roster.
    pub fn install(&mut self, descriptor: SessionDescriptor) {
        self.roster = descriptor.bots.clone();
        self.descriptor = Some(descriptor);
        self.set_phase(GamePhase::Started);
    }

    pub fn descriptor(&self) -> Option<&SessionDescriptor> {
        self.descriptor.as_ref()
    }

    /// The module of the current round, or `""` before the first `START`.
    pub fn module_name(&self) -> &str {
        self.descriptor
            .as_ref()
            .map(|d| d.module_name.as_str())
            .unwrap_or_default()
    }

    pub fn settings(&self) -> Option<&Map<String, Value>> {
        self.descriptor.as_ref().map(|d| &d.settings)
    }

    /// Bots still in the round, in turn order.
    pub fn bots(&self) -> &[BotIdentity] {
        &self.roster
    }

    pub fn bot(&self, index: usize) -> Option<&BotIdentity> {
        self.roster.get(index)
    }

    /// Removes `bot` from the roster. Returns `false` if it wasn't in it.
    pub fn remove_bot(&mut self, bot: &BotIdentity) -> bool {
        let before = self.roster.len();
        self.roster.retain(|b| b != bot);
        self.roster.len() != before
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if !self.phase.can_transition_to(&phase) {
            tracing::warn!(from = %self.phase, to = %phase, "unexpected phase transition");
        }
        tracing::trace!(from = %self.phase, to = %phase, "phase change");
        self.phase = phase;
    }

    pub fn sender(&self) -> &MessageSender {
        &self.sender
    }

    /// Asks `bot` for its move and records that the round now waits on it.
    pub fn request_move<T: Serialize>(
        &mut self,
        data: &T,
        bot: &BotIdentity,
    ) -> Result<(), SendError> {
        self.sender.send_move(data, bot)?;
        self.set_phase(GamePhase::AwaitingMove { bot: bot.clone() });
        Ok(())
    }
}
