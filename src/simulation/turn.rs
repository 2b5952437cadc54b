//! Turn protocol - perceive, decide, act, pursuers react, check for death
//!
//! The protocol owns the board. A turn runs to completion before the next
//! may start, and once the agent's health reaches zero the protocol goes
//! Terminal and refuses every later turn.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Turn};
use crate::simulation::decision::{DecisionSource, Intent};
use crate::simulation::pursuit::{PursuerPolicy, PursuitReport};
use crate::world::board::{GridBoard, MoveOutcome};
use crate::world::scenario::BuiltScenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Active,
    /// Absorbing: the agent is dead
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnKind {
    /// Ask the decision source for a move
    Think,
    /// Skip the agent's action entirely
    Wait,
}

/// How the decision step went
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionOutcome {
    Decided(Intent),
    /// The source failed or returned nothing usable; the move was skipped
    Unavailable(String),
    /// Wait turn; no decision was requested
    NotRequested,
    /// The agent could not be perceived
    AgentMissing,
}

/// Everything that happened during one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: Turn,
    pub kind: TurnKind,
    pub decision: DecisionOutcome,
    pub agent_move: Option<MoveOutcome>,
    /// `None` when the agent died before the pursuers got to act
    pub pursuit: Option<PursuitReport>,
    pub health: Option<i32>,
    pub state: TurnState,
}

/// Owns the board and sequences turns against it
#[derive(Debug, Clone)]
pub struct TurnProtocol {
    board: GridBoard,
    agent_id: EntityId,
    policy: PursuerPolicy,
    state: TurnState,
    turn: Turn,
}

impl TurnProtocol {
    pub fn new(board: GridBoard, agent_id: EntityId, config: &SimulationConfig) -> Self {
        let mut protocol = Self {
            board,
            agent_id,
            policy: PursuerPolicy::from_config(config),
            state: TurnState::Active,
            turn: 0,
        };
        protocol.check_terminal();
        protocol
    }

    pub fn from_scenario(built: BuiltScenario, config: &SimulationConfig) -> Self {
        Self::new(built.board, built.agent_id, config)
    }

    /// Run a full turn: perceive, decide, move, pursuers, with death checks
    ///
    /// Returns `None` without touching the board once Terminal.
    pub fn take_turn(&mut self, decider: &mut dyn DecisionSource) -> Option<TurnReport> {
        if self.is_terminal() {
            tracing::debug!("turn rejected: simulation is over");
            return None;
        }
        self.turn += 1;

        let (decision, agent_move) = match self.board.perceive(self.agent_id) {
            Err(_) => (DecisionOutcome::AgentMissing, None),
            Ok(perception) => {
                let health = self.agent_health().unwrap_or(0);
                tracing::debug!(turn = self.turn, vision = %perception, health, "agent perceives");

                match decider.decide(&perception, health) {
                    Ok(intent) => {
                        if let Some(thought) = &intent.rationale {
                            tracing::info!(turn = self.turn, %thought, "agent decided");
                        }
                        let outcome = self.board.move_entity(self.agent_id, intent.dx, intent.dy).ok();
                        if let Some(outcome) = &outcome {
                            tracing::info!(turn = self.turn, dx = intent.dx, dy = intent.dy, %outcome, "agent moved");
                        }
                        (DecisionOutcome::Decided(intent), outcome)
                    }
                    Err(err) => {
                        tracing::warn!(turn = self.turn, error = %err, "no decision; skipping move");
                        (DecisionOutcome::Unavailable(err.to_string()), None)
                    }
                }
            }
        };

        Some(self.finish_turn(TurnKind::Think, decision, agent_move))
    }

    /// Let the pursuers act without the agent doing anything
    pub fn wait(&mut self) -> Option<TurnReport> {
        if self.is_terminal() {
            tracing::debug!("wait rejected: simulation is over");
            return None;
        }
        self.turn += 1;
        tracing::info!(turn = self.turn, "agent waits");
        Some(self.finish_turn(TurnKind::Wait, DecisionOutcome::NotRequested, None))
    }

    fn finish_turn(
        &mut self,
        kind: TurnKind,
        decision: DecisionOutcome,
        agent_move: Option<MoveOutcome>,
    ) -> TurnReport {
        let pursuit = if self.check_terminal() {
            None
        } else {
            let report = self.policy.advance_all(&mut self.board);
            self.check_terminal();
            Some(report)
        };

        TurnReport {
            turn: self.turn,
            kind,
            decision,
            agent_move,
            pursuit,
            health: self.agent_health(),
            state: self.state,
        }
    }

    /// Flip to Terminal if the agent is gone or at zero health
    fn check_terminal(&mut self) -> bool {
        if self.state == TurnState::Active && !self.agent_alive() {
            self.state = TurnState::Terminal;
            tracing::info!(turn = self.turn, health = ?self.agent_health(), "agent eliminated");
        }
        self.is_terminal()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == TurnState::Terminal
    }

    /// Turns processed so far
    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn agent_id(&self) -> EntityId {
        self.agent_id
    }

    pub fn agent_health(&self) -> Option<i32> {
        self.board.entity(self.agent_id).map(|e| e.health)
    }

    /// True while the agent is on the board with health above zero
    pub fn agent_alive(&self) -> bool {
        self.board
            .entity(self.agent_id)
            .map(|e| e.is_alive())
            .unwrap_or(false)
    }

    /// Read-only view for presentation
    pub fn board(&self) -> &GridBoard {
        &self.board
    }
}
