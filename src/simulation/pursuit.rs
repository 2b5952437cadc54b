//! Pursuer behavior - greedy single-step chase and adjacency attacks
//!
//! Pursuers act after the agent, one at a time in collection order. Each
//! one looks at the board as left by the pursuers before it, so two
//! pursuers may race for the same cell and the later one is blocked.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, Position};
use crate::entity::EntityKind;
use crate::world::board::{ConsumeRule, GridBoard, MoveOutcome};

/// What one pursuer did this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerAction {
    /// Bit the agent instead of moving; `health` is the agent's health after
    Attacked { damage: i32, health: i32 },
    Stepped(MoveOutcome),
    /// Zero step (already on the agent's cell)
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PursuerEvent {
    pub pursuer: EntityId,
    pub action: PursuerAction,
}

/// Everything the pursuer phase did, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PursuitReport {
    pub events: Vec<PursuerEvent>,
}

impl PursuitReport {
    pub fn attacks(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.action, PursuerAction::Attacked { .. }))
            .count()
    }

    pub fn total_damage(&self) -> i32 {
        self.events
            .iter()
            .map(|e| match e.action {
                PursuerAction::Attacked { damage, .. } => damage,
                _ => 0,
            })
            .sum()
    }
}

/// Greedy single-axis step from `from` toward `target`
///
/// Moves along x only when the horizontal gap is strictly larger; ties go
/// vertical. Returns (0, 0) when the positions coincide.
pub fn greedy_step(from: Position, target: Position) -> (i32, i32) {
    let dx = target.x - from.x;
    let dy = target.y - from.y;

    if dx.abs() > dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    }
}

/// Per-turn pursuer rules
#[derive(Debug, Clone, Copy)]
pub struct PursuerPolicy {
    pub damage: i32,
    pub consume: ConsumeRule,
}

impl Default for PursuerPolicy {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl PursuerPolicy {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            damage: config.pursuer_damage,
            consume: if config.pursuers_consume_resources {
                ConsumeRule::Eat
            } else {
                ConsumeRule::Block
            },
        }
    }

    /// Advance every pursuer one step toward the controlled agent
    ///
    /// Without an agent on the board the pursuers stay frozen.
    pub fn advance_all(&self, board: &mut GridBoard) -> PursuitReport {
        let mut report = PursuitReport::default();

        let Some(agent) = board.agent() else {
            return report;
        };
        let agent_id = agent.id;
        let agent_pos = agent.position;

        for pursuer in board.ids_of_kind(EntityKind::Pursuer) {
            let Some(from) = board.entity(pursuer).map(|e| e.position) else {
                continue;
            };

            let (sx, sy) = greedy_step(from, agent_pos);
            let action = if (sx, sy) == (0, 0) {
                PursuerAction::Idle
            } else if from.offset(sx, sy) == agent_pos {
                match board.damage(agent_id, self.damage) {
                    Ok(health) => {
                        tracing::info!(?pursuer, damage = self.damage, health, "pursuer attacked agent");
                        PursuerAction::Attacked {
                            damage: self.damage,
                            health,
                        }
                    }
                    Err(_) => PursuerAction::Idle,
                }
            } else {
                match board.move_entity_with(pursuer, sx, sy, self.consume) {
                    Ok(outcome) => PursuerAction::Stepped(outcome),
                    Err(_) => PursuerAction::Idle,
                }
            };

            report.events.push(PursuerEvent { pursuer, action });
        }

        report
    }
}
