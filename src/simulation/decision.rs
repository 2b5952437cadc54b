//! Decision sources - who picks the agent's next move
//!
//! The turn protocol hands a perception summary and the agent's health to a
//! [`DecisionSource`] and gets back a move [`Intent`]. Any error from the
//! source means "no usable decision" and the turn proceeds as a skip.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Direction;
use crate::simulation::perception::{CellKind, Perception};

/// A requested move, optionally with the reasoning behind it
///
/// Deserializes from the model reply shape
/// `{"thought": "...", "action": "MOVE", "dx": 1, "dy": 0}`; the `action`
/// field is ignored and missing deltas default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default, alias = "thought")]
    pub rationale: Option<String>,
    #[serde(default)]
    pub dx: i32,
    #[serde(default)]
    pub dy: i32,
}

impl Intent {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self {
            rationale: None,
            dx,
            dy,
        }
    }

    pub fn toward(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(dx, dy)
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Anything that can choose the agent's move
pub trait DecisionSource {
    /// Pick a move given the agent's surroundings and health
    fn decide(&mut self, perception: &Perception, health: i32) -> Result<Intent>;
}

/// Replays a fixed list of decisions; `None` entries act as failures
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    script: VecDeque<Option<Intent>>,
    /// Every (perception, health) pair this source was asked about
    pub seen: Vec<(Perception, i32)>,
}

impl ScriptedDecisions {
    pub fn new(script: impl IntoIterator<Item = Option<Intent>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            seen: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn decide(&mut self, perception: &Perception, health: i32) -> Result<Intent> {
        self.seen.push((perception.clone(), health));
        match self.script.pop_front() {
            Some(Some(intent)) => Ok(intent),
            Some(None) => Err(SimError::DecisionUnavailable("scripted failure".into())),
            None => Err(SimError::DecisionUnavailable("script exhausted".into())),
        }
    }
}

/// Seeded wanderer: eats adjacent resources, otherwise steps into open ground
#[derive(Debug, Clone)]
pub struct RandomWalker {
    rng: ChaCha8Rng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionSource for RandomWalker {
    fn decide(&mut self, perception: &Perception, _health: i32) -> Result<Intent> {
        let food: Vec<_> = perception.directions_with(CellKind::Resource).collect();
        if let Some(direction) = food.first() {
            return Ok(Intent::toward(*direction).with_rationale(format!(
                "Food to the {}.",
                direction.name()
            )));
        }

        let open: Vec<_> = perception.directions_with(CellKind::Empty).collect();
        let direction = open
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| SimError::DecisionUnavailable("boxed in".into()))?;

        Ok(Intent::toward(direction).with_rationale(format!("Wandering {}.", direction.name())))
    }
}
