//! Perception summary - what the agent sees in the four adjacent cells

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Direction, EntityId};
use crate::entity::EntityKind;

/// Classification of one adjacent cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Outside the board
    Wall,
    Empty,
    ControlledAgent,
    Obstacle,
    Resource,
    Pursuer,
}

impl From<EntityKind> for CellKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::ControlledAgent => CellKind::ControlledAgent,
            EntityKind::Obstacle => CellKind::Obstacle,
            EntityKind::Resource => CellKind::Resource,
            EntityKind::Pursuer => CellKind::Pursuer,
        }
    }
}

impl CellKind {
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::Wall => "Wall",
            CellKind::Empty => "Empty",
            CellKind::ControlledAgent => "ControlledAgent",
            CellKind::Obstacle => "Obstacle",
            CellKind::Resource => "Resource",
            CellKind::Pursuer => "Pursuer",
        }
    }
}

/// Fixed-order (N, S, E, W) view of the cells around one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perception {
    pub observer: EntityId,
    pub cells: [(Direction, CellKind); 4],
}

impl Perception {
    /// Classification in a given direction
    pub fn toward(&self, direction: Direction) -> CellKind {
        self.cells
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, kind)| *kind)
            .unwrap_or(CellKind::Wall)
    }

    /// Directions whose cell matches the given classification, in N/S/E/W order
    pub fn directions_with(&self, kind: CellKind) -> impl Iterator<Item = Direction> + '_ {
        self.cells
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(d, _)| *d)
    }

    /// Single-line description, e.g. "North: Wall, South: Empty, East: Resource, West: Wall"
    pub fn vision_text(&self) -> String {
        self.cells
            .iter()
            .map(|(d, k)| format!("{}: {}", d.name(), k.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Perception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.vision_text())
    }
}
