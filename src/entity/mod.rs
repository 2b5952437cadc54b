//! Board entities and their kinds

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{EntityId, Position};

/// Closed set of things that can occupy a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The single entity driven by the decision source
    ControlledAgent,
    /// Static, never moves, blocks movement
    Obstacle,
    /// Eaten on contact, heals the eater
    Resource,
    /// Hostile; closes in on the agent every turn
    Pursuer,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::ControlledAgent => "ControlledAgent",
            EntityKind::Obstacle => "Obstacle",
            EntityKind::Resource => "Resource",
            EntityKind::Pursuer => "Pursuer",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single occupant of the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    /// Display name; only meaningful for the controlled agent
    pub name: String,
    /// Raw health, never clamped below zero
    pub health: i32,
    /// Reserved, no rule reads it yet
    pub energy: i32,
}

impl Entity {
    pub const DEFAULT_HEALTH: i32 = 100;
    pub const DEFAULT_ENERGY: i32 = 100;

    pub fn new(id: EntityId, kind: EntityKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            name: "Unknown".to_string(),
            health: Self::DEFAULT_HEALTH,
            energy: Self::DEFAULT_ENERGY,
        }
    }

    /// Create the controlled agent with a display name
    pub fn agent(id: EntityId, name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            ..Self::new(id, EntityKind::ControlledAgent, position)
        }
    }

    pub fn is_agent(&self) -> bool {
        self.kind == EntityKind::ControlledAgent
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let agent = Entity::agent(EntityId(1), "Alex", Position::new(5, 5));
        assert_eq!(agent.kind, EntityKind::ControlledAgent);
        assert_eq!(agent.name, "Alex");
        assert_eq!(agent.health, 100);
        assert_eq!(agent.energy, 100);
        assert!(agent.is_agent());
        assert!(agent.is_alive());
    }

    #[test]
    fn test_zero_health_is_not_alive() {
        let mut agent = Entity::agent(EntityId(1), "Alex", Position::new(0, 0));
        agent.health = 0;
        assert!(!agent.is_alive());
        agent.health = -20;
        assert!(!agent.is_alive());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&EntityKind::ControlledAgent).unwrap();
        assert_eq!(json, "\"controlled_agent\"");
        let kind: EntityKind = serde_json::from_str("\"pursuer\"").unwrap();
        assert_eq!(kind, EntityKind::Pursuer);
    }
}
