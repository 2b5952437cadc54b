//! Scenario bootstrap - fixed initial entity layouts
//!
//! A scenario names the board size, the controlled agent, and every other
//! entity's starting cell. Layouts can be built in code or read from TOML:
//!
//! ```toml
//! name = "meadow"
//! width = 10
//! height = 10
//!
//! [agent]
//! name = "Alex"
//! x = 5
//! y = 5
//!
//! [[entities]]
//! kind = "obstacle"
//! x = 2
//! y = 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, Position};
use crate::entity::{Entity, EntityKind};
use crate::world::board::GridBoard;

/// Starting cell and name of the controlled agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPlacement {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

/// Starting cell of a non-agent entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPlacement {
    pub kind: EntityKind,
    pub x: i32,
    pub y: i32,
}

impl EntityPlacement {
    pub fn new(kind: EntityKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }
}

/// Full initial layout of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub agent: AgentPlacement,
    #[serde(default)]
    pub entities: Vec<EntityPlacement>,
}

/// A freshly built board plus the id of its controlled agent
#[derive(Debug, Clone)]
pub struct BuiltScenario {
    pub board: GridBoard,
    pub agent_id: EntityId,
}

impl Scenario {
    /// The default 10x10 meadow: three trees, two apples, one wolf
    pub fn meadow() -> Self {
        use EntityKind::*;
        Self {
            name: "meadow".into(),
            width: 10,
            height: 10,
            agent: AgentPlacement {
                name: "Alex".into(),
                x: 5,
                y: 5,
            },
            entities: vec![
                EntityPlacement::new(Obstacle, 2, 2),
                EntityPlacement::new(Obstacle, 8, 1),
                EntityPlacement::new(Obstacle, 3, 7),
                EntityPlacement::new(Resource, 6, 5),
                EntityPlacement::new(Resource, 1, 8),
                EntityPlacement::new(Pursuer, 5, 2),
            ],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Place every entity on a new board
    ///
    /// The agent gets id 1 and the rest are numbered in declaration order.
    /// Board size comes from the scenario; health rules come from `config`.
    pub fn build(&self, config: &SimulationConfig) -> Result<BuiltScenario> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::Config(format!(
                "board must be at least 1x1 (got {}x{})",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(SimError::Config("board dimensions exceed i32 range".into()));
        }
        config.validate()?;

        let mut board = GridBoard::with_config(self.width, self.height, config);
        let mut occupied = HashSet::new();

        let agent_id = EntityId(1);
        let agent_pos = Position::new(self.agent.x, self.agent.y);
        occupied.insert(agent_pos);
        board.place(Entity::agent(agent_id, self.agent.name.clone(), agent_pos))?;

        for (offset, placement) in self.entities.iter().enumerate() {
            if placement.kind == EntityKind::ControlledAgent {
                return Err(SimError::Config(
                    "only the [agent] table may declare the controlled agent".into(),
                ));
            }
            let pos = Position::new(placement.x, placement.y);
            if !occupied.insert(pos) {
                return Err(SimError::Config(format!("two entities placed at {}", pos)));
            }
            let id = EntityId(offset as u32 + 2);
            board.place(Entity::new(id, placement.kind, pos))?;
        }

        tracing::info!(
            scenario = %self.name,
            entities = board.entities().len(),
            "scenario built"
        );

        Ok(BuiltScenario { board, agent_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::board::MoveOutcome;

    #[test]
    fn test_meadow_layout() {
        let built = Scenario::meadow()
            .build(&SimulationConfig::default())
            .unwrap();
        let board = &built.board;

        assert_eq!(built.agent_id, EntityId(1));
        assert_eq!(board.entities().len(), 7);
        assert_eq!(board.count_of_kind(EntityKind::Obstacle), 3);
        assert_eq!(board.count_of_kind(EntityKind::Resource), 2);
        assert_eq!(board.count_of_kind(EntityKind::Pursuer), 1);

        let agent = board.agent().unwrap();
        assert_eq!(agent.name, "Alex");
        assert_eq!(agent.position, Position::new(5, 5));
        assert_eq!(
            board.entity_at(Position::new(5, 2)).unwrap().id,
            EntityId(7)
        );
        assert!(board.is_consistent());
    }

    #[test]
    fn test_toml_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
            name = "corridor"
            width = 5
            height = 1

            [agent]
            name = "Rin"
            x = 0
            y = 0

            [[entities]]
            kind = "pursuer"
            x = 4
            y = 0
            "#,
        )
        .unwrap();

        let built = scenario.build(&SimulationConfig::default()).unwrap();
        assert_eq!(built.board.width(), 5);
        assert_eq!(built.board.height(), 1);
        assert_eq!(built.board.agent().unwrap().name, "Rin");
        assert_eq!(built.board.ids_of_kind(EntityKind::Pursuer), vec![EntityId(2)]);
    }

    #[test]
    fn test_bundled_meadow_matches_builtin() {
        let loaded = Scenario::load("data/scenarios/meadow.toml").unwrap();
        assert_eq!(loaded, Scenario::meadow());
    }

    #[test]
    fn test_bundled_pack_builds() {
        let built = Scenario::load("data/scenarios/pack.toml")
            .unwrap()
            .build(&SimulationConfig::default())
            .unwrap();
        assert_eq!(built.board.count_of_kind(EntityKind::Pursuer), 2);
        assert!(built.board.is_consistent());
    }

    #[test]
    fn test_scenario_size_with_config_rules() {
        let config = SimulationConfig::from_toml_str("resource_heal = 5").unwrap();
        let mut scenario = Scenario::meadow();
        scenario.width = 16;
        scenario.height = 12;

        let mut built = scenario.build(&config).unwrap();
        assert_eq!(built.board.width(), 16);
        assert_eq!(built.board.height(), 12);
        assert!(built.board.in_bounds(Position::new(15, 11)));

        // Heal amount still comes from the config
        built.board.damage(built.agent_id, 50).unwrap();
        let outcome = built.board.move_entity(built.agent_id, 1, 0).unwrap();
        assert!(matches!(outcome, MoveOutcome::Consumed { health: 55, .. }));
    }

    #[test]
    fn test_zero_sized_scenario_rejected() {
        let mut scenario = Scenario::meadow();
        scenario.width = 0;
        let result = scenario.build(&SimulationConfig::default());
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_overlap_rejected() {
        let mut scenario = Scenario::meadow();
        scenario
            .entities
            .push(EntityPlacement::new(EntityKind::Obstacle, 5, 5));
        let result = scenario.build(&SimulationConfig::default());
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut scenario = Scenario::meadow();
        scenario
            .entities
            .push(EntityPlacement::new(EntityKind::Resource, 10, 0));
        let result = scenario.build(&SimulationConfig::default());
        assert!(matches!(result, Err(SimError::OutOfBounds(_))));
    }

    #[test]
    fn test_second_agent_rejected() {
        let mut scenario = Scenario::meadow();
        scenario
            .entities
            .push(EntityPlacement::new(EntityKind::ControlledAgent, 0, 0));
        let result = scenario.build(&SimulationConfig::default());
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}
