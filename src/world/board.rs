//! The grid board - authoritative registry of entities and their cells
//!
//! The board keeps two views of the same state: an ordered entity list and a
//! dense cell lookup. Every mutation updates both together, so an entity is
//! always found in the grid at exactly its recorded position.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Direction, EntityId, Position};
use crate::entity::{Entity, EntityKind};
use crate::simulation::perception::{CellKind, Perception};
use crate::spatial::grid::Grid;

/// Why a move did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    OutOfBounds,
    /// Destination held a non-consumable occupant of this kind
    Collision(EntityKind),
}

/// Result of a move request against an existing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved { from: Position, to: Position },
    /// Mover ate the resource at the destination and now stands there
    Consumed { resource: EntityId, health: i32 },
    Blocked(BlockReason),
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Moved { .. } => write!(f, "moved"),
            MoveOutcome::Consumed { health, .. } => {
                write!(f, "ate a resource (health {})", health)
            }
            MoveOutcome::Blocked(BlockReason::OutOfBounds) => write!(f, "blocked: out of bounds"),
            MoveOutcome::Blocked(BlockReason::Collision(kind)) => {
                write!(f, "blocked: collided with {}", kind)
            }
        }
    }
}

/// Whether stepping onto a resource eats it or is treated as a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeRule {
    Eat,
    Block,
}

/// Bounded playfield plus the entity registry
#[derive(Debug, Clone)]
pub struct GridBoard {
    cells: Grid<Option<EntityId>>,
    entities: Vec<Entity>,
    max_health: i32,
    resource_heal: i32,
}

impl GridBoard {
    /// Create an empty board with default health rules
    pub fn new(width: u32, height: u32) -> Self {
        let defaults = SimulationConfig::default();
        Self {
            cells: Grid::new(width as usize, height as usize),
            entities: Vec::new(),
            max_health: defaults.max_health,
            resource_heal: defaults.resource_heal,
        }
    }

    /// Create an empty board with health rules taken from the config
    pub fn with_config(width: u32, height: u32, config: &SimulationConfig) -> Self {
        Self {
            cells: Grid::new(width as usize, height as usize),
            entities: Vec::new(),
            max_health: config.max_health,
            resource_heal: config.resource_heal,
        }
    }

    pub fn width(&self) -> u32 {
        self.cells.width as u32
    }

    pub fn height(&self) -> u32 {
        self.cells.height as u32
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.cells.contains(pos)
    }

    /// Register an entity at its recorded position
    ///
    /// Fails with `OutOfBounds` if the position is off the board and with
    /// `Config` if the id is already taken; either way the board is untouched.
    /// Occupancy is not checked; setup must not overlap.
    pub fn place(&mut self, entity: Entity) -> Result<()> {
        if !self.in_bounds(entity.position) {
            return Err(SimError::OutOfBounds(entity.position));
        }
        if self.index_of(entity.id).is_some() {
            return Err(SimError::Config(format!(
                "entity id {:?} is already on the board",
                entity.id
            )));
        }
        tracing::debug!(id = ?entity.id, kind = %entity.kind, pos = %entity.position, "placed entity");
        self.cells.set(entity.position, Some(entity.id));
        self.entities.push(entity);
        Ok(())
    }

    /// Move an entity by (dx, dy), eating a resource at the destination
    pub fn move_entity(&mut self, id: EntityId, dx: i32, dy: i32) -> Result<MoveOutcome> {
        self.move_entity_with(id, dx, dy, ConsumeRule::Eat)
    }

    /// Move an entity by (dx, dy) with an explicit resource rule
    pub fn move_entity_with(
        &mut self,
        id: EntityId,
        dx: i32,
        dy: i32,
        rule: ConsumeRule,
    ) -> Result<MoveOutcome> {
        let index = self.index_of(id).ok_or(SimError::EntityNotFound(id))?;
        let from = self.entities[index].position;
        let to = from.offset(dx, dy);

        if to == from {
            return Ok(MoveOutcome::Moved { from, to });
        }

        if !self.in_bounds(to) {
            tracing::debug!(?id, %from, %to, "move blocked: out of bounds");
            return Ok(MoveOutcome::Blocked(BlockReason::OutOfBounds));
        }

        let occupant = self
            .cells
            .get(to)
            .copied()
            .flatten()
            .and_then(|oid| self.entity(oid).map(|e| (oid, e.kind)));

        let outcome = match occupant {
            None => MoveOutcome::Moved { from, to },
            Some((resource, EntityKind::Resource)) if rule == ConsumeRule::Eat => {
                self.remove(resource);
                // Removal shifts indices; look the mover up again.
                let index = self.index_of(id).ok_or(SimError::EntityNotFound(id))?;
                let mover = &mut self.entities[index];
                mover.health = (mover.health + self.resource_heal).min(self.max_health);
                tracing::info!(?id, ?resource, health = mover.health, "resource consumed");
                MoveOutcome::Consumed {
                    resource,
                    health: mover.health,
                }
            }
            Some((_, kind)) => {
                tracing::debug!(?id, %to, %kind, "move blocked: collision");
                return Ok(MoveOutcome::Blocked(BlockReason::Collision(kind)));
            }
        };

        self.commit(id, from, to);
        tracing::debug!(?id, %from, %to, "moved");
        Ok(outcome)
    }

    fn commit(&mut self, id: EntityId, from: Position, to: Position) {
        if self.cells.get(from).copied().flatten() == Some(id) {
            self.cells.set(from, None);
        }
        if let Some(entity) = self.entity_mut(id) {
            entity.position = to;
        }
        self.cells.set(to, Some(id));
    }

    /// Remove an entity from both the grid and the collection
    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let entity = self.entities.remove(index);
        if self.cells.get(entity.position).copied().flatten() == Some(id) {
            self.cells.set(entity.position, None);
        }
        Some(entity)
    }

    /// Classify the four cells around an entity in N, S, E, W order
    pub fn perceive(&self, id: EntityId) -> Result<Perception> {
        let entity = self.entity(id).ok_or(SimError::EntityNotFound(id))?;
        let origin = entity.position;

        let cells = Direction::ALL.map(|direction| {
            let (dx, dy) = direction.delta();
            (direction, self.classify(origin.offset(dx, dy)))
        });

        Ok(Perception {
            observer: id,
            cells,
        })
    }

    /// Classify a single cell
    pub fn classify(&self, pos: Position) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Wall;
        }
        self.entity_at(pos)
            .map(|e| CellKind::from(e.kind))
            .unwrap_or(CellKind::Empty)
    }

    /// Subtract health from an entity; no floor is applied
    pub fn damage(&mut self, id: EntityId, amount: i32) -> Result<i32> {
        let entity = self.entity_mut(id).ok_or(SimError::EntityNotFound(id))?;
        entity.health -= amount;
        Ok(entity.health)
    }

    // === READ-ONLY VIEWS ===

    /// All live entities in placement order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn entity_at(&self, pos: Position) -> Option<&Entity> {
        let id = self.cells.get(pos).copied().flatten()?;
        self.entity(id)
    }

    /// The first controlled agent in the collection, if any
    pub fn agent(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_agent())
    }

    /// Ids of every entity of the given kind, in collection order
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    /// True when the grid and the entity list describe the same placement
    /// and no two entities share an id
    pub fn is_consistent(&self) -> bool {
        let occupied = self.cells.iter().filter(|(_, c)| c.is_some()).count();
        let unique_ids = self
            .entities
            .iter()
            .map(|e| e.id)
            .collect::<HashSet<_>>()
            .len();
        occupied == self.entities.len()
            && unique_ids == self.entities.len()
            && self
                .entities
                .iter()
                .all(|e| self.cells.get(e.position).copied().flatten() == Some(e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_agent() -> (GridBoard, EntityId) {
        let mut board = GridBoard::new(10, 10);
        let id = EntityId(1);
        board
            .place(Entity::agent(id, "Alex", Position::new(5, 5)))
            .unwrap();
        (board, id)
    }

    #[test]
    fn test_place_out_of_bounds_leaves_board_untouched() {
        let mut board = GridBoard::new(4, 4);
        for pos in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(4, 0),
            Position::new(0, 4),
        ] {
            let result = board.place(Entity::new(EntityId(9), EntityKind::Obstacle, pos));
            assert!(matches!(result, Err(SimError::OutOfBounds(p)) if p == pos));
        }
        assert!(board.entities().is_empty());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (mut board, id) = board_with_agent();
        let result = board.place(Entity::new(id, EntityKind::Pursuer, Position::new(0, 0)));

        assert!(matches!(result, Err(SimError::Config(_))));
        assert_eq!(board.entities().len(), 1);
        assert!(board.entity_at(Position::new(0, 0)).is_none());
        assert_eq!(board.entity(id).unwrap().kind, EntityKind::ControlledAgent);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_move_into_empty_cell() {
        let (mut board, id) = board_with_agent();
        let outcome = board.move_entity(id, 1, 0).unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: Position::new(5, 5),
                to: Position::new(6, 5)
            }
        );
        assert_eq!(board.entity(id).unwrap().position, Position::new(6, 5));
        assert!(board.entity_at(Position::new(5, 5)).is_none());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_move_does_not_assume_unit_delta() {
        let (mut board, id) = board_with_agent();
        board.move_entity(id, -3, 2).unwrap();
        assert_eq!(board.entity(id).unwrap().position, Position::new(2, 7));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_zero_move_stays_put() {
        let (mut board, id) = board_with_agent();
        let outcome = board.move_entity(id, 0, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: Position::new(5, 5),
                to: Position::new(5, 5)
            }
        );
        assert!(board.is_consistent());
    }

    #[test]
    fn test_move_out_of_bounds_is_blocked() {
        let mut board = GridBoard::new(3, 3);
        let id = EntityId(1);
        board
            .place(Entity::agent(id, "Alex", Position::new(0, 0)))
            .unwrap();

        let outcome = board.move_entity(id, 0, -1).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked(BlockReason::OutOfBounds));
        assert_eq!(board.entity(id).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_move_unknown_entity() {
        let (mut board, _) = board_with_agent();
        let result = board.move_entity(EntityId(42), 1, 0);
        assert!(matches!(result, Err(SimError::EntityNotFound(EntityId(42)))));
    }

    #[test]
    fn test_eating_heals_and_caps() {
        let (mut board, id) = board_with_agent();
        board
            .place(Entity::new(EntityId(2), EntityKind::Resource, Position::new(6, 5)))
            .unwrap();
        board
            .place(Entity::new(EntityId(3), EntityKind::Resource, Position::new(7, 5)))
            .unwrap();
        board.damage(id, 50).unwrap();

        let outcome = board.move_entity(id, 1, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Consumed {
                resource: EntityId(2),
                health: 70
            }
        );
        assert_eq!(board.entities().len(), 2);

        // Second meal caps at max health
        board.damage(id, -25).unwrap();
        let outcome = board.move_entity(id, 1, 0).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Consumed {
                resource: EntityId(3),
                health: 100
            }
        );
        assert_eq!(board.entity(id).unwrap().position, Position::new(7, 5));
        assert_eq!(board.count_of_kind(EntityKind::Resource), 0);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_block_rule_treats_resource_as_collision() {
        let (mut board, id) = board_with_agent();
        board
            .place(Entity::new(EntityId(2), EntityKind::Resource, Position::new(5, 4)))
            .unwrap();

        let outcome = board.move_entity_with(id, 0, -1, ConsumeRule::Block).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Blocked(BlockReason::Collision(EntityKind::Resource))
        );
        assert_eq!(board.entities().len(), 2);
    }

    #[test]
    fn test_collision_with_obstacle_and_pursuer() {
        let (mut board, id) = board_with_agent();
        board
            .place(Entity::new(EntityId(2), EntityKind::Obstacle, Position::new(5, 4)))
            .unwrap();
        board
            .place(Entity::new(EntityId(3), EntityKind::Pursuer, Position::new(4, 5)))
            .unwrap();

        assert_eq!(
            board.move_entity(id, 0, -1).unwrap(),
            MoveOutcome::Blocked(BlockReason::Collision(EntityKind::Obstacle))
        );
        assert_eq!(
            board.move_entity(id, -1, 0).unwrap(),
            MoveOutcome::Blocked(BlockReason::Collision(EntityKind::Pursuer))
        );
        assert_eq!(board.entity(id).unwrap().position, Position::new(5, 5));
        assert_eq!(board.entity(EntityId(3)).unwrap().position, Position::new(4, 5));
    }

    #[test]
    fn test_perceive_corner() {
        let mut board = GridBoard::new(10, 10);
        let id = EntityId(1);
        board
            .place(Entity::agent(id, "Alex", Position::new(0, 0)))
            .unwrap();

        let perception = board.perceive(id).unwrap();
        assert_eq!(
            perception.cells,
            [
                (Direction::North, CellKind::Wall),
                (Direction::South, CellKind::Empty),
                (Direction::East, CellKind::Empty),
                (Direction::West, CellKind::Wall),
            ]
        );
    }

    #[test]
    fn test_perceive_neighbours() {
        let (mut board, id) = board_with_agent();
        board
            .place(Entity::new(EntityId(2), EntityKind::Resource, Position::new(6, 5)))
            .unwrap();
        board
            .place(Entity::new(EntityId(3), EntityKind::Pursuer, Position::new(5, 4)))
            .unwrap();

        let perception = board.perceive(id).unwrap();
        assert_eq!(perception.toward(Direction::North), CellKind::Pursuer);
        assert_eq!(perception.toward(Direction::East), CellKind::Resource);
        assert_eq!(perception.toward(Direction::South), CellKind::Empty);
    }

    #[test]
    fn test_perceive_missing_entity() {
        let board = GridBoard::new(3, 3);
        assert!(matches!(
            board.perceive(EntityId(1)),
            Err(SimError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            MoveOutcome::Blocked(BlockReason::Collision(EntityKind::Obstacle)).to_string(),
            "blocked: collided with Obstacle"
        );
        assert_eq!(
            MoveOutcome::Blocked(BlockReason::OutOfBounds).to_string(),
            "blocked: out of bounds"
        );
    }
}
