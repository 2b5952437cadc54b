//! The board and its initial layouts

pub mod board;
pub mod scenario;

pub use board::{BlockReason, ConsumeRule, GridBoard, MoveOutcome};
pub use scenario::{AgentPlacement, BuiltScenario, EntityPlacement, Scenario};
