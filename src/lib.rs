//! Survival Grid - turn-based grid survival simulation
//!
//! A bounded board holds one controlled agent, obstacles, resources and
//! pursuers. Each turn the agent's surroundings are handed to a decision
//! source (a language model, a script, a random walker), the chosen move is
//! resolved, the pursuers close in, and the protocol checks whether the
//! agent survived.

pub mod core;
pub mod entity;
pub mod llm;
pub mod simulation;
pub mod spatial;
pub mod world;
