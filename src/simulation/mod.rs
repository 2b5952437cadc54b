pub mod decision;
pub mod perception;
pub mod pursuit;
pub mod turn;

pub use decision::{DecisionSource, Intent, RandomWalker, ScriptedDecisions};
pub use perception::{CellKind, Perception};
pub use pursuit::{greedy_step, PursuerAction, PursuerEvent, PursuerPolicy, PursuitReport};
pub use turn::{DecisionOutcome, TurnKind, TurnProtocol, TurnReport, TurnState};
