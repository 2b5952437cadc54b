//! Prompt context for the agent's decision request
//!
//! Builds the system rules and the per-turn status line the model sees.

use crate::simulation::perception::Perception;

/// What the model is told about the agent each turn
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    /// The agent's display name
    pub name: String,
    /// Current raw health
    pub health: i32,
    /// "North: Wall, South: Empty, ..." vision line
    pub vision: String,
}

impl PromptContext {
    pub fn new(name: impl Into<String>, perception: &Perception, health: i32) -> Self {
        Self {
            name: name.into(),
            health,
            vision: perception.vision_text(),
        }
    }

    /// Rules and reply format, personalised with the agent's name
    pub fn system_prompt(&self) -> String {
        SYSTEM_PROMPT_TEMPLATE.replace("{name}", &self.name)
    }

    /// Status line for this turn
    pub fn user_prompt(&self) -> String {
        format!(
            "My Status: Health={}. My Vision: {}. What do I do?",
            self.health, self.vision
        )
    }
}

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an AI character named {name} in a 2D survival grid.
Your goal is to SURVIVE.

RULES:
- Stepping onto a Resource eats it and restores health.
- A Pursuer next to you will hurt you every turn.
- Walls and Obstacles block movement.

You must output your decision in strictly valid JSON format like this:
{
    "thought": "I see a resource to the East and I am hurt.",
    "action": "MOVE",
    "dx": 1,
    "dy": 0
}

Possible Moves:
- North: dx=0, dy=-1
- South: dx=0, dy=1
- East: dx=1, dy=0
- West: dx=-1, dy=0
"#;
