//! Parse model replies into move intents
//!
//! Models rarely return bare JSON: reasoning models wrap the object in
//! prose or think-blocks. The first `{` through the last `}` is taken as the
//! decision object.

use crate::core::error::{Result, SimError};
use crate::llm::client::LlmClient;
use crate::llm::context::PromptContext;
use crate::simulation::decision::Intent;

/// Ask the model for a move and parse its reply
pub async fn request_intent(client: &LlmClient, context: &PromptContext) -> Result<Intent> {
    let response = client
        .complete(&context.system_prompt(), &context.user_prompt())
        .await?;
    parse_intent(&response)
}

/// Parse an intent out of a raw model reply
pub fn parse_intent(response: &str) -> Result<Intent> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        SimError::DecisionUnavailable(format!(
            "Failed to parse intent: {} - Response: {}",
            e, response
        ))
    })
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| SimError::DecisionUnavailable("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| SimError::DecisionUnavailable("No closing brace found in response".into()))?;
    if end < start {
        return Err(SimError::DecisionUnavailable(
            "Closing brace precedes opening brace".into(),
        ));
    }
    Ok(&response[start..=end])
}
