//! LLM-backed decision source
//!
//! Bridges the synchronous turn protocol and the async HTTP client: each
//! decision is driven to completion on an owned runtime, bounded by a
//! timeout so a stalled API cannot hang the turn.

use std::time::Duration;

use tokio::runtime::Runtime;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::llm::client::LlmClient;
use crate::llm::context::PromptContext;
use crate::llm::parser::request_intent;
use crate::simulation::decision::{DecisionSource, Intent};
use crate::simulation::perception::Perception;

pub struct LlmBrain {
    client: LlmClient,
    runtime: Runtime,
    agent_name: String,
    timeout: Duration,
}

impl LlmBrain {
    pub fn new(
        client: LlmClient,
        agent_name: impl Into<String>,
        config: &SimulationConfig,
    ) -> Result<Self> {
        Ok(Self {
            client: client.with_temperature(config.llm_temperature),
            runtime: Runtime::new()?,
            agent_name: agent_name.into(),
            timeout: Duration::from_secs(config.decision_timeout_secs),
        })
    }

    /// Build from `LLM_*` environment variables
    pub fn from_env(agent_name: impl Into<String>, config: &SimulationConfig) -> Result<Self> {
        Self::new(LlmClient::from_env()?, agent_name, config)
    }
}

impl DecisionSource for LlmBrain {
    fn decide(&mut self, perception: &Perception, health: i32) -> Result<Intent> {
        let context = PromptContext::new(self.agent_name.clone(), perception, health);
        tracing::info!(agent = %self.agent_name, model = self.client.model(), "thinking");

        let request = request_intent(&self.client, &context);
        match self.runtime.block_on(tokio::time::timeout(self.timeout, request)) {
            Ok(result) => result,
            Err(_) => Err(SimError::DecisionUnavailable(format!(
                "no reply within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
