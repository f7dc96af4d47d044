use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::message::Message;
use crate::tools::Tool;

pub mod error;
pub mod traits;
pub mod types;

use error::AgentError;
pub use traits::InferenceBackend;
pub use types::{Agent, AgentRequest, AgentResponse, ToolCall, Usage, DEFAULT_MODEL};

impl Agent {
    /// Create a new Agent with the provided name and default settings.
    /// Tools start empty, memory disabled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            tools: Vec::new(),
            memory_enabled: false,
            max_tokens: 4096,
            temperature: 0.7,
            history: Vec::new(),
            backend: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_memory(mut self, enabled: bool) -> Self {
        self.memory_enabled = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Register a tool. Order is preserved; `#[gagiteck::tool]` constructors
    /// and hand-built [`Tool`] values converge on the same payload element.
    pub fn with_tool(mut self, tool: impl Into<Tool>) -> Self {
        self.tools.push(tool.into());
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Wire in a real inference collaborator. Without one, `run` produces a
    /// deterministic placeholder response.
    pub fn with_backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Conversation turns recorded so far. Always empty when memory is
    /// disabled.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Look up a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Invoke a registered tool by name. Tool failures propagate unchanged
    /// in kind.
    pub fn invoke_tool(&self, name: &str, args: Value) -> Result<Value, AgentError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        Ok(tool.invoke(args)?)
    }

    /// Build the request payload for one message.
    ///
    /// With memory enabled the payload carries the full history (which
    /// `run` has already extended with the current user turn); otherwise it
    /// carries just this message. `system` and `tools` appear only when a
    /// system prompt is configured and at least one tool is registered.
    pub fn build_request(&self, message: &str) -> AgentRequest {
        let messages = if self.memory_enabled {
            self.history.clone()
        } else {
            vec![Message::user(message)]
        };
        let tools = if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.iter().map(Tool::serialize).collect())
        };
        AgentRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: self.system_prompt.clone(),
            tools,
        }
    }

    /// Run the agent with a message.
    ///
    /// Builds the request payload, dispatches it to the wired backend (or
    /// produces the placeholder response when none is wired), and performs
    /// the memory bookkeeping around the call.
    pub async fn run(&mut self, message: impl Into<String>) -> Result<AgentResponse, AgentError> {
        let message = message.into();
        if self.memory_enabled {
            self.history.push(Message::user(message.clone()));
        }

        let request = self.build_request(&message);
        debug!(agent = %self.name, model = %self.model, tools = self.tools.len(), "dispatching agent request");

        let response = match &self.backend {
            Some(backend) => backend.complete(&request).await?,
            None => AgentResponse {
                content: format!("[Agent '{}' would process: {}]", self.name, message),
                model: self.model.clone(),
                tool_calls: Vec::new(),
                usage: None,
            },
        };

        if self.memory_enabled {
            self.history.push(Message::assistant(response.content.clone()));
        }

        Ok(response)
    }

    /// Clear conversation history. Configuration is untouched.
    pub fn clear_memory(&mut self) {
        self.history.clear();
    }
}
