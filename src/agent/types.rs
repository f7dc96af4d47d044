use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;
use crate::tools::{Tool, ToolWire};
use super::traits::InferenceBackend;

/// Model used when an agent does not name one explicitly.
pub const DEFAULT_MODEL: &str = "claude-3-sonnet";

/// A locally configured agent: model settings, tools, and optional
/// conversation memory.
///
/// The agent owns its tool list and history exclusively; nothing is shared
/// between instances. `run` takes `&mut self`, so concurrent use of one
/// instance is ruled out at the type level. Hosts that need concurrent
/// agents construct separate instances.
pub struct Agent {
    /// A short, human-friendly name for the agent instance.
    pub name: String,

    /// LLM model requested in the payload.
    pub model: String,

    /// Optional system prompt describing the agent's role.
    pub system_prompt: Option<String>,

    /// Tools the agent may reference in requests, in registration order.
    pub tools: Vec<Tool>,

    /// When enabled, `run` records user and assistant turns in `history`
    /// and sends the full history as the payload's `messages`.
    pub memory_enabled: bool,

    /// Maximum tokens in a response.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f64,

    /// Conversation turns, populated only when memory is enabled. Grows
    /// only through `run` and is emptied only by `clear_memory`.
    pub(crate) history: Vec<Message>,

    /// Inference collaborator that receives the built payload. When absent,
    /// `run` produces a deterministic placeholder response.
    pub(crate) backend: Option<Arc<dyn InferenceBackend>>,
}

/// The request payload `Agent::run` builds. This is the literal wire
/// contract an inference backend must accept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolWire>>,
}

/// Structured information about a single tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Token accounting reported by the backend, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an agent run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl AgentResponse {
    /// The text content of the response.
    pub fn text(&self) -> &str {
        &self.content
    }
}
