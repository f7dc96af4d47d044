use crate::client::error::ClientError;
use crate::tools::error::ToolError;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution error: {0}")]
    Tool(#[from] ToolError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}
