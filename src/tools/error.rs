#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool '{name}' has no function defined")]
    Unbound { name: String },

    #[error("Tool execution error in '{name}': {reason}")]
    Execution { name: String, reason: String },

    #[error("Tool parameters do not match: {0}")]
    ParamsNotMatched(String),
}

impl ToolError {
    pub fn execution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Execution {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
