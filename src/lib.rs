pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod tools;

// re-export the proc-macro attribute for convenient use: `use gagiteck::tool;` or `#[gagiteck::tool(...)]`
#[allow(unused_imports)]
pub use gagiteck_macros::tool;

// re-exported for macro expansions, which refer to them through the host crate
pub use serde;
pub use serde_json;

pub use agent::{Agent, AgentRequest, AgentResponse};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use tools::{ArgSchema, ParamKind, Tool, ToolSchema};
