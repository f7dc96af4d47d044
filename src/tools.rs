pub mod error;
pub mod schema;
pub mod tool;


pub use error::ToolError;
pub use schema::{ArgSchema, ParamKind, ToolSchema};
pub use tool::{FunctionWire, Tool, ToolFn, ToolWire};
