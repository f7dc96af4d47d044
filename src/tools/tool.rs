use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::error::ToolError;
use super::schema::ToolSchema;

/// Callable bound to a tool. Takes the argument object from the wire and
/// returns the tool result as a JSON value.
pub type ToolFn = Arc<dyn Fn(Value) -> Result<Value, ToolError> + Send + Sync>;

/// A named, schema-described, optionally invokable capability an agent may
/// reference in a request.
///
/// A tool without a bound function is a pure remote descriptor: it can be
/// constructed and serialized freely and only fails when invoked.
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub parameters: ToolSchema,
    pub function: Option<ToolFn>,
}

impl Tool {
    /// An unbound tool descriptor. Use [`Tool::with_function`] to bind a
    /// callable, or the `#[gagiteck::tool]` attribute to derive both the
    /// schema and the binding from a typed function.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into().trim().to_string(),
            parameters,
            function: None,
        }
    }

    pub fn with_function<F>(mut self, function: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.function = Some(Arc::new(function));
        self
    }

    pub fn is_bound(&self) -> bool {
        self.function.is_some()
    }

    /// Execute the bound callable with the given argument object.
    pub fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        match &self.function {
            Some(function) => function(args),
            None => Err(ToolError::Unbound {
                name: self.name.clone(),
            }),
        }
    }

    /// The request-payload element for this tool:
    /// `{"type": "function", "function": {name, description, parameters}}`.
    pub fn serialize(&self) -> ToolWire {
        ToolWire {
            wire_type: "function".to_string(),
            function: FunctionWire {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters.clone(),
            },
        }
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("function", &self.function.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// One element of the request payload's `tools` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolWire {
    #[serde(rename = "type")]
    pub wire_type: String,
    pub function: FunctionWire,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionWire {
    pub name: String,
    pub description: String,
    pub parameters: ToolSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::{ArgSchema, ParamKind};
    use serde_json::json;

    fn calculator() -> Tool {
        let schema = ToolSchema::new()
            .arg(ArgSchema::new("expression", ParamKind::String).with_description("Math expression"));
        Tool::new("calculator", "Perform math calculations", schema)
    }

    #[test]
    fn unbound_tool_fails_on_invoke_only() {
        let tool = calculator();
        // construction and serialization are fine without a function
        let wire = serde_json::to_value(tool.serialize()).unwrap();
        assert_eq!(wire["function"]["name"], "calculator");

        let err = tool.invoke(json!({"expression": "1+1"})).unwrap_err();
        assert!(matches!(err, ToolError::Unbound { name } if name == "calculator"));
    }

    #[test]
    fn bound_tool_invokes_function() {
        let tool = calculator().with_function(|args| {
            let expr = args["expression"].as_str().unwrap_or_default().to_string();
            Ok(json!(format!("evaluated {expr}")))
        });
        let result = tool.invoke(json!({"expression": "1+1"})).unwrap();
        assert_eq!(result, json!("evaluated 1+1"));
    }

    #[test]
    fn execution_errors_carry_tool_name_and_reason() {
        let tool = calculator()
            .with_function(|_| Err(ToolError::execution("calculator", "division by zero")));
        let err = tool.invoke(json!({"expression": "1/0"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tool execution error in 'calculator': division by zero"
        );
    }

    #[test]
    fn serialize_produces_function_wire_shape() {
        let wire = serde_json::to_value(calculator().serialize()).unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "function",
                "function": {
                    "name": "calculator",
                    "description": "Perform math calculations",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "expression": {"type": "string", "description": "Math expression"}
                        },
                        "required": ["expression"]
                    }
                }
            })
        );
    }

    #[test]
    fn description_whitespace_is_trimmed() {
        let tool = Tool::new("echo", "  Echo input back.  ", ToolSchema::new());
        assert_eq!(tool.description, "Echo input back.");
    }
}
