use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// JSON schema type of a single tool parameter. Anything that does not
/// map cleanly onto one of these degrades to `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// Schema for one tool argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSchema {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

impl ArgSchema {
    /// A required argument with the synthesized `Parameter: <name>` description.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        let name = name.into();
        Self {
            description: format!("Parameter: {name}"),
            name,
            kind,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Parameter schema of a tool, kept as a flat list so property order
/// always follows declaration order.
///
/// Serializes to the wire shape
/// `{"type": "object", "properties": {...}, "required": [...]}` with the
/// `required` key omitted entirely when no argument is required.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolSchema {
    pub args: Vec<ArgSchema>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: ArgSchema) -> Self {
        self.args.push(arg);
        self
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name.as_str())
            .collect()
    }
}

struct Property<'a>(&'a ArgSchema);

impl Serialize for Property<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.0.kind)?;
        map.serialize_entry("description", &self.0.description)?;
        map.end()
    }
}

struct Properties<'a>(&'a [ArgSchema]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for arg in self.0 {
            map.serialize_entry(&arg.name, &Property(arg))?;
        }
        map.end()
    }
}

impl Serialize for ToolSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let required = self.required_names();
        let entries = if required.is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(entries))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &Properties(&self.args))?;
        if !required.is_empty() {
            map.serialize_entry("required", &required)?;
        }
        map.end()
    }
}
