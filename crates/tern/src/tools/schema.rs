use serde_json::{json, Map, Value};

/// Builds the JSON schema for an object-shaped tool input.
///
/// Additional properties are always disallowed.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: &str, kind: &str, description: &str) -> Self {
        self.property(name, kind, description, true)
    }

    pub fn optional(self, name: &str, kind: &str, description: &str) -> Self {
        self.property(name, kind, description, false)
    }

    fn property(mut self, name: &str, kind: &str, description: &str, required: bool) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({
                "type": kind,
                "description": description,
            }),
        );
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
            "additionalProperties": false,
        })
    }
}
