use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// A request from the model to run a named tool with the given input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Correlates this request with its result; unique within one assistant turn
    pub id: String,
    pub name: String,
    /// Raw input, opaque to the agent loop
    pub input: Value,
}

impl ToolUse {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// The local outcome of one ToolUse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success<I: Into<String>, C: Into<String>>(tool_use_id: I, content: C) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error<I: Into<String>, C: Into<String>>(tool_use_id: I, content: C) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}
