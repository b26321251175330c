use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_input, ObjectSchema, ToolDefinition};
use crate::errors::{AgentError, AgentResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadFileInput {
    path: String,
}

/// Returns the contents of a file
pub struct ReadFileTool {
    input_schema: Value,
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            input_schema: ObjectSchema::new()
                .required(
                    "path",
                    "string",
                    "The relative path of a file in the working directory.",
                )
                .build(),
        }
    }
}

#[async_trait]
impl ToolDefinition for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see what's \
        inside a file. Do not use this with directory names."
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    async fn execute(&self, input: Value) -> AgentResult<String> {
        let input: ReadFileInput = parse_input(input)?;
        tokio::fs::read_to_string(&input.path)
            .await
            .map_err(|e| AgentError::ExecutionError(format!("failed to read {}: {}", input.path, e)))
    }
}
