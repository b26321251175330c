use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;

pub mod catalog;
pub mod list_files;
pub mod read_file;
pub mod schema;

pub use catalog::ToolCatalog;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use schema::ObjectSchema;

/// Core trait that every tool the agent can run must implement
#[async_trait]
pub trait ToolDefinition: Send + Sync {
    /// Stable name the model uses to call the tool, unique within a catalog
    fn name(&self) -> &str;

    /// Shown to the model so it knows when to use the tool
    fn description(&self) -> &str;

    /// JSON schema of the accepted input
    fn input_schema(&self) -> &Value;

    /// Run the tool against the raw input the model produced
    async fn execute(&self, input: Value) -> AgentResult<String>;

    /// The declaration sent to the model alongside every request
    fn declaration(&self) -> Tool {
        Tool::new(self.name(), self.description(), self.input_schema().clone())
    }
}

/// Deserialize a tool's raw input into its typed parameters.
///
/// The advertised schema is the model's contract; beyond what deserialization
/// enforces nothing is re-validated here.
pub fn parse_input<T: DeserializeOwned>(input: Value) -> AgentResult<T> {
    serde_json::from_value(input).map_err(|e| AgentError::InvalidParameters(e.to_string()))
}
