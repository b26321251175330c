use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures local to a single tool call.
///
/// These never end the agent loop: they are turned into an error tool result
/// and handed back to the model, which can decide how to proceed.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Problems with the tool set handed to the catalog at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool name '{0}', it must match [a-zA-Z0-9_-]{{1,64}}")]
    InvalidName(String),
}

/// Appending a message would break the request/result pairing the model API expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversationError {
    #[error("Conversation must start with a user message")]
    MustStartWithUser,

    #[error("Two consecutive {0} messages")]
    RoleNotAlternating(String),

    #[error("Tool uses are still unanswered: {0:?}")]
    UnansweredToolUse(Vec<String>),

    #[error("Tool result {0} has no matching tool use")]
    UnexpectedToolResult(String),

    #[error("Tool results out of order: expected {expected}, found {found}")]
    ToolResultOrder { expected: String, found: String },
}
