use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{parse_input, ObjectSchema, ToolDefinition};
use crate::errors::{AgentError, AgentResult};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListFilesInput {
    #[serde(default)]
    path: Option<String>,
}

/// Recursively lists a directory, returning a JSON array of relative paths.
/// Directories carry a trailing `/`.
pub struct ListFilesTool {
    input_schema: Value,
}

impl Default for ListFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ListFilesTool {
    pub fn new() -> Self {
        Self {
            input_schema: ObjectSchema::new()
                .optional(
                    "path",
                    "string",
                    "Optional relative path to list files from. Defaults to current directory if not provided.",
                )
                .build(),
        }
    }
}

#[async_trait]
impl ToolDefinition for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. If no path is provided, lists files in the \
        current directory."
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    async fn execute(&self, input: Value) -> AgentResult<String> {
        let input: ListFilesInput = if input.is_null() {
            ListFilesInput::default()
        } else {
            parse_input(input)?
        };
        let root = match input.path.as_deref() {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from("."),
        };

        let entries = tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| AgentError::Internal(e.to_string()))??;

        serde_json::to_string(&entries).map_err(|e| AgentError::Internal(e.to_string()))
    }
}

fn walk(root: &Path) -> AgentResult<Vec<String>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            AgentError::ExecutionError(format!(
                "failed to list files in {}: {}",
                root.display(),
                e
            ))
        })?;

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| AgentError::Internal(e.to_string()))?;
        let mut name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();
    Ok(entries)
}
