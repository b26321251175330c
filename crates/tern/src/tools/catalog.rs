use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::{ListFilesTool, ReadFileTool, ToolDefinition};
use crate::errors::CatalogError;
use crate::models::tool::Tool;

lazy_static! {
    static ref TOOL_NAME: Regex = Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").unwrap();
}

/// The fixed set of tools available to the agent, keyed by name.
///
/// Built once at startup and never modified afterwards.
#[derive(Default)]
pub struct ToolCatalog {
    tools: Vec<Box<dyn ToolDefinition>>,
    by_name: HashMap<String, usize>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<Box<dyn ToolDefinition>>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            let name = tool.name();
            if !TOOL_NAME.is_match(name) {
                return Err(CatalogError::InvalidName(name.to_string()));
            }
            if by_name.insert(name.to_string(), index).is_some() {
                return Err(CatalogError::DuplicateTool(name.to_string()));
            }
        }
        Ok(Self { tools, by_name })
    }

    /// A catalog with the built-in `read_file` and `list_files` tools
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(vec![
            Box::new(ReadFileTool::new()),
            Box::new(ListFilesTool::new()),
        ])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&dyn ToolDefinition> {
        self.by_name
            .get(name)
            .map(|&index| self.tools[index].as_ref())
    }

    /// Declarations for every registered tool, in registration order
    pub fn all_definitions(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.declaration()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.names())
            .finish()
    }
}
