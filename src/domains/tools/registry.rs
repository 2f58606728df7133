//! Tool Registry - static catalog of every tool the server exposes.
//!
//! This module provides:
//! - The [`ToolDefinition`] metadata record shared by both transports
//! - Listing and lookup by name, in registration order
//! - Handler lookup for the executor

use std::collections::HashSet;
use std::sync::Arc;

use rmcp::model::Tool;
use serde::Serialize;

use super::definitions::{EchoEnvVarsTool, GetSystemInfoTool};
use super::error::ToolError;
use super::handlers::{JsonObject, ToolHandler};

// ============================================================================
// Tool Definition
// ============================================================================

/// Name, description and input contract of one tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Arc<JsonObject>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Arc<JsonObject>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Create a Tool model for the MCP channel.
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Tool registry - immutable once built.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Build a registry from handlers, rejecting duplicate names.
    pub fn new(handlers: Vec<Arc<dyn ToolHandler>>) -> Result<Self, ToolError> {
        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(handlers.len());

        for handler in handlers {
            let definition = handler.definition();
            if !seen.insert(definition.name.clone()) {
                return Err(ToolError::internal(format!(
                    "Duplicate tool registration: {}",
                    definition.name
                )));
            }
            tools.push(RegisteredTool {
                definition,
                handler,
            });
        }

        Ok(Self { tools })
    }

    /// The registry of built-in tools.
    ///
    /// This is the single source of truth for all available tools.
    pub fn builtin() -> Result<Self, ToolError> {
        let handlers: Vec<Arc<dyn ToolHandler>> =
            vec![Arc::new(GetSystemInfoTool), Arc::new(EchoEnvVarsTool)];
        Self::new(handlers)
    }

    /// All tool definitions, in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Look up one tool definition by name.
    pub fn describe(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools
            .iter()
            .find(|t| t.definition.name == name)
            .map(|t| &t.definition)
    }

    /// The handler registered under `name`.
    pub fn handler(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools
            .iter()
            .find(|t| t.definition.name == name)
            .map(|t| t.handler.clone())
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::builtin().unwrap()
    }

    #[test]
    fn test_registry_tool_names() {
        assert_eq!(registry().tool_names(), vec!["get_system_info", "echo_env_vars"]);
    }

    #[test]
    fn test_describe_matches_list() {
        let registry = registry();
        for def in registry.list() {
            let described = registry.describe(&def.name).unwrap();
            assert_eq!(described.name, def.name);

            let occurrences = registry
                .list()
                .iter()
                .filter(|d| d.name == def.name)
                .count();
            assert_eq!(occurrences, 1);
        }
    }

    #[test]
    fn test_describe_unknown() {
        assert!(registry().describe("unknown_tool").is_none());
        assert!(registry().handler("unknown_tool").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let handlers: Vec<Arc<dyn ToolHandler>> =
            vec![Arc::new(EchoEnvVarsTool), Arc::new(EchoEnvVarsTool)];
        let err = ToolRegistry::new(handlers).err().unwrap();
        assert!(err.to_string().contains("Duplicate tool registration"));
    }

    #[test]
    fn test_to_tool() {
        let registry = registry();
        let tool = registry.describe("echo_env_vars").unwrap().to_tool();
        assert_eq!(tool.name, "echo_env_vars");
        assert_eq!(
            tool.description.as_deref(),
            Some("Echo environment variables for debugging")
        );
    }
}
