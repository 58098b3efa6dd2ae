use super::descriptor::ToolDescriptor;
use std::collections::HashMap;

/// Name-keyed tool collection. Iteration follows first-registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool; a later tool with the same name replaces the earlier one,
    /// which is returned.
    pub fn insert(&mut self, descriptor: ToolDescriptor) -> Option<ToolDescriptor> {
        let name = descriptor.name().to_string();
        let previous = self.tools.insert(name.clone(), descriptor);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tooling::{
        ServerToolInfo, ToolCallOutput, ToolInvokeError, ToolServerInterface,
    };
    use crate::types::ServerAddress;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct NamedServer(ServerAddress);

    #[async_trait]
    impl ToolServerInterface for NamedServer {
        fn address(&self) -> &ServerAddress {
            &self.0
        }

        async fn list_tools(&self) -> Result<Vec<ServerToolInfo>, ToolInvokeError> {
            Ok(Vec::new())
        }

        async fn invoke_tool(
            &self,
            _tool: &str,
            _arguments: Value,
        ) -> Result<ToolCallOutput, ToolInvokeError> {
            Ok(ToolCallOutput::success(self.0.as_str()))
        }
    }

    fn descriptor(name: &str, server: &str) -> ToolDescriptor {
        ToolDescriptor::new(
            ServerToolInfo {
                name: name.to_string(),
                description: None,
                input_schema: None,
            },
            Arc::new(NamedServer(ServerAddress::new(server))),
        )
    }

    #[tokio::test]
    async fn later_registration_wins_but_keeps_position() {
        let mut registry = ToolRegistry::new();
        assert!(registry.insert(descriptor("search", "http://a/mcp")).is_none());
        assert!(registry.insert(descriptor("poem", "http://a/mcp")).is_none());

        let replaced = registry
            .insert(descriptor("search", "http://b/mcp"))
            .expect("duplicate replaces");
        assert_eq!(replaced.server_address().as_str(), "http://a/mcp");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["search", "poem"]);

        let winner = registry.get("search").expect("registered");
        let output = winner.invoke(Value::Null).await.expect("invoke");
        assert_eq!(output.text, "http://b/mcp");
    }

    #[test]
    fn missing_schema_defaults_to_empty_object() {
        let tool = descriptor("poem", "http://a/mcp");
        assert_eq!(tool.input_schema()["type"], "object");
    }
}
