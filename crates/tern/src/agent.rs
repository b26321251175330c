use anyhow::Result;
use futures::stream::BoxStream;

use crate::conversation::Conversation;
use crate::errors::AgentError;
use crate::models::content::{ToolResult, ToolUse};
use crate::models::message::Message;
use crate::providers::base::Provider;
use crate::tools::ToolCatalog;

/// Agent pairs a model provider with the tools it may call
pub struct Agent {
    provider: Box<dyn Provider>,
    catalog: ToolCatalog,
    system_prompt: String,
}

impl Agent {
    /// Create a new Agent with the specified provider and tools
    pub fn new(provider: Box<dyn Provider>, catalog: ToolCatalog) -> Self {
        Self {
            provider,
            catalog,
            system_prompt: String::new(),
        }
    }

    pub fn with_system_prompt<S: Into<String>>(mut self, system_prompt: S) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Run a single tool use, turning every failure into an error result
    pub async fn dispatch_tool_use(&self, tool_use: &ToolUse) -> ToolResult {
        let outcome = match self.catalog.find_by_name(&tool_use.name) {
            Some(tool) => {
                tracing::debug!(id = %tool_use.id, tool = %tool_use.name, "executing tool");
                tool.execute(tool_use.input.clone()).await
            }
            None => Err(AgentError::ToolNotFound(tool_use.name.clone())),
        };

        match outcome {
            Ok(output) => ToolResult::success(&tool_use.id, output),
            Err(e) => {
                tracing::warn!(id = %tool_use.id, tool = %tool_use.name, "tool failed: {}", e);
                ToolResult::error(&tool_use.id, e.to_string())
            }
        }
    }

    /// Answer every tool use of an assistant turn with a single user message.
    /// Results appear in the same order as the tool uses.
    pub async fn execute_tools(&self, tool_uses: &[ToolUse]) -> Message {
        let futures: Vec<_> = tool_uses
            .iter()
            .map(|tool_use| self.dispatch_tool_use(tool_use))
            .collect();
        let results = futures::future::join_all(futures).await;

        results
            .into_iter()
            .fold(Message::user(), |message, result| {
                message.with_tool_result(result)
            })
    }

    /// Continue the conversation until the model stops asking for tools.
    ///
    /// Each message appended to `conversation` (assistant turns and tool result
    /// turns) is also yielded, in order. The stream ends after an assistant turn
    /// without tool uses. A provider failure is yielded as an error and ends the
    /// stream without running any tools.
    pub fn reply<'a>(
        &'a self,
        conversation: &'a mut Conversation,
    ) -> BoxStream<'a, Result<Message>> {
        let tools = self.catalog.all_definitions();

        Box::pin(async_stream::try_stream! {
            loop {
                tracing::debug!(messages = conversation.len(), "calling model");
                let (response, usage) = self
                    .provider
                    .complete(&self.system_prompt, conversation.messages(), &tools)
                    .await?;
                tracing::debug!(?usage, tool_uses = response.tool_uses().count(), "model replied");

                conversation.push(response.clone())?;
                let tool_uses: Vec<ToolUse> = response.tool_uses().cloned().collect();
                yield response;

                if tool_uses.is_empty() {
                    break;
                }

                let message_tool_results = self.execute_tools(&tool_uses).await;
                conversation.push(message_tool_results.clone())?;
                yield message_tool_results;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentResult;
    use crate::models::message::MessageContent;
    use crate::providers::mock::{MockProvider, MockReply};
    use crate::tools::ToolDefinition;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use serde_json::{json, Value};

    struct EchoTool {
        schema: Value,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                schema: json!({"type": "object", "properties": {"message": {"type": "string"}}, "required": ["message"]}),
            }
        }
    }

    #[async_trait]
    impl ToolDefinition for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes back the input"
        }

        fn input_schema(&self) -> &Value {
            &self.schema
        }

        async fn execute(&self, input: Value) -> AgentResult<String> {
            match input.get("message").and_then(|v| v.as_str()) {
                Some(message) => Ok(message.to_string()),
                None => Err(AgentError::InvalidParameters("message is required".into())),
            }
        }
    }

    fn agent(provider: MockProvider) -> Agent {
        let catalog = ToolCatalog::new(vec![Box::new(EchoTool::new())]).unwrap();
        Agent::new(Box::new(provider), catalog)
    }

    fn started(text: &str) -> Conversation {
        let mut conversation = Conversation::new();
        conversation.push(Message::user().with_text(text)).unwrap();
        conversation
    }

    async fn collect(agent: &Agent, conversation: &mut Conversation) -> Result<Vec<Message>> {
        let mut stream = agent.reply(conversation);
        let mut messages = Vec::new();
        while let Some(msg) = stream.try_next().await? {
            messages.push(msg);
        }
        Ok(messages)
    }

    #[tokio::test]
    async fn test_simple_response() -> Result<()> {
        let response = Message::assistant().with_text("Hello!");
        let agent = agent(MockProvider::new(vec![response.clone()]));
        let mut conversation = started("Hi");

        let messages = collect(&agent, &mut conversation).await?;

        assert_eq!(messages, vec![response]);
        assert_eq!(conversation.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_call() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_use("1", "echo", json!({"message": "test"})),
            Message::assistant().with_text("Done!"),
        ]);
        let agent = agent(provider.clone());
        let mut conversation = started("Echo test");

        let messages = collect(&agent, &mut conversation).await?;

        // Should have three messages: tool request, response, and model text
        assert_eq!(messages.len(), 3);
        assert!(messages[0].has_tool_use());
        assert_eq!(
            messages[1].content,
            vec![MessageContent::tool_result(ToolResult::success("1", "test"))]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("Done!"));

        // The second call saw the tool results without any new user text
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].len(), 3);
        assert_eq!(requests[1][2], messages[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_every_call_declares_all_tools() -> Result<()> {
        let provider = MockProvider::new(vec![
            Message::assistant().with_tool_use("1", "echo", json!({"message": "a"})),
            Message::assistant().with_text("ok"),
        ]);
        let agent = agent(provider.clone());
        let mut conversation = started("go");

        collect(&agent, &mut conversation).await?;

        let tools_seen = provider.tools_seen();
        assert_eq!(tools_seen.len(), 2);
        for tools in tools_seen {
            assert_eq!(tools, agent.catalog().all_definitions());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_tool() -> Result<()> {
        let agent = agent(MockProvider::new(vec![
            Message::assistant().with_tool_use("1", "invalid_tool", json!({})),
            Message::assistant().with_text("Error occurred"),
        ]));
        let mut conversation = started("Invalid tool");

        let messages = collect(&agent, &mut conversation).await?;

        // Should have three messages: failed tool request, fail response, and model text
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[1].content,
            vec![MessageContent::tool_result(ToolResult::error(
                "1",
                "tool not found: invalid_tool"
            ))]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("Error occurred"));
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_error_result() -> Result<()> {
        let agent = agent(MockProvider::new(vec![
            Message::assistant().with_tool_use("1", "echo", json!({})),
            Message::assistant().with_text("I see"),
        ]));
        let mut conversation = started("echo nothing");

        let messages = collect(&agent, &mut conversation).await?;

        let result = messages[1].tool_results().next().unwrap();
        assert!(result.is_error);
        assert_eq!(result.content, "Invalid parameters: message is required");
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_tool_calls_keep_order() -> Result<()> {
        let agent = agent(MockProvider::new(vec![
            Message::assistant()
                .with_tool_use("1", "echo", json!({"message": "first"}))
                .with_tool_use("2", "missing", json!({}))
                .with_tool_use("3", "echo", json!({"message": "third"})),
            Message::assistant().with_text("All done!"),
        ]));
        let mut conversation = started("Multiple calls");

        let messages = collect(&agent, &mut conversation).await?;

        let results: Vec<&ToolResult> = messages[1].tool_results().collect();
        assert_eq!(
            results,
            vec![
                &ToolResult::success("1", "first"),
                &ToolResult::error("2", "tool not found: missing"),
                &ToolResult::success("3", "third"),
            ]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("All done!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_consecutive_tool_rounds() -> Result<()> {
        let agent = agent(MockProvider::new(vec![
            Message::assistant().with_tool_use("1", "echo", json!({"message": "one"})),
            Message::assistant().with_tool_use("2", "echo", json!({"message": "two"})),
            Message::assistant().with_text("finished"),
        ]));
        let mut conversation = started("twice");

        let messages = collect(&agent, &mut conversation).await?;

        assert_eq!(messages.len(), 5);
        assert_eq!(conversation.len(), 6);
        assert!(!conversation.awaiting_tool_results());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_assistant_turn_ends_reply() -> Result<()> {
        let agent = agent(MockProvider::new(vec![Message::assistant()]));
        let mut conversation = started("say nothing");

        let messages = collect(&agent, &mut conversation).await?;

        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal() {
        let provider = MockProvider::scripted(vec![MockReply::Failure("connection reset".into())]);
        let agent = agent(provider.clone());
        let mut conversation = started("hello");

        let err = collect(&agent, &mut conversation).await.unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(conversation.len(), 1);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_after_tool_round_keeps_results() {
        let provider = MockProvider::scripted(vec![
            MockReply::Message(
                Message::assistant().with_tool_use("1", "echo", json!({"message": "x"})),
            ),
            MockReply::Failure("overloaded".into()),
        ]);
        let agent = agent(provider);
        let mut conversation = started("hello");

        assert!(collect(&agent, &mut conversation).await.is_err());
        assert_eq!(conversation.len(), 3);
        assert!(!conversation.awaiting_tool_results());
    }
}
