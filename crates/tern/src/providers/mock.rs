use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Provider, Usage};

/// One scripted reaction of the mock provider
pub enum MockReply {
    Message(Message),
    Failure(String),
}

/// A mock provider that returns pre-configured responses for testing
///
/// Every request it receives is recorded so tests can inspect what the agent sent.
#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    tools_seen: Arc<Mutex<Vec<Vec<Tool>>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self::scripted(responses.into_iter().map(MockReply::Message).collect())
    }

    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
            tools_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The message history of every call made so far
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn tools_seen(&self) -> Vec<Vec<Tool>> {
        self.tools_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.tools_seen.lock().unwrap().push(tools.to_vec());

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Return empty response if no more pre-configured responses
            return Ok((Message::assistant().with_text(""), Usage::default()));
        }
        match replies.remove(0) {
            MockReply::Message(message) => Ok((message, Usage::default())),
            MockReply::Failure(reason) => Err(anyhow!(reason)),
        }
    }
}
