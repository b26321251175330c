use anyhow::Result;
use futures::TryStreamExt;

use crate::agent::Agent;
use crate::conversation::Conversation;
use crate::errors::ConversationError;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::prompt::{Input, Prompt};

/// Where the interactive loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingUserInput,
    CallingModel,
    ExecutingTools,
    Done,
}

/// One interactive run: user turns from the prompt, model turns from the agent.
///
/// The conversation lives as long as the session and is never persisted.
pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
    conversation: Conversation,
    state: LoopState,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            agent,
            prompt,
            conversation: Conversation::new(),
            state: LoopState::AwaitingUserInput,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run until the input ends (`Ok`) or a transport or protocol failure (`Err`)
    pub async fn run(&mut self) -> Result<()> {
        let result = self.converse().await;
        self.state = LoopState::Done;
        tracing::debug!(messages = self.conversation.len(), "session finished");
        self.prompt.close();
        result
    }

    async fn converse(&mut self) -> Result<()> {
        loop {
            self.state = LoopState::AwaitingUserInput;
            let pending = self.conversation.pending_tool_uses();
            if !pending.is_empty() {
                return Err(ConversationError::UnansweredToolUse(
                    pending.iter().map(|t| t.id.clone()).collect(),
                )
                .into());
            }

            let text = match self.prompt.get_input()? {
                Input::Message(text) => text,
                Input::AskAgain => continue,
                Input::Exit => return Ok(()),
            };
            self.conversation.push(Message::user().with_text(text))?;

            self.state = LoopState::CallingModel;
            self.prompt.show_busy();
            let outcome = self.process_reply().await;
            self.prompt.hide_busy();
            outcome?;
        }
    }

    async fn process_reply(&mut self) -> Result<()> {
        let mut stream = self.agent.reply(&mut self.conversation);
        while let Some(message) = stream.try_next().await? {
            self.prompt.hide_busy();
            self.state = next_state(&message);
            tracing::debug!(state = ?self.state, role = %message.role, "message appended");
            self.prompt.render(&message);
            if self.state != LoopState::AwaitingUserInput {
                self.prompt.show_busy();
            }
        }
        Ok(())
    }
}

/// The state entered once `message` has been appended
fn next_state(message: &Message) -> LoopState {
    match message.role {
        Role::Assistant if message.has_tool_use() => LoopState::ExecutingTools,
        Role::Assistant => LoopState::AwaitingUserInput,
        Role::User => LoopState::CallingModel,
    }
}
