use crate::errors::ConversationError;
use crate::models::content::ToolUse;
use crate::models::message::Message;
use crate::models::role::Role;

/// The ordered transcript replayed to the model on every call.
///
/// Messages can only be appended. Each append is checked so that every tool use
/// in an assistant turn is answered, once and in order, by the user turn that
/// follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Tool uses from the latest assistant turn that have not been answered yet
    pub fn pending_tool_uses(&self) -> Vec<&ToolUse> {
        match self.messages.last() {
            Some(message) if message.role == Role::Assistant => message.tool_uses().collect(),
            _ => Vec::new(),
        }
    }

    pub fn awaiting_tool_results(&self) -> bool {
        !self.pending_tool_uses().is_empty()
    }

    pub fn push(&mut self, message: Message) -> Result<(), ConversationError> {
        self.check_append(&message)?;
        self.messages.push(message);
        Ok(())
    }

    fn check_append(&self, message: &Message) -> Result<(), ConversationError> {
        let last = match self.messages.last() {
            Some(last) => last,
            None if message.role != Role::User => return Err(ConversationError::MustStartWithUser),
            None => return reject_stray_results(message),
        };

        if last.role == message.role {
            return Err(ConversationError::RoleNotAlternating(
                message.role.to_string(),
            ));
        }

        let pending = self.pending_tool_uses();
        if pending.is_empty() {
            return reject_stray_results(message);
        }

        let mut results = Vec::with_capacity(message.content.len());
        for content in &message.content {
            match content.as_tool_result() {
                Some(result) => results.push(result),
                None => {
                    return Err(ConversationError::UnansweredToolUse(
                        pending.iter().map(|t| t.id.clone()).collect(),
                    ))
                }
            }
        }

        for (index, tool_use) in pending.iter().enumerate() {
            match results.get(index) {
                Some(result) if result.tool_use_id == tool_use.id => {}
                Some(result) if pending.iter().any(|t| t.id == result.tool_use_id) => {
                    return Err(ConversationError::ToolResultOrder {
                        expected: tool_use.id.clone(),
                        found: result.tool_use_id.clone(),
                    })
                }
                Some(result) => {
                    return Err(ConversationError::UnexpectedToolResult(
                        result.tool_use_id.clone(),
                    ))
                }
                None => {
                    return Err(ConversationError::UnansweredToolUse(
                        pending[index..].iter().map(|t| t.id.clone()).collect(),
                    ))
                }
            }
        }

        if let Some(extra) = results.get(pending.len()) {
            return Err(ConversationError::UnexpectedToolResult(
                extra.tool_use_id.clone(),
            ));
        }

        Ok(())
    }
}

fn reject_stray_results(message: &Message) -> Result<(), ConversationError> {
    match message.tool_results().next() {
        Some(result) => Err(ConversationError::UnexpectedToolResult(
            result.tool_use_id.clone(),
        )),
        None => Ok(()),
    }
}
