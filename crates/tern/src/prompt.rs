use anyhow::Result;

use crate::models::message::Message;

/// Where user turns come from and where the transcript goes.
pub trait Prompt {
    /// Block until the user produces one line of input
    fn get_input(&mut self) -> Result<Input>;
    /// Show a message that was just appended to the conversation
    fn render(&mut self, message: &Message);
    fn show_busy(&mut self) {}
    fn hide_busy(&mut self) {}
    fn close(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// User sent a message
    Message(String),
    /// Ask the user for input again, nothing is sent to the model
    AskAgain,
    /// End of input, or the user asked to leave
    Exit,
}

impl Input {
    /// Classify a raw line read from the user
    pub fn from_line(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            Input::AskAgain
        } else if text.eq_ignore_ascii_case("/exit") || text.eq_ignore_ascii_case("/quit") {
            Input::Exit
        } else {
            Input::Message(text.to_string())
        }
    }
}
