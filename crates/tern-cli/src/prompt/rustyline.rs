use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

use tern::models::content::{ToolResult, ToolUse};
use tern::models::message::{Message, MessageContent};
use tern::prompt::{Input, Prompt};

const PROMPT: &str = "\x1b[94mYou\x1b[0m: ";
const THEME: &str = "zenburn";
const MAX_RESULT_LENGTH: usize = 200;

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: Option<cliclack::ProgressBar>,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: None,
        })
    }

    pub fn greet(&self) {
        println!(
            "Chat with Claude {}",
            style("- type /exit or press ctrl-d to end the session").dim()
        );
        println!();
    }

    fn render_tool_use(&self, tool_use: &ToolUse) {
        println!(
            "{}: {}({})",
            style("tool").green().bold(),
            tool_use.name,
            compact(&tool_use.input)
        );
    }

    fn render_tool_result(&self, result: &ToolResult) {
        if result.is_error {
            println!(
                "{} {}",
                style("  error:").red().dim(),
                style(truncate(&result.content)).dim()
            );
        }
    }
}

impl Prompt for RustylinePrompt {
    fn get_input(&mut self) -> Result<Input> {
        let line = match self.editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(Input::Exit),
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("/?") || trimmed.eq_ignore_ascii_case("/help") {
            println!("Commands:");
            println!("/exit | /quit - Exit the session");
            println!("/? | /help - Display this help message");
            return Ok(Input::AskAgain);
        }

        let input = Input::from_line(&line);
        if let Input::Message(text) = &input {
            let _ = self.editor.add_history_entry(text.as_str());
        }
        Ok(input)
    }

    fn render(&mut self, message: &Message) {
        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        println!("{}:", style("Claude").yellow().bold());
                        print_markdown(&text.text);
                    }
                }
                MessageContent::ToolUse(tool_use) => self.render_tool_use(tool_use),
                MessageContent::ToolResult(result) => self.render_tool_result(result),
            }
        }
        let _ = io::stdout().flush();
    }

    fn show_busy(&mut self) {
        if self.spinner.is_none() {
            let progress = spinner();
            progress.start("awaiting reply...");
            self.spinner = Some(progress);
        }
    }

    fn hide_busy(&mut self) {
        if let Some(progress) = self.spinner.take() {
            progress.stop("");
        }
    }

    fn close(&mut self) {
        self.hide_busy();
    }
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    match printed {
        Ok(_) => println!(),
        Err(_) => println!("{}", content),
    }
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn truncate(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() > MAX_RESULT_LENGTH {
        let shortened: String = first_line.chars().take(MAX_RESULT_LENGTH).collect();
        format!("{}...", shortened)
    } else {
        first_line.to_string()
    }
}
