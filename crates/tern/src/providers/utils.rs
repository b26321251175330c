use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::collections::HashSet;

use super::base::Usage;
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::Tool;

/// Convert internal Message format to Anthropic's API message specification
pub fn messages_to_anthropic_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut content = Vec::new();
        for block in &message.content {
            match block {
                MessageContent::Text(text) => {
                    // The API rejects empty text blocks
                    if !text.text.is_empty() {
                        content.push(json!({
                            "type": "text",
                            "text": text.text,
                        }));
                    }
                }
                MessageContent::ToolUse(tool_use) => {
                    content.push(json!({
                        "type": "tool_use",
                        "id": tool_use.id,
                        "name": tool_use.name,
                        "input": tool_use.input,
                    }));
                }
                MessageContent::ToolResult(result) => {
                    content.push(json!({
                        "type": "tool_result",
                        "tool_use_id": result.tool_use_id,
                        "content": result.content,
                        "is_error": result.is_error,
                    }));
                }
            }
        }

        // An assistant turn that said nothing still has to keep its place in the history
        if content.is_empty() && message.role == Role::Assistant {
            content.push(json!({"type": "text", "text": "(no content)"}));
        }

        messages_spec.push(json!({
            "role": message.role,
            "content": content,
        }));
    }

    messages_spec
}

/// Convert internal Tool format to Anthropic's API tool specification
pub fn tools_to_anthropic_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": tool.input_schema,
        }));
    }

    Ok(result)
}

/// Convert Anthropic's API response to internal Message format
pub fn anthropic_response_to_message(response: &Value) -> Result<Message> {
    let blocks = response
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow!("Invalid response format from Anthropic API: missing content"))?;

    let mut message = Message::assistant();
    for block in blocks {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                let text = block
                    .get("text")
                    .and_then(|t| t.as_str())
                    .ok_or_else(|| anyhow!("Text block without text in Anthropic response"))?;
                message = message.with_text(text);
            }
            Some("tool_use") => {
                let id = block
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Tool use block without id in Anthropic response"))?;
                let name = block
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("Tool use block {} without name", id))?;
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));
                message = message.with_tool_use(id, name, input);
            }
            other => {
                tracing::debug!("skipping unsupported content block type {:?}", other);
            }
        }
    }

    Ok(message)
}

pub fn get_usage(response: &Value) -> Usage {
    let usage = match response.get("usage") {
        Some(usage) => usage,
        None => return Usage::default(),
    };

    let input_tokens = usage
        .get("input_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);
    let output_tokens = usage
        .get("output_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);
    let total_tokens = match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    };

    Usage::new(input_tokens, output_tokens, total_tokens)
}
