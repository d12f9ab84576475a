//! Message and tool-schema conversion for provider wire formats

use super::messages::{LlmMessage, MessageRole};
use crate::tools::ToolSchema;
use serde_json::{json, Value};

/// Message format converter
pub struct MessageConverter;

impl MessageConverter {
    /// Convert messages to the OpenAI chat-completions format
    pub fn to_openai(messages: &[LlmMessage]) -> Vec<Value> {
        let mut converted = Vec::with_capacity(messages.len());

        for message in messages {
            let mut msg = json!({
                "role": message.role.to_string(),
                "content": message.content,
            });

            if let Some(tool_calls) = &message.tool_calls {
                let calls: Vec<Value> = tool_calls
                    .iter()
                    .map(|tc| {
                        json!({
                            "id": tc.id,
                            "type": "function",
                            "function": {
                                "name": tc.name,
                                "arguments": serde_json::to_string(&tc.arguments)
                                    .unwrap_or_default(),
                            }
                        })
                    })
                    .collect();
                msg["tool_calls"] = json!(calls);
            }
            if let Some(tool_call_id) = &message.tool_call_id {
                msg["tool_call_id"] = json!(tool_call_id);
            }
            if let Some(name) = &message.name {
                msg["name"] = json!(name);
            }

            converted.push(msg);
        }

        converted
    }

    /// Convert messages to the Anthropic messages format.
    ///
    /// System messages are excluded (Anthropic takes the system prompt as a
    /// top-level field); tool results become `tool_result` user blocks and
    /// assistant tool calls become `tool_use` blocks.
    pub fn to_anthropic(messages: &[LlmMessage]) -> Vec<Value> {
        let mut converted = Vec::new();

        for message in messages.iter().filter(|m| m.role != MessageRole::System) {
            if message.role == MessageRole::Tool {
                if let Some(tool_call_id) = &message.tool_call_id {
                    converted.push(json!({
                        "role": "user",
                        "content": [{
                            "type": "tool_result",
                            "tool_use_id": tool_call_id,
                            "content": message.content,
                            "is_error": message.content.starts_with("Error:"),
                        }]
                    }));
                    continue;
                }
            }

            if message.role == MessageRole::Assistant {
                if let Some(tool_calls) = &message.tool_calls {
                    if !tool_calls.is_empty() {
                        let mut blocks = Vec::new();
                        if !message.content.is_empty() {
                            blocks.push(json!({"type": "text", "text": message.content}));
                        }
                        for call in tool_calls {
                            blocks.push(json!({
                                "type": "tool_use",
                                "id": call.id,
                                "name": call.name,
                                "input": call.arguments,
                            }));
                        }
                        converted.push(json!({"role": "assistant", "content": blocks}));
                        continue;
                    }
                }
            }

            converted.push(json!({
                "role": message.role.to_string(),
                "content": message.content,
            }));
        }

        converted
    }

    /// Pull the system message out of a message list
    pub fn extract_system_message(messages: &[LlmMessage]) -> Option<String> {
        messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone())
    }
}

/// Tool schema converter
pub struct ToolConverter;

impl ToolConverter {
    /// Convert tool schemas to OpenAI function declarations
    pub fn to_openai(tools: &[ToolSchema]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect()
    }

    /// Convert tool schemas to Anthropic tool declarations
    pub fn to_anthropic(tools: &[ToolSchema]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.parameters,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolCall, ToolParameter};
    use std::collections::HashMap;

    fn proposal() -> LlmMessage {
        let mut args = HashMap::new();
        args.insert("query".to_string(), serde_json::json!("SELECT 1"));
        LlmMessage::assistant_with_tools(
            "Running a check",
            vec![ToolCall::new("call-1", "execute_query", args)],
        )
    }

    #[test]
    fn openai_conversion_carries_tool_plumbing() {
        let messages = vec![
            LlmMessage::system("policy"),
            LlmMessage::user("How many genres?"),
            proposal(),
            LlmMessage::tool("Error: Query error: oops", "call-1", "execute_query"),
        ];

        let converted = MessageConverter::to_openai(&messages);
        assert_eq!(converted.len(), 4);
        assert_eq!(converted[0]["role"], "system");
        assert_eq!(converted[2]["tool_calls"][0]["function"]["name"], "execute_query");
        assert_eq!(converted[3]["role"], "tool");
        assert_eq!(converted[3]["tool_call_id"], "call-1");
    }

    #[test]
    fn anthropic_conversion_drops_system_and_builds_blocks() {
        let messages = vec![
            LlmMessage::system("policy"),
            LlmMessage::user("How many genres?"),
            proposal(),
            LlmMessage::tool("Error: Query error: oops", "call-1", "execute_query"),
        ];

        let converted = MessageConverter::to_anthropic(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[1]["content"][1]["type"], "tool_use");
        assert_eq!(converted[2]["content"][0]["type"], "tool_result");
        assert_eq!(converted[2]["content"][0]["is_error"], true);

        assert_eq!(
            MessageConverter::extract_system_message(&messages).as_deref(),
            Some("policy")
        );
    }

    #[test]
    fn tool_schemas_convert_per_provider() {
        let schemas = vec![ToolSchema::new(
            "describe_table",
            "Describe a table",
            vec![ToolParameter::string("table_name", "The table")],
        )];

        let openai = ToolConverter::to_openai(&schemas);
        assert_eq!(openai[0]["function"]["name"], "describe_table");

        let anthropic = ToolConverter::to_anthropic(&schemas);
        assert_eq!(anthropic[0]["name"], "describe_table");
        assert!(anthropic[0]["input_schema"]["properties"]["table_name"].is_object());
    }
}
