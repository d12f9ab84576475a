//! Response parsing for provider wire formats

use super::messages::{LlmResponse, LlmUsage};
use crate::error::{AskdbError, AskdbResult};
use crate::tools::ToolCall;
use serde_json::Value;
use std::collections::HashMap;

/// Response parser
pub struct ResponseParser;

impl ResponseParser {
    /// Parse an OpenAI chat-completions response
    pub fn parse_openai(response: Value) -> AskdbResult<LlmResponse> {
        let choice = response["choices"]
            .get(0)
            .cloned()
            .ok_or_else(|| AskdbError::llm("no choices in response"))?;
        let message = &choice["message"];

        let content = message["content"].as_str().unwrap_or("").to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let function = &call["function"];
                let arguments: HashMap<String, Value> = serde_json::from_str(
                    function["arguments"].as_str().unwrap_or("{}"),
                )
                .unwrap_or_default();

                tool_calls.push(ToolCall {
                    id: call["id"].as_str().unwrap_or("").to_string(),
                    name: function["name"].as_str().unwrap_or("").to_string(),
                    arguments,
                });
            }
        }

        let usage = response["usage"].as_object().map(|usage| LlmUsage {
            prompt_tokens: usage
                .get("prompt_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            completion_tokens: usage
                .get("completion_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            total_tokens: usage
                .get("total_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        });

        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
            model: response["model"].as_str().map(|s| s.to_string()),
            finish_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
        })
    }

    /// Parse an Anthropic messages response.
    ///
    /// The content array interleaves `text` and `tool_use` blocks.
    pub fn parse_anthropic(response: Value) -> AskdbResult<LlmResponse> {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        if let Some(blocks) = response["content"].as_array() {
            for block in blocks {
                match block["type"].as_str() {
                    Some("text") => {
                        if let Some(text) = block["text"].as_str() {
                            if !content.is_empty() {
                                content.push('\n');
                            }
                            content.push_str(text);
                        }
                    }
                    Some("tool_use") => {
                        let arguments: HashMap<String, Value> = block["input"]
                            .as_object()
                            .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                            .unwrap_or_default();

                        tool_calls.push(ToolCall {
                            id: block["id"].as_str().unwrap_or("").to_string(),
                            name: block["name"].as_str().unwrap_or("").to_string(),
                            arguments,
                        });
                    }
                    _ => {}
                }
            }
        }

        let usage = response["usage"].as_object().map(|usage| {
            let prompt = usage
                .get("input_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32;
            let completion = usage
                .get("output_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32;
            LlmUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt + completion,
            }
        });

        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
            model: response["model"].as_str().map(|s| s.to_string()),
            finish_reason: response["stop_reason"].as_str().map(|s| s.to_string()),
        })
    }
}
