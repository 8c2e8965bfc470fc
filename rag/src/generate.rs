use serde::{Deserialize, Serialize};

use crate::build_prompt::{answer_prompt, Message};
use crate::config::Config;
use crate::embed_chunks::cohere_auth;
use crate::error::{Error, Result};
use crate::http::post_json;
use crate::retrieve_chunks::Hit;

/// A chat-completion backend.
pub trait ChatModel {
    fn chat(&self, messages: &[Message], temperature: f32) -> Result<String>;
}

/// Cohere v2 chat endpoint.
pub struct CohereChat<'a> {
    cfg: &'a Config,
}

impl<'a> CohereChat<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ChatModel for CohereChat<'_> {
    fn chat(&self, messages: &[Message], temperature: f32) -> Result<String> {
        let auth = cohere_auth(self.cfg)?;
        let url = format!("{}/v2/chat", self.cfg.cohere_url);
        let req = ChatRequest {
            model: &self.cfg.chat_model,
            messages,
            temperature,
            stream: false,
        };
        let res = post_json::<ChatResponse, _>(&url, &req, auth, self.cfg.http_timeout)?;
        response_text(res)
    }
}

fn response_text(res: ChatResponse) -> Result<String> {
    let text: String = res
        .message
        .map(|m| m.content)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.kind == "text")
        .filter_map(|item| item.text)
        .collect();
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyResponse("chat"));
    }
    Ok(text.to_string())
}

pub fn generate_answer(
    chat: &dyn ChatModel,
    question: &str,
    hits: &[Hit],
    language: &str,
    temperature: f32,
) -> Result<String> {
    chat.chat(&answer_prompt(question, hits, language), temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<String> {
        response_text(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn joins_text_items() {
        let raw = r#"{"id":"1","message":{"role":"assistant","content":[
            {"type":"text","text":"Zara es "},{"type":"text","text":"una pintora. 🎨"}]}}"#;
        assert_eq!(parse(raw).unwrap(), "Zara es una pintora. 🎨");
    }

    #[test]
    fn blank_reply_is_an_error() {
        let raw = r#"{"message":{"role":"assistant","content":[{"type":"text","text":"  "}]}}"#;
        assert!(matches!(parse(raw), Err(Error::EmptyResponse("chat"))));
        assert!(matches!(parse(r#"{"message":null}"#), Err(Error::EmptyResponse(_))));
    }
}
