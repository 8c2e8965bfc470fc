use tracing::info;

use crate::build_prompt::format_context;
use crate::config::{clamp_temperature, Config};
use crate::error::{Error, Result};
use crate::generate::{generate_answer, ChatModel};
use crate::language::detect_language;
use crate::retrieve_chunks::{Hit, Scope};
use crate::translate::translate_answer;

#[derive(Clone, Debug)]
pub struct QueryRequest {
    pub user_name: String,
    pub question: String,
    pub scope: Scope,
    pub temperature: f32,
}

#[derive(Clone, Debug)]
pub struct QueryResponse {
    pub user_name: String,
    pub answer: String,
    /// Language detected for the question.
    pub language: String,
    pub context: String,
    pub hits: Vec<Hit>,
}

pub(crate) fn validate(request: &QueryRequest) -> Result<()> {
    if request.question.trim().is_empty() {
        return Err(Error::Config("question is empty".to_string()));
    }
    Ok(())
}

/// Answer from already retrieved hits: detect language, generate in the
/// default language, then translate when the question used another one.
pub fn answer_with(
    chat: &dyn ChatModel,
    cfg: &Config,
    request: &QueryRequest,
    hits: Vec<Hit>,
) -> Result<QueryResponse> {
    validate(request)?;
    let temperature = clamp_temperature(request.temperature);
    let default_language = cfg.default_language.as_str();

    let language = detect_language(chat, &request.question, default_language)?;
    let base = generate_answer(chat, &request.question, &hits, default_language, temperature)?;
    let answer = if language == default_language {
        base
    } else {
        info!(from = default_language, to = %language, "translating answer");
        translate_answer(chat, &base, &language, temperature)
    };

    Ok(QueryResponse {
        user_name: request.user_name.clone(),
        answer,
        language,
        context: format_context(&hits),
        hits,
    })
}
