use crate::retrieve_chunks::Hit;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

const LANGUAGE_EXAMPLES: &str = "Example 1:
Question: ¿Cómo estás?
Answer: es

Example 2:
Question: How are you?
Answer: en

Example 3:
Question: Como você está?
Answer: pt";

const TRANSLATION_EXAMPLES: &str = "Example 1:
Text: Emma decided to share her extra day with the people. 🌟🤸‍♀️
Target language: es
Translation: Emma decidió compartir su día extra con el pueblo. 🌟🤸‍♀️

Example 2:
Text: Emma decidiu compartilhar seu dia extra com o povo. 🌟🤸‍♀️
Target language: en
Translation: Emma decided to share her extra day with the people. 🌟🤸‍♀️

Example 3:
Text: Emma decidió compartir su día extra con el pueblo. 🌟🤸‍♀️
Target language: pt
Translation: Emma decidiu compartilhar seu dia extra com o povo. 🌟🤸‍♀️";

pub fn language_detection_prompt(question: &str, fallback: &str) -> Vec<Message> {
    let system = format!(
        "You detect the language of a question.\n\
         Reply only with its ISO 639-1 code, in the format shown in the examples.\n\
         If you cannot tell with certainty, reply '{}'.\n\n{}",
        fallback, LANGUAGE_EXAMPLES
    );
    vec![
        Message::system(system),
        Message::user(format!("Question: {}\nAnswer:", question)),
    ]
}

pub fn answer_prompt(question: &str, hits: &[Hit], language: &str) -> Vec<Message> {
    let system = format!(
        "You are a question answering assistant that gives precise, brief answers.\n\
         Use the retrieved context passages to answer.\n\
         If you do not know the answer, say clearly that you do not know.\n\
         Keep the answer to one sentence at most and be concise.\n\
         Answer in the language with ISO 639-1 code '{}'.\n\
         Add one emoji at the end that sums up or complements the answer.\n\
         Always answer in the third person.",
        language
    );
    let user = format!(
        "Question: {}\n\nContext:\n{}\n\nAnswer:",
        question,
        format_context(hits)
    );
    vec![Message::system(system), Message::user(user)]
}

pub fn translation_prompt(text: &str, target_language: &str) -> Vec<Message> {
    let system = format!(
        "Only translate the given text into the target language, keeping the emojis at the end.\n\
         Reply with the translation alone.\n\n{}",
        TRANSLATION_EXAMPLES
    );
    let user = format!(
        "Text: {}\nTarget language: {}\nTranslation:",
        text, target_language
    );
    vec![Message::system(system), Message::user(user)]
}

pub fn format_context(hits: &[Hit]) -> String {
    let mut context_lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        let payload = hit.payload.as_ref();
        let source = payload
            .and_then(|p| p.source.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let index = payload
            .and_then(|p| p.chunk_index)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string());
        context_lines.push(format!("[{}] {} (chunk {})\n{}", i + 1, source, index, hit.text()));
    }

    if context_lines.is_empty() {
        "(no context found)".to_string()
    } else {
        context_lines.join("\n\n")
    }
}
