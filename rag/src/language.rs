use tracing::info;

use crate::build_prompt::language_detection_prompt;
use crate::error::Result;
use crate::generate::ChatModel;

/// Reduce a model reply such as `"Answer: EN."` or `"en (English)"` to a
/// two-letter code. Only the last or the first word is considered.
pub fn normalize_language(raw: &str, fallback: &str) -> String {
    let words: Vec<&str> = raw
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    let code = [words.last(), words.first()]
        .into_iter()
        .flatten()
        .find(|w| w.len() == 2 && w.is_ascii())
        .map(|w| w.to_ascii_lowercase())
        .unwrap_or_else(|| fallback.to_string());
    code
}

pub fn detect_language(chat: &dyn ChatModel, question: &str, fallback: &str) -> Result<String> {
    let raw = chat.chat(&language_detection_prompt(question, fallback), 0.0)?;
    let language = normalize_language(&raw, fallback);
    info!(%language, "detected query language");
    Ok(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_last_two_letter_word_then_first() {
        assert_eq!(normalize_language("en (English)", "es"), "en");
        assert_eq!(normalize_language("The language is FR", "es"), "fr");
        assert_eq!(normalize_language("I am not sure", "es"), "es");
    }
}
