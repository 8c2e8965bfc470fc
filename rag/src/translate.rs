use tracing::warn;

use crate::build_prompt::translation_prompt;
use crate::generate::ChatModel;

/// Translate `text` into `target`. Any model failure returns `text` unchanged.
pub fn translate_answer(chat: &dyn ChatModel, text: &str, target: &str, temperature: f32) -> String {
    match chat.chat(&translation_prompt(text, target), temperature) {
        Ok(translated) => translated,
        Err(err) => {
            warn!(error = %err, %target, "translation failed, keeping original answer");
            text.to_string()
        }
    }
}
