use crate::config::Config;
use crate::embed_chunks::{embed_texts, InputType};
use crate::error::{Error, Result};

pub fn embed_query(cfg: &Config, text: &str) -> Result<Vec<f32>> {
    let vecs = embed_texts(cfg, &[text.to_string()], InputType::SearchQuery)?;
    vecs.into_iter().next().ok_or(Error::EmptyResponse("embed"))
}
