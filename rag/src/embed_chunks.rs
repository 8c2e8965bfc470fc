use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{post_json, Auth};

/// Cohere rejects embed requests with more texts than this.
pub const MAX_TEXTS_PER_REQUEST: usize = 96;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    SearchDocument,
    SearchQuery,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
    input_type: InputType,
    truncate: &'a str,
}

pub(crate) fn cohere_auth(cfg: &Config) -> Result<Auth<'_>> {
    if cfg.cohere_api_key.trim().is_empty() {
        return Err(Error::Config("COHERE_API_KEY is not set".to_string()));
    }
    Ok(Auth::Bearer(cfg.cohere_api_key.trim()))
}

pub fn embed_texts(cfg: &Config, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(vec![]);
    }
    let auth = cohere_auth(cfg)?;
    let url = format!("{}/v1/embed", cfg.cohere_url);

    let mut out = Vec::with_capacity(texts.len());
    for batch in texts.chunks(MAX_TEXTS_PER_REQUEST) {
        let req = EmbedRequest {
            model: &cfg.embed_model,
            texts: batch,
            input_type,
            truncate: "END",
        };
        let res = post_json::<Value, _>(&url, &req, auth, cfg.http_timeout)?;
        let vectors = parse_embeddings(res)?;
        if vectors.len() != batch.len() {
            return Err(Error::EmptyResponse("embed"));
        }
        out.extend(vectors);
    }
    Ok(out)
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = match value.get("embeddings") {
        Some(Value::Object(by_type)) => by_type.get("float"),
        other => other,
    };
    match embeddings {
        Some(rows) => parse_rows(rows),
        None => Err(Error::EmptyResponse("embed")),
    }
}

fn parse_rows(value: &Value) -> Result<Vec<Vec<f32>>> {
    let arr = value.as_array().ok_or_else(|| invalid("embeddings is not an array"))?;
    arr.iter().map(parse_vec).collect()
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value.as_array().ok_or_else(|| invalid("embedding is not an array"))?;
    let mut out = Vec::with_capacity(arr.len());
    for v in arr {
        let n = v.as_f64().ok_or_else(|| invalid("embedding value is not a number"))?;
        out.push(n as f32);
    }
    Ok(out)
}

fn invalid(message: &str) -> Error {
    Error::Decode {
        url: "/v1/embed".to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_embeddings() {
        let res = json!({"id": "x", "embeddings": [[0.5, 1.0], [2.0, -1.0]]});
        assert_eq!(parse_embeddings(res).unwrap(), vec![vec![0.5, 1.0], vec![2.0, -1.0]]);
    }

    #[test]
    fn parses_typed_embeddings() {
        let res = json!({"embeddings": {"float": [[0.25]]}});
        assert_eq!(parse_embeddings(res).unwrap(), vec![vec![0.25]]);
    }

    #[test]
    fn rejects_missing_or_malformed_embeddings() {
        assert!(matches!(
            parse_embeddings(json!({"message": "bad"})),
            Err(Error::EmptyResponse(_))
        ));
        assert!(matches!(
            parse_embeddings(json!({"embeddings": [["a"]]})),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn input_type_uses_cohere_names() {
        assert_eq!(serde_json::to_value(InputType::SearchQuery).unwrap(), json!("search_query"));
        assert_eq!(
            serde_json::to_value(InputType::SearchDocument).unwrap(),
            json!("search_document")
        );
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let cfg = Config::default();
        let err = embed_texts(&cfg, &["hola".to_string()], InputType::SearchQuery).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
