use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::collection::Collection;
use crate::config::Config;
use crate::embed_query::embed_query;
use crate::error::Result;
use crate::http::post_json;
use crate::store_qdrant::qdrant_auth;

/// What a question is answered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    All,
    Document { name: String, collection: Collection },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Hit {
    #[serde(default)]
    pub score: f32,
    pub payload: Option<Payload>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Payload {
    pub source: Option<String>,
    pub page: Option<usize>,
    pub chunk_index: Option<usize>,
    pub text: Option<String>,
}

impl Hit {
    pub fn text(&self) -> &str {
        self.payload
            .as_ref()
            .and_then(|p| p.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    result: Option<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<Hit>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

/// Qdrant filter restricting a search to chunks of one document.
pub fn source_filter(name: &str) -> Value {
    json!({ "must": [{ "key": "source", "match": { "value": name } }] })
}

pub fn retrieve(cfg: &Config, scope: &Scope, question: &str) -> Result<Vec<Hit>> {
    let vector = embed_query(cfg, question)?;
    retrieve_top(cfg, scope, &vector)
}

pub fn retrieve_top(cfg: &Config, scope: &Scope, vector: &[f32]) -> Result<Vec<Hit>> {
    if vector.is_empty() {
        return Ok(vec![]);
    }
    let hits = match scope {
        Scope::Document { name, collection } => {
            query_collection(cfg, *collection, vector, Some(source_filter(name)))?
        }
        Scope::All => {
            let mut merged = Vec::new();
            for collection in Collection::ALL {
                merged.extend(query_collection(cfg, collection, vector, None)?);
            }
            merge_by_score(merged, cfg.top_k)
        }
    };
    let hits = dedupe_hits(hits);
    debug!(count = hits.len(), ?scope, "retrieved context");
    Ok(hits)
}

fn query_collection(
    cfg: &Config,
    collection: Collection,
    vector: &[f32],
    filter: Option<Value>,
) -> Result<Vec<Hit>> {
    let url = format!(
        "{}/collections/{}/points/query",
        cfg.qdrant_url,
        collection.qdrant_name(cfg)
    );
    let req = QueryRequest {
        query: vector,
        limit: cfg.top_k,
        with_payload: true,
        filter,
    };
    match post_json::<QueryResponse, _>(&url, &req, qdrant_auth(cfg), cfg.http_timeout) {
        Ok(res) => Ok(res.result.map(|r| r.points).unwrap_or_default()),
        Err(err) if err.is_not_found() => Ok(vec![]),
        Err(err) => Err(err),
    }
}

/// Best `limit` hits across collections, highest score first.
pub fn merge_by_score(mut hits: Vec<Hit>, limit: usize) -> Vec<Hit> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    hits
}

/// Drop hits whose text was already seen, keeping the earlier one.
pub fn dedupe_hits(hits: Vec<Hit>) -> Vec<Hit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.text().to_string()))
        .collect()
}
