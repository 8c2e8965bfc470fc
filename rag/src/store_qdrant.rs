use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::chunk_text::Chunk;
use crate::collection::Collection;
use crate::config::Config;
use crate::error::Result;
use crate::http::{get_json, post_json, put_json, Auth};

const SCROLL_PAGE: usize = 256;

#[derive(Serialize)]
struct CreateCollection<'a> {
    vectors: VectorParams<'a>,
}

#[derive(Serialize)]
struct VectorParams<'a> {
    size: usize,
    distance: &'a str,
}

#[derive(Serialize)]
struct CreateFieldIndex<'a> {
    field_name: &'a str,
    field_schema: &'a str,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PointPayload {
    pub source: String,
    pub page: Option<usize>,
    pub chunk_index: usize,
    pub start_index: usize,
    pub text: String,
}

#[derive(Serialize, Debug)]
pub struct Point {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

impl Point {
    pub fn from_chunk(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self {
            id: point_id(&chunk.metadata.source, chunk.metadata.chunk_index),
            vector,
            payload: PointPayload {
                source: chunk.metadata.source,
                page: chunk.metadata.page,
                chunk_index: chunk.metadata.chunk_index,
                start_index: chunk.metadata.start_index,
                text: chunk.text,
            },
        }
    }
}

/// Stable id so indexing the same document twice overwrites its points.
pub fn point_id(source: &str, chunk_index: usize) -> String {
    let name = format!("{}#{}", source, chunk_index);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: &'a [Point],
}

#[derive(Serialize)]
struct ScrollRequest<'a> {
    limit: usize,
    with_payload: &'a [&'a str],
    with_vector: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<Value>,
}

#[derive(Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<ScrolledPoint>,
    next_page_offset: Option<Value>,
}

#[derive(Deserialize)]
struct ScrolledPoint {
    #[serde(default)]
    payload: Option<SourceOnly>,
}

#[derive(Deserialize)]
struct SourceOnly {
    source: Option<String>,
}

#[derive(Serialize)]
struct CountRequest {
    exact: bool,
}

#[derive(Deserialize)]
struct CountResponse {
    result: CountResult,
}

#[derive(Deserialize)]
struct CountResult {
    count: u64,
}

pub(crate) fn qdrant_auth(cfg: &Config) -> Auth<'_> {
    Auth::api_key(&cfg.qdrant_api_key)
}

fn collection_url(cfg: &Config, collection: Collection) -> String {
    format!("{}/collections/{}", cfg.qdrant_url, collection.qdrant_name(cfg))
}

pub fn ensure_collection(cfg: &Config, collection: Collection, vector_size: usize) -> Result<()> {
    let url = collection_url(cfg, collection);
    let auth = qdrant_auth(cfg);
    if get_json::<Value>(&url, auth, cfg.http_timeout).is_ok() {
        return Ok(());
    }
    let body = CreateCollection {
        vectors: VectorParams {
            size: vector_size,
            distance: &cfg.distance,
        },
    };
    put_json::<Value, _>(&url, &body, auth, cfg.http_timeout)?;

    // Keyword index keeps per-document filtering fast.
    let index = CreateFieldIndex {
        field_name: "source",
        field_schema: "keyword",
    };
    put_json::<Value, _>(&format!("{}/index?wait=true", url), &index, auth, cfg.http_timeout)?;
    Ok(())
}

pub fn store_points(cfg: &Config, collection: Collection, points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Ok(());
    }
    let url = format!("{}/points?wait=true", collection_url(cfg, collection));
    let body = UpsertPoints { points };
    put_json::<Value, _>(&url, &body, qdrant_auth(cfg), cfg.http_timeout)?;
    Ok(())
}

/// Distinct `source` values stored in a collection; empty when it does not exist yet.
pub fn indexed_sources(cfg: &Config, collection: Collection) -> Result<BTreeSet<String>> {
    let url = format!("{}/points/scroll", collection_url(cfg, collection));
    let mut sources = BTreeSet::new();
    let mut offset = None;

    loop {
        let req = ScrollRequest {
            limit: SCROLL_PAGE,
            with_payload: &["source"],
            with_vector: false,
            offset: offset.take(),
        };
        let res = match post_json::<ScrollResponse, _>(&url, &req, qdrant_auth(cfg), cfg.http_timeout) {
            Ok(res) => res,
            Err(err) if err.is_not_found() => return Ok(BTreeSet::new()),
            Err(err) => return Err(err),
        };
        sources.extend(
            res.result
                .points
                .into_iter()
                .filter_map(|p| p.payload.and_then(|s| s.source)),
        );
        match res.result.next_page_offset {
            Some(next) if !next.is_null() => offset = Some(next),
            _ => break,
        }
    }

    Ok(sources)
}

pub fn count_points(cfg: &Config, collection: Collection) -> Result<u64> {
    let url = format!("{}/points/count", collection_url(cfg, collection));
    let res = post_json::<CountResponse, _>(
        &url,
        &CountRequest { exact: true },
        qdrant_auth(cfg),
        cfg.http_timeout,
    )?;
    Ok(res.result.count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk_text::ChunkMetadata;

    #[test]
    fn point_ids_are_stable_and_distinct() {
        assert_eq!(point_id("a.pdf", 0), point_id("a.pdf", 0));
        assert_ne!(point_id("a.pdf", 0), point_id("a.pdf", 1));
        assert_ne!(point_id("a.pdf", 0), point_id("b.pdf", 0));
        assert!(Uuid::parse_str(&point_id("a.pdf", 3)).is_ok());
    }

    #[test]
    fn point_carries_chunk_metadata() {
        let chunk = Chunk {
            text: "hola".to_string(),
            metadata: ChunkMetadata {
                source: "a.docx".to_string(),
                page: None,
                chunk_index: 2,
                start_index: 40,
            },
        };
        let point = Point::from_chunk(chunk, vec![0.1, 0.2]);
        assert_eq!(point.id, point_id("a.docx", 2));
        assert_eq!(point.payload.source, "a.docx");
        assert_eq!(point.payload.start_index, 40);
        assert_eq!(point.payload.text, "hola");
    }
}
