mod build_prompt;
mod catalog;
mod chunk_text;
mod collection;
mod config;
mod embed_chunks;
mod embed_query;
mod error;
mod generate;
mod http;
mod ingest;
mod language;
mod load_document;
mod pipeline;
mod retrieve_chunks;
mod scan_files;
mod store_qdrant;
mod translate;

pub use build_prompt::{
    answer_prompt, format_context, language_detection_prompt, translation_prompt, Message,
};
pub use catalog::{CatalogEntry, DocumentCatalog};
pub use chunk_text::{chunk_text, split_documents, start_indexes, Chunk, ChunkMetadata, SEPARATORS};
pub use collection::Collection;
pub use config::{clamp_temperature, Config};
pub use embed_chunks::{embed_texts, InputType};
pub use embed_query::embed_query;
pub use error::{Error, Result};
pub use generate::{generate_answer, ChatModel, CohereChat};
pub use ingest::{
    copy_into_uploads, file_name, index_collection, plan_ingest, IngestPlan, QdrantIndex, VectorIndex,
};
pub use language::{detect_language, normalize_language};
pub use load_document::{load_document, Document, DocumentMetadata};
pub use pipeline::{answer_with, QueryRequest, QueryResponse};
pub use retrieve_chunks::{
    dedupe_hits, merge_by_score, retrieve, source_filter, Hit, Payload, Scope,
};
pub use scan_files::scan_files;
pub use store_qdrant::{count_points, ensure_collection, indexed_sources, point_id, store_points, Point, PointPayload};
pub use translate::translate_answer;

/// Retrieve context for the request's scope and answer it with Cohere.
pub fn answer_query(cfg: &Config, request: &QueryRequest) -> Result<QueryResponse> {
    pipeline::validate(request)?;
    let hits = retrieve(cfg, &request.scope, &request.question)?;
    answer_with(&CohereChat::new(cfg), cfg, request, hits)
}
