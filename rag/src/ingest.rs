//! Incremental indexing of the document folders into their collections.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunk_text::split_documents;
use crate::collection::Collection;
use crate::config::Config;
use crate::embed_chunks::{embed_texts, InputType};
use crate::error::{Error, Result};
use crate::load_document::load_document;
use crate::scan_files::scan_files;
use crate::store_qdrant::{count_points, ensure_collection, indexed_sources, store_points, Point};

/// Embedding and storage backend used while indexing.
pub trait VectorIndex {
    /// Names of the documents that already have points in `collection`.
    fn indexed_sources(&self, collection: Collection) -> Result<BTreeSet<String>>;
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    /// Create the collection if needed and upsert `points`.
    fn store(&self, collection: Collection, points: &[Point]) -> Result<()>;
    fn count(&self, collection: Collection) -> Result<u64>;
}

/// Cohere embeddings stored in Qdrant.
pub struct QdrantIndex<'a> {
    cfg: &'a Config,
}

impl<'a> QdrantIndex<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }
}

impl VectorIndex for QdrantIndex<'_> {
    fn indexed_sources(&self, collection: Collection) -> Result<BTreeSet<String>> {
        indexed_sources(self.cfg, collection)
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        embed_texts(self.cfg, texts, InputType::SearchDocument)
    }

    fn store(&self, collection: Collection, points: &[Point]) -> Result<()> {
        let Some(first) = points.first() else {
            return Ok(());
        };
        ensure_collection(self.cfg, collection, first.vector.len())?;
        store_points(self.cfg, collection, points)
    }

    fn count(&self, collection: Collection) -> Result<u64> {
        count_points(self.cfg, collection)
    }
}

/// Files split by whether their name is already present in the collection.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestPlan {
    pub to_index: Vec<PathBuf>,
    pub already_indexed: Vec<PathBuf>,
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn plan_ingest(files: Vec<PathBuf>, indexed: &BTreeSet<String>) -> IngestPlan {
    let mut plan = IngestPlan::default();
    for path in files {
        if indexed.contains(&file_name(&path)) {
            plan.already_indexed.push(path);
        } else {
            plan.to_index.push(path);
        }
    }
    plan
}

/// Index every not-yet-indexed document of `collection`.
///
/// Returns the names of all documents in the folder, or with `only_new` just
/// the ones indexed by this call. Documents that fail to load are skipped.
pub fn index_collection(
    cfg: &Config,
    index: &dyn VectorIndex,
    collection: Collection,
    only_new: bool,
) -> Result<Vec<String>> {
    let files = scan_files(cfg, &collection.directory(cfg))?;
    let all_names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
    let indexed = index.indexed_sources(collection)?;
    let plan = plan_ingest(files, &indexed);

    info!(
        %collection,
        new = plan.to_index.len(),
        skipped = plan.already_indexed.len(),
        "indexing documents"
    );

    let mut newly_indexed = Vec::new();
    for path in &plan.to_index {
        match index_file(cfg, index, collection, path) {
            Ok(0) => warn!(file = %path.display(), "document has no text, skipping"),
            Ok(chunks) => {
                info!(file = %path.display(), chunks, "document indexed");
                newly_indexed.push(file_name(path));
            }
            Err(err @ (Error::Load { .. } | Error::UnsupportedFormat(_))) => {
                warn!(file = %path.display(), error = %err, "failed to load document");
            }
            Err(err) => return Err(err),
        }
    }

    if !newly_indexed.is_empty() {
        let total = index.count(collection)?;
        info!(%collection, vectors = total, "collection updated");
    }

    Ok(if only_new { newly_indexed } else { all_names })
}

fn index_file(
    cfg: &Config,
    index: &dyn VectorIndex,
    collection: Collection,
    path: &Path,
) -> Result<usize> {
    let docs = load_document(path)?;
    let chunks = split_documents(&docs, cfg);
    if chunks.is_empty() {
        return Ok(0);
    }
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = index.embed_documents(&texts)?;
    let points: Vec<Point> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, vector)| Point::from_chunk(chunk, vector))
        .collect();
    index.store(collection, &points)?;
    Ok(points.len())
}

/// Copy user files into the uploaded folder, keeping their names.
///
/// Nothing is copied when any file has an unsupported format or shares its
/// name with a preprocessed document.
pub fn copy_into_uploads(cfg: &Config, paths: &[PathBuf]) -> Result<Vec<String>> {
    if let Some(bad) = paths.iter().find(|p| !cfg.is_supported(&file_name(p))) {
        return Err(Error::UnsupportedFormat(bad.clone()));
    }
    let preprocessed = cfg.preprocessed_dir();
    if let Some(taken) = paths
        .iter()
        .map(|p| file_name(p))
        .find(|name| preprocessed.join(name).exists())
    {
        return Err(Error::NameTaken(taken));
    }
    let upload_dir = cfg.uploaded_dir();
    fs::create_dir_all(&upload_dir)?;

    let mut names = Vec::with_capacity(paths.len());
    for path in paths {
        let name = file_name(path);
        let target = upload_dir.join(&name);
        let same_file = matches!(
            (fs::canonicalize(path), fs::canonicalize(&target)),
            (Ok(a), Ok(b)) if a == b
        );
        if !same_file {
            fs::copy(path, &target)?;
        }
        names.push(name);
    }
    Ok(names)
}
