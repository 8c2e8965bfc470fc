use std::path::PathBuf;

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ingest::{copy_into_uploads, file_name, index_collection, VectorIndex};
use crate::retrieve_chunks::Scope;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub collection: Collection,
}

impl CatalogEntry {
    pub fn scope(&self) -> Scope {
        Scope::Document {
            name: self.name.clone(),
            collection: self.collection,
        }
    }
}

/// Ordered list of documents that questions can be scoped to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentCatalog {
    entries: Vec<CatalogEntry>,
}

impl DocumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index both folders and list preprocessed documents first, then uploaded ones.
    pub fn initialize(cfg: &Config, index: &dyn VectorIndex) -> Result<Self> {
        let mut catalog = Self::new();
        for collection in Collection::ALL {
            let names = index_collection(cfg, index, collection, false)?;
            catalog.extend(collection, names);
        }
        Ok(catalog)
    }

    /// Copy `paths` into the uploaded folder, index what is new and add it.
    ///
    /// Returns the uploaded names that can now be queried, in upload order and
    /// without repeats. A name already listed as preprocessed is rejected
    /// before anything is copied.
    pub fn upload(
        &mut self,
        cfg: &Config,
        index: &dyn VectorIndex,
        paths: &[PathBuf],
    ) -> Result<Vec<String>> {
        if let Some(taken) = paths
            .iter()
            .map(|p| file_name(p))
            .find(|name| self.collection_of(name) == Some(Collection::Preprocessed))
        {
            return Err(Error::NameTaken(taken));
        }
        let copied = copy_into_uploads(cfg, paths)?;
        let indexed = index_collection(cfg, index, Collection::Uploaded, true)?;
        self.extend(Collection::Uploaded, indexed);

        let mut queryable: Vec<String> = Vec::with_capacity(copied.len());
        for name in copied {
            if self.collection_of(&name) == Some(Collection::Uploaded) && !queryable.contains(&name) {
                queryable.push(name);
            }
        }
        Ok(queryable)
    }

    /// Append names not yet listed.
    pub fn extend<I>(&mut self, collection: Collection, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        for name in names {
            if !self.contains(&name) {
                self.entries.push(CatalogEntry { name, collection });
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn collection_of(&self, name: &str) -> Option<Collection> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.collection)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn last(&self) -> Option<&CatalogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
