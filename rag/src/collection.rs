use std::fmt;
use std::path::PathBuf;

use crate::config::Config;

/// The two persisted vector collections, each backed by its own document folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Documents shipped with the deployment.
    Preprocessed,
    /// Documents added by users at runtime.
    Uploaded,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Preprocessed, Collection::Uploaded];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Preprocessed => "preprocessed",
            Collection::Uploaded => "uploaded",
        }
    }

    pub fn directory(self, cfg: &Config) -> PathBuf {
        match self {
            Collection::Preprocessed => cfg.preprocessed_dir(),
            Collection::Uploaded => cfg.uploaded_dir(),
        }
    }

    pub fn qdrant_name(self, cfg: &Config) -> String {
        format!("{}_{}", cfg.collection_prefix, self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
