use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub documents_dir: PathBuf,
    pub supported_exts: Vec<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub default_language: String,
    pub temperature: f32,
    pub user_name: String,
    pub log_dir: PathBuf,
    pub cohere_url: String,
    pub cohere_api_key: String,
    pub embed_model: String,
    pub chat_model: String,
    pub qdrant_url: String,
    pub qdrant_api_key: String,
    pub collection_prefix: String,
    pub distance: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("documents"),
            supported_exts: vec![".pdf".to_string(), ".docx".to_string()],
            chunk_size: 512,
            chunk_overlap: 128,
            top_k: 3,
            default_language: "es".to_string(),
            temperature: 0.0,
            user_name: "admin".to_string(),
            log_dir: PathBuf::from("logs"),
            cohere_url: "https://api.cohere.com".to_string(),
            cohere_api_key: String::new(),
            embed_model: "embed-multilingual-v2.0".to_string(),
            chat_model: "command-r-plus-04-2024".to_string(),
            qdrant_url: "http://localhost:6333".to_string(),
            qdrant_api_key: String::new(),
            collection_prefix: "documentos".to_string(),
            distance: "Cosine".to_string(),
            http_timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so API keys work without manual `source .env`.
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            documents_dir: env::var("DOCCHAT_DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            supported_exts: env::var("DOCCHAT_SUPPORTED_EXTS")
                .map(|v| parse_exts(&v))
                .unwrap_or(defaults.supported_exts),
            chunk_size: env_parse("DOCCHAT_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: env_parse("DOCCHAT_CHUNK_OVERLAP", defaults.chunk_overlap),
            top_k: env_parse("DOCCHAT_TOP_K", defaults.top_k).max(1),
            default_language: env::var("DOCCHAT_DEFAULT_LANGUAGE")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.default_language),
            temperature: clamp_temperature(env_parse("DOCCHAT_TEMPERATURE", defaults.temperature)),
            user_name: env::var("DOCCHAT_USER_NAME").unwrap_or(defaults.user_name),
            log_dir: env::var("DOCCHAT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            cohere_url: env::var("COHERE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.cohere_url),
            cohere_api_key: env::var("COHERE_API_KEY").unwrap_or_default(),
            embed_model: env::var("COHERE_EMBED_MODEL").unwrap_or(defaults.embed_model),
            chat_model: env::var("COHERE_CHAT_MODEL").unwrap_or(defaults.chat_model),
            qdrant_url: env::var("QDRANT_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.qdrant_url),
            qdrant_api_key: env::var("QDRANT_API_KEY").unwrap_or_default(),
            collection_prefix: env::var("QDRANT_COLLECTION_PREFIX")
                .map(|v| sanitize_collection_name(&v))
                .unwrap_or(defaults.collection_prefix),
            distance: env::var("QDRANT_DISTANCE").unwrap_or(defaults.distance),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 120)),
        }
    }

    pub fn preprocessed_dir(&self) -> PathBuf {
        self.documents_dir.join("preprocessed")
    }

    pub fn uploaded_dir(&self) -> PathBuf {
        self.documents_dir.join("uploaded")
    }

    /// Case-insensitive check of a file name against `supported_exts`.
    pub fn is_supported(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.supported_exts.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}

pub fn clamp_temperature(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_exts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
        .collect()
}

fn sanitize_collection_name(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else if c.is_ascii_whitespace() || c == '.' {
            out.push('_');
        }
    }
    if out.is_empty() { "documentos".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_normalized() {
        assert_eq!(parse_exts(" PDF, .docx ,,"), vec![".pdf", ".docx"]);
    }

    #[test]
    fn collection_prefix_is_sanitized() {
        assert_eq!(sanitize_collection_name("my docs.v2"), "my_docs_v2");
        assert_eq!(sanitize_collection_name("???"), "documentos");
    }

    #[test]
    fn temperature_is_clamped() {
        assert_eq!(clamp_temperature(1.7), 1.0);
        assert_eq!(clamp_temperature(-0.2), 0.0);
        assert_eq!(clamp_temperature(f32::NAN), 0.0);
        assert_eq!(clamp_temperature(0.4), 0.4);
    }

    #[test]
    fn supported_check_ignores_case() {
        let cfg = Config::default();
        assert!(cfg.is_supported("Informe.PDF"));
        assert!(cfg.is_supported("notas.docx"));
        assert!(!cfg.is_supported("notas.txt"));
    }
}
