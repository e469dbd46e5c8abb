//! Model artifact caching.
//!
//! Downloads model files from HuggingFace Hub on first use and serves them
//! from a local cache directory afterwards. Acquisition failures map to
//! [`EngineError::Artifact`]; retry policy is the caller's concern.

use std::path::PathBuf;

use tracing::{debug, info};

use embed_types::{EngineError, EngineResult};

/// Model cache configuration.
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Model repository id
    pub repo_id: String,
}

impl ModelCache {
    /// Create a cache for one repository under the given directory.
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Create a cache for one repository under the default directory
    /// (`<user cache dir>/embed-bridge/models`).
    pub fn for_repo(repo_id: impl Into<String>) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("embed-bridge")
            .join("models");
        Self::new(cache_dir, repo_id)
    }

    /// Get the directory holding this repository's files.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    /// Check whether every listed file is already cached.
    pub fn is_cached(&self, files: &[&str]) -> bool {
        let model_dir = self.model_dir();
        files.iter().all(|f| model_dir.join(f).exists())
    }

    /// Get path to a specific model file.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.model_dir().join(filename)
    }
}

/// Paths to the artifacts a loader needs.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Get or download the listed artifact files.
///
/// The returned paths always name `config.json`, `tokenizer.json`, and
/// `model.safetensors` inside the cache; modalities that need no tokenizer
/// simply never open that path.
pub fn ensure_artifacts(cache: &ModelCache, files: &[&str]) -> EngineResult<ArtifactPaths> {
    let model_dir = cache.model_dir();

    if cache.is_cached(files) {
        debug!(path = ?model_dir, "Using cached model");
    } else {
        info!(repo = %cache.repo_id, "Downloading model files...");
        download_files(cache, files)?;
    }

    Ok(ArtifactPaths {
        config: model_dir.join("config.json"),
        tokenizer: model_dir.join("tokenizer.json"),
        weights: model_dir.join("model.safetensors"),
    })
}

/// Download the listed files from HuggingFace Hub into the cache.
fn download_files(cache: &ModelCache, files: &[&str]) -> EngineResult<()> {
    use hf_hub::api::sync::Api;

    let api = Api::new().map_err(|e| EngineError::Artifact(e.to_string()))?;
    let repo = api.model(cache.repo_id.clone());

    std::fs::create_dir_all(cache.model_dir())?;

    for filename in files {
        info!(file = filename, "Downloading...");
        let source_path = repo
            .get(filename)
            .map_err(|e| EngineError::Artifact(format!("{}: {}", filename, e)))?;

        let dest_path = cache.file_path(filename);
        std::fs::copy(&source_path, &dest_path)?;
        debug!(file = filename, "Downloaded to {:?}", dest_path);
    }

    Ok(())
}
