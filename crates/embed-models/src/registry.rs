//! Static model catalogs, one per modality.
//!
//! Read-only after process start: there is no runtime registration. Lookup
//! failures surface as [`EngineError::UnsupportedModel`] naming the code
//! the caller asked for.

use embed_types::{EngineError, EngineResult, ModelInfo};

/// Pooling strategy applied to dense text model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pooling {
    /// Mean over non-padding token embeddings
    Mean,
    /// First ([CLS]) token embedding
    Cls,
}

/// One catalog entry: everything needed to locate and load a model.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Model code (HuggingFace repository id)
    pub code: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Embedding dimension; rerank models declare 1 (scalar score)
    pub dim: usize,
    /// Artifact files the loader needs from the repository
    pub files: &'static [&'static str],
    /// Pooling strategy; only meaningful for dense text models
    pub pooling: Pooling,
    /// Maximum input sequence length in tokens
    pub max_length: usize,
}

impl ModelSpec {
    /// Owned [`ModelInfo`] duplicate of this entry.
    pub fn to_info(&self) -> ModelInfo {
        ModelInfo {
            code: self.code.to_string(),
            description: self.description.to_string(),
            dim: self.dim,
        }
    }
}

const TEXT_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];
const IMAGE_FILES: &[&str] = &["config.json", "model.safetensors"];

const DENSE_MODELS: &[ModelSpec] = &[
    ModelSpec {
        code: "sentence-transformers/all-MiniLM-L6-v2",
        description: "Sentence Transformer, MiniLM-L6-v2",
        dim: 384,
        files: TEXT_FILES,
        pooling: Pooling::Mean,
        max_length: 256,
    },
    ModelSpec {
        code: "BAAI/bge-small-en-v1.5",
        description: "v1.5 release of the fast English embedding model",
        dim: 384,
        files: TEXT_FILES,
        pooling: Pooling::Cls,
        max_length: 512,
    },
    ModelSpec {
        code: "BAAI/bge-base-en-v1.5",
        description: "v1.5 release of the base English embedding model",
        dim: 768,
        files: TEXT_FILES,
        pooling: Pooling::Cls,
        max_length: 512,
    },
    ModelSpec {
        code: "BAAI/bge-large-en-v1.5",
        description: "v1.5 release of the large English embedding model",
        dim: 1024,
        files: TEXT_FILES,
        pooling: Pooling::Cls,
        max_length: 512,
    },
];

const SPARSE_MODELS: &[ModelSpec] = &[ModelSpec {
    code: "prithivida/Splade_PP_en_v1",
    description: "SPLADE++ model for sparse lexical embeddings",
    // Sparse dimension is the tokenizer vocabulary size
    dim: 30522,
    files: TEXT_FILES,
    pooling: Pooling::Mean,
    max_length: 512,
}];

const IMAGE_MODELS: &[ModelSpec] = &[ModelSpec {
    code: "openai/clip-vit-base-patch32",
    description: "CLIP ViT-B/32 vision encoder",
    dim: 512,
    files: IMAGE_FILES,
    pooling: Pooling::Mean,
    max_length: 0,
}];

const RERANK_MODELS: &[ModelSpec] = &[
    ModelSpec {
        code: "cross-encoder/ms-marco-MiniLM-L-6-v2",
        description: "Cross-encoder re-ranker trained on MS MARCO (6 layers)",
        dim: 1,
        files: TEXT_FILES,
        pooling: Pooling::Cls,
        max_length: 512,
    },
    ModelSpec {
        code: "cross-encoder/ms-marco-MiniLM-L-12-v2",
        description: "Cross-encoder re-ranker trained on MS MARCO (12 layers)",
        dim: 1,
        files: TEXT_FILES,
        pooling: Pooling::Cls,
        max_length: 512,
    },
];

/// Supported dense text embedding models.
pub fn dense_models() -> &'static [ModelSpec] {
    DENSE_MODELS
}

/// Supported sparse text embedding models.
pub fn sparse_models() -> &'static [ModelSpec] {
    SPARSE_MODELS
}

/// Supported image embedding models.
pub fn image_models() -> &'static [ModelSpec] {
    IMAGE_MODELS
}

/// Supported rerank models.
pub fn rerank_models() -> &'static [ModelSpec] {
    RERANK_MODELS
}

fn find(catalog: &'static [ModelSpec], code: &str) -> EngineResult<&'static ModelSpec> {
    catalog
        .iter()
        .find(|spec| spec.code == code)
        .ok_or_else(|| EngineError::UnsupportedModel(code.to_string()))
}

/// Look up a dense text model by code.
pub fn find_dense(code: &str) -> EngineResult<&'static ModelSpec> {
    find(DENSE_MODELS, code)
}

/// Look up a sparse text model by code.
pub fn find_sparse(code: &str) -> EngineResult<&'static ModelSpec> {
    find(SPARSE_MODELS, code)
}

/// Look up an image model by code.
pub fn find_image(code: &str) -> EngineResult<&'static ModelSpec> {
    find(IMAGE_MODELS, code)
}

/// Look up a rerank model by code.
pub fn find_rerank(code: &str) -> EngineResult<&'static ModelSpec> {
    find(RERANK_MODELS, code)
}

/// Convert a catalog to owned [`ModelInfo`] records for listing calls.
pub fn list_infos(catalog: &[ModelSpec]) -> Vec<ModelInfo> {
    catalog
        .iter()
        .map(|spec| ModelInfo {
            code: spec.code.to_string(),
            description: spec.description.to_string(),
            dim: spec.dim,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_non_empty_with_positive_dims() {
        for catalog in [dense_models(), sparse_models(), image_models(), rerank_models()] {
            assert!(!catalog.is_empty());
            for spec in catalog {
                assert!(spec.dim > 0, "{} declares dim 0", spec.code);
                assert!(!spec.description.is_empty());
                assert!(!spec.files.is_empty());
            }
        }
    }

    #[test]
    fn test_find_known_dense_model() {
        let spec = find_dense("BAAI/bge-small-en-v1.5").unwrap();
        assert_eq!(spec.dim, 384);
        assert_eq!(spec.pooling, Pooling::Cls);
    }

    #[test]
    fn test_find_unknown_code_fails() {
        let err = find_dense("no/such-model").unwrap_err();
        assert!(err.to_string().contains("no/such-model"));

        assert!(find_sparse("no/such-model").is_err());
        assert!(find_image("no/such-model").is_err());
        assert!(find_rerank("no/such-model").is_err());
    }

    #[test]
    fn test_codes_are_modality_scoped() {
        // A dense code must not resolve through the rerank catalog
        assert!(find_rerank("BAAI/bge-small-en-v1.5").is_err());
    }

    #[test]
    fn test_list_infos_duplicates_catalog() {
        let infos = list_infos(dense_models());
        assert_eq!(infos.len(), dense_models().len());
        assert_eq!(infos[0].code, dense_models()[0].code);
    }
}
