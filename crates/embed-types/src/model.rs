//! Model description records returned by listing operations.

use serde::{Deserialize, Serialize};

/// Information about one supported model.
///
/// The registry owns the canonical catalog; values handed across the C
/// boundary are independent caller-owned duplicates of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model code (HuggingFace repository id, e.g. "BAAI/bge-small-en-v1.5")
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Embedding dimension; rerank models declare 1 (scalar score)
    pub dim: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info_clone_is_independent() {
        let info = ModelInfo {
            code: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            description: "Sentence transformer".to_string(),
            dim: 384,
        };
        let copy = info.clone();
        assert_eq!(info, copy);
    }
}
