//! Integration tests against real models.
//!
//! These download model artifacts on first run, so they are ignored by
//! default. Run with:
//! cargo test -p embed-engine -- --ignored

use embed_engine::{
    RerankEngine, SparseTextEmbeddingEngine, TextEmbeddingEngine,
};

#[test]
#[ignore = "requires model download"]
fn test_dense_embed_end_to_end() {
    let engine = TextEmbeddingEngine::new("sentence-transformers/all-MiniLM-L6-v2").unwrap();
    assert_eq!(engine.info().dim, 384);

    let texts = vec![
        "The cat sat on the mat".to_string(),
        "A cat is sitting on a mat".to_string(),
        "Rust is a systems programming language".to_string(),
    ];
    let embeddings = engine.embed(&texts, 2).unwrap();

    assert_eq!(embeddings.len(), 3);
    for emb in &embeddings {
        assert_eq!(emb.dimension(), 384);
    }

    // Paraphrases should be closer than unrelated sentences
    let sim_similar = embeddings[0].cosine_similarity(&embeddings[1]);
    let sim_different = embeddings[0].cosine_similarity(&embeddings[2]);
    assert!(sim_similar > sim_different);
    assert!(sim_similar > 0.7);
}

#[test]
#[ignore = "requires model download"]
fn test_dense_embed_batch_size_invariance() {
    let engine = TextEmbeddingEngine::new("sentence-transformers/all-MiniLM-L6-v2").unwrap();
    let texts: Vec<String> = (0..5).map(|i| format!("sentence number {}", i)).collect();

    let all_at_once = engine.embed(&texts, 16).unwrap();
    let chunked = engine.embed(&texts, 2).unwrap();

    for (a, b) in all_at_once.iter().zip(&chunked) {
        let sim = a.cosine_similarity(b);
        assert!(sim > 0.999, "chunking changed the embedding: sim={}", sim);
    }
}

#[test]
#[ignore = "requires model download"]
fn test_sparse_embed_end_to_end() {
    let engine = SparseTextEmbeddingEngine::new("prithivida/Splade_PP_en_v1").unwrap();
    let texts = vec![
        "sparse lexical retrieval".to_string(),
        "hello world".to_string(),
    ];
    let embeddings = engine.embed(&texts, 4).unwrap();

    assert_eq!(embeddings.len(), 2);
    for emb in &embeddings {
        assert_eq!(emb.indices.len(), emb.values.len());
        assert!(emb.nnz() > 0, "real text should activate some terms");
        for &v in &emb.values {
            assert!(v > 0.0, "sparse weights are nonzero by construction");
        }
        for &i in &emb.indices {
            assert!(i < engine.info().dim);
        }
    }
}

#[test]
#[ignore = "requires model download"]
fn test_rerank_end_to_end() {
    let engine = RerankEngine::new("cross-encoder/ms-marco-MiniLM-L-6-v2").unwrap();
    let docs = vec![
        "Paris is the capital of France".to_string(),
        "Bananas are rich in potassium".to_string(),
        "The French capital city is Paris".to_string(),
    ];
    let results = engine
        .rerank("What is the capital of France?", &docs, true, 2)
        .unwrap();

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    // The potassium document should rank last
    assert_eq!(results[2].index, 1);
    for result in &results {
        assert_eq!(result.document.as_deref(), Some(docs[result.index].as_str()));
    }
}
