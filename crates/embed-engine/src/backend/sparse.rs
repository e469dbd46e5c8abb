//! Sparse text embedding via SPLADE-style masked-LM weighting.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertForMaskedLM, Config as BertConfig};
use tracing::{debug, info};

use embed_models::cache::ArtifactPaths;
use embed_models::registry::ModelSpec;
use embed_types::{EngineError, EngineResult, SparseEmbedding};

use crate::backend::SparseBackend;
use crate::preprocess::TextTokenizer;

/// SPLADE embedder: masked-LM logits turned into vocabulary weights via
/// `log(1 + relu(logits))`, max-pooled over the sequence axis.
pub struct SpladeEmbedder {
    model: BertForMaskedLM,
    tokenizer: TextTokenizer,
    device: Device,
}

impl SpladeEmbedder {
    /// Load model, config, and tokenizer from cached artifact paths.
    pub fn load(
        paths: &ArtifactPaths,
        spec: &ModelSpec,
        max_length: Option<usize>,
    ) -> EngineResult<Self> {
        info!(model = spec.code, "Loading sparse embedding model...");

        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(&paths.config)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EngineError::Artifact(format!("invalid config: {}", e)))?;

        let tokenizer =
            TextTokenizer::from_file(&paths.tokenizer, max_length.unwrap_or(spec.max_length))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[paths.weights.clone()], DType::F32, &device)
                .map_err(|e| EngineError::Artifact(e.to_string()))?
        };
        let model = BertForMaskedLM::load(vb, &config)
            .map_err(|e| EngineError::Artifact(e.to_string()))?;

        info!(vocab = spec.dim, "Model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }
}

impl SparseBackend for SpladeEmbedder {
    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<SparseEmbedding>> {
        debug!(count = texts.len(), "Embedding sparse chunk");

        let batch = self.tokenizer.encode_batch(texts, &self.device)?;

        let weights = (|| -> candle_core::Result<Tensor> {
            // [batch, seq, vocab] masked-LM logits
            let logits = self.model.forward(
                &batch.input_ids,
                &batch.token_type_ids,
                Some(&batch.attention_mask),
            )?;

            // log(1 + relu(logits)), padding positions zeroed out
            let weights = (logits.relu()? + 1.0)?.log()?;
            let mask = batch
                .attention_mask
                .unsqueeze(2)?
                .to_dtype(DType::F32)?
                .broadcast_as(weights.shape())?;

            // Max over the sequence axis yields one row per input
            weights.broadcast_mul(&mask)?.max(1)
        })()
        .map_err(|e| EngineError::Executor(e.to_string()))?;

        let rows: Vec<Vec<f32>> = weights
            .to_vec2()
            .map_err(|e| EngineError::Executor(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| SparseEmbedding::from_dense_row(row))
            .collect())
    }
}
