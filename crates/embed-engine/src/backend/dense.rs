//! Dense text embedding via BERT-family models.

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tracing::{debug, info};

use embed_models::cache::ArtifactPaths;
use embed_models::registry::{ModelSpec, Pooling};
use embed_types::{Embedding, EngineError, EngineResult};

use crate::backend::DenseBackend;
use crate::preprocess::TextTokenizer;

/// BERT encoder with mean or CLS pooling and L2 normalization.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: TextTokenizer,
    device: Device,
    dim: usize,
    pooling: Pooling,
}

impl BertEmbedder {
    /// Load model, config, and tokenizer from cached artifact paths.
    pub fn load(
        paths: &ArtifactPaths,
        spec: &ModelSpec,
        max_length: Option<usize>,
    ) -> EngineResult<Self> {
        info!(model = spec.code, "Loading dense embedding model...");

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
        let model =
            BertModel::load(vb, &config).map_err(|e| EngineError::Artifact(e.to_string()))?;

        info!(dim = spec.dim, pooling = ?spec.pooling, "Model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
            dim: spec.dim,
            pooling: spec.pooling,
        })
    }

    /// Mean pooling over token embeddings (excluding padding).
    fn mean_pooling(&self, embeddings: &Tensor, attention_mask: &Tensor) -> EngineResult<Tensor> {
        let pooled = (|| -> candle_core::Result<Tensor> {
            let mask = attention_mask
                .unsqueeze(2)?
                .broadcast_as(embeddings.shape())?;
            let mask_f32 = mask.to_dtype(DType::F32)?;

            let masked = embeddings.broadcast_mul(&mask_f32)?;
            let sum = masked.sum(1)?;

            // Divide by the number of real tokens
            let mask_sum = mask_f32.sum(1)?;
            let mask_sum = mask_sum.clamp(1e-9, f64::MAX)?;

            sum.broadcast_div(&mask_sum)
        })();
        pooled.map_err(|e| EngineError::Executor(e.to_string()))
    }
}

impl DenseBackend for BertEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_chunk(&self, texts: &[String]) -> EngineResult<Vec<Embedding>> {
        debug!(count = texts.len(), "Embedding chunk");

        let batch = self.tokenizer.encode_batch(texts, &self.device)?;

        let output = self
            .model
            .forward(
                &batch.input_ids,
                &batch.token_type_ids,
                Some(&batch.attention_mask),
            )
            .map_err(|e| EngineError::Executor(e.to_string()))?;

        let pooled = match self.pooling {
            Pooling::Mean => self.mean_pooling(&output, &batch.attention_mask)?,
            Pooling::Cls => output
                .i((.., 0))
                .map_err(|e| EngineError::Executor(e.to_string()))?,
        };

        let rows: Vec<Vec<f32>> = pooled
            .to_vec2()
            .map_err(|e| EngineError::Executor(e.to_string()))?;

        for row in &rows {
            if row.len() != self.dim {
                return Err(EngineError::Executor(format!(
                    "model produced dimension {} (expected {})",
                    row.len(),
                    self.dim
                )));
            }
        }

        Ok(rows.into_iter().map(Embedding::new).collect())
    }
}
