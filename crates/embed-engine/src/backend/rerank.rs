//! Query/document relevance scoring via BERT cross-encoders.

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tracing::{debug, info};

use embed_models::cache::ArtifactPaths;
use embed_models::registry::ModelSpec;
use embed_types::{EngineError, EngineResult};

use crate::backend::RerankBackend;
use crate::preprocess::TextTokenizer;

/// BERT cross-encoder: (query, document) pairs in, one relevance logit out.
pub struct CrossEncoderRanker {
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: TextTokenizer,
    device: Device,
}

impl CrossEncoderRanker {
    /// Load encoder, pooler, and classification head from cached artifacts.
    pub fn load(
        paths: &ArtifactPaths,
        spec: &ModelSpec,
        max_length: Option<usize>,
    ) -> EngineResult<Self> {
        info!(model = spec.code, "Loading rerank model...");

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

        let hidden = config.hidden_size;
        let model = BertModel::load(vb.clone(), &config)
            .map_err(|e| EngineError::Artifact(e.to_string()))?;

        // Sequence-classification head as exported by the HF checkpoint
        let pooler = candle_nn::linear(hidden, hidden, vb.pp("bert").pp("pooler").pp("dense"))
            .map_err(|e| EngineError::Artifact(e.to_string()))?;
        let classifier = candle_nn::linear(hidden, 1, vb.pp("classifier"))
            .map_err(|e| EngineError::Artifact(e.to_string()))?;

        info!("Model loaded");

        Ok(Self {
            model,
            pooler,
            classifier,
            tokenizer,
            device,
        })
    }
}

impl RerankBackend for CrossEncoderRanker {
    fn score_chunk(&self, query: &str, documents: &[String]) -> EngineResult<Vec<f32>> {
        debug!(count = documents.len(), "Scoring rerank chunk");

        let batch = self.tokenizer.encode_pairs(query, documents, &self.device)?;

        let scores = (|| -> candle_core::Result<Vec<f32>> {
            let hidden = self.model.forward(
                &batch.input_ids,
                &batch.token_type_ids,
                Some(&batch.attention_mask),
            )?;

            // [CLS] token -> pooler(tanh) -> single relevance logit
            let cls = hidden.i((.., 0))?;
            let pooled = self.pooler.forward(&cls)?.tanh()?;
            let logits: Tensor = self.classifier.forward(&pooled)?;

            logits.squeeze(1)?.to_dtype(DType::F32)?.to_vec1()
        })()
        .map_err(|e| EngineError::Executor(e.to_string()))?;

        Ok(scores)
    }
}
