//! Text tokenization into padded tensor batches.

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

use embed_types::{EngineError, EngineResult};

/// One tokenized chunk, padded to the longest sequence in the chunk.
#[derive(Debug)]
pub struct TokenBatch {
    /// Token ids, shape `[batch, seq]`
    pub input_ids: Tensor,
    /// Segment ids, shape `[batch, seq]`; nonzero only for pair encodings
    pub token_type_ids: Tensor,
    /// 1 for real tokens, 0 for padding, shape `[batch, seq]`
    pub attention_mask: Tensor,
}

/// Tokenizer wrapper producing [`TokenBatch`]es.
pub struct TextTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl TextTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: &std::path::Path, max_length: usize) -> EngineResult<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
        Ok(Self {
            tokenizer,
            max_length,
        })
    }

    /// Tokenize a chunk of texts into a padded batch.
    pub fn encode_batch(&self, texts: &[String], device: &Device) -> EngineResult<TokenBatch> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
        self.pad_to_batch(encodings, device)
    }

    /// Tokenize (query, document) pairs into a padded batch.
    ///
    /// The query is repeated per document; segment ids distinguish the two
    /// sides for cross-encoder models.
    pub fn encode_pairs(
        &self,
        query: &str,
        documents: &[String],
        device: &Device,
    ) -> EngineResult<TokenBatch> {
        let pairs: Vec<(String, String)> = documents
            .iter()
            .map(|doc| (query.to_string(), doc.clone()))
            .collect();
        let encodings = self
            .tokenizer
            .encode_batch(pairs, true)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
        self.pad_to_batch(encodings, device)
    }

    fn pad_to_batch(
        &self,
        encodings: Vec<tokenizers::Encoding>,
        device: &Device,
    ) -> EngineResult<TokenBatch> {
        let batch_size = encodings.len();

        // Pad to the longest sequence in the chunk, capped at max_length
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(self.max_length);

        let mut input_ids: Vec<u32> = Vec::with_capacity(batch_size * max_len);
        let mut type_ids: Vec<u32> = Vec::with_capacity(batch_size * max_len);
        let mut attention_masks: Vec<u32> = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let types = encoding.get_type_ids();
            let mask = encoding.get_attention_mask();

            let truncated_len = ids.len().min(max_len);
            let mut padded_ids = ids[..truncated_len].to_vec();
            let mut padded_types = types[..truncated_len].to_vec();
            let mut padded_mask = mask[..truncated_len].to_vec();

            padded_ids.resize(max_len, 0);
            padded_types.resize(max_len, 0);
            padded_mask.resize(max_len, 0);

            input_ids.extend(padded_ids);
            type_ids.extend(padded_types);
            attention_masks.extend(padded_mask);
        }

        let input_ids = Tensor::from_vec(input_ids, (batch_size, max_len), device)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
        let token_type_ids = Tensor::from_vec(type_ids, (batch_size, max_len), device)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
        let attention_mask = Tensor::from_vec(attention_masks, (batch_size, max_len), device)
            .map_err(|e| EngineError::Preprocessing(e.to_string()))?;

        Ok(TokenBatch {
            input_ids,
            token_type_ids,
            attention_mask,
        })
    }
}
