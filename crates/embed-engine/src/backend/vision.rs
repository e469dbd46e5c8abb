//! Image embedding via the CLIP vision tower.

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use tracing::{debug, info};

use embed_models::cache::ArtifactPaths;
use embed_models::registry::ModelSpec;
use embed_types::{Embedding, EngineError, EngineResult};

use crate::backend::VisionBackend;
use crate::preprocess::image::load_image_batch;

/// CLIP ViT-B/32 input resolution
const IMAGE_SIZE: usize = 224;

/// CLIP vision encoder producing projected, L2-normalized image features.
pub struct ClipVisionEmbedder {
    model: ClipModel,
    device: Device,
    dim: usize,
}

impl ClipVisionEmbedder {
    /// Load model weights from cached artifact paths.
    pub fn load(paths: &ArtifactPaths, spec: &ModelSpec) -> EngineResult<Self> {
        info!(model = spec.code, "Loading image embedding model...");

        let device = Device::Cpu;
        let config = ClipConfig::vit_base_patch32();

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[paths.weights.clone()], DType::F32, &device)
                .map_err(|e| EngineError::Artifact(e.to_string()))?
        };
        let model = ClipModel::new(vb, &config)
            .map_err(|e| EngineError::Artifact(e.to_string()))?;

        info!(dim = spec.dim, "Model loaded");

        Ok(Self {
            model,
            device,
            dim: spec.dim,
        })
    }
}

impl VisionBackend for ClipVisionEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_chunk(&self, paths: &[String]) -> EngineResult<Vec<Embedding>> {
        debug!(count = paths.len(), "Embedding image chunk");

        let pixels = load_image_batch(paths, IMAGE_SIZE, &self.device)?;

        let features = self
            .model
            .get_image_features(&pixels)
            .map_err(|e| EngineError::Executor(e.to_string()))?;

        let rows: Vec<Vec<f32>> = features
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
