//! Image decoding into normalized pixel tensor batches.

use candle_core::{DType, Device, Tensor};

use embed_types::{EngineError, EngineResult};

/// CLIP channel means (RGB)
const MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP channel standard deviations (RGB)
const STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Decode one image file into a `[3, size, size]` normalized tensor.
pub fn load_image(path: &str, size: usize, device: &Device) -> EngineResult<Tensor> {
    let img = image::open(path)
        .map_err(|e| EngineError::Preprocessing(format!("{}: {}", path, e)))?;

    let img = img.resize_to_fill(
        size as u32,
        size as u32,
        image::imageops::FilterType::Triangle,
    );
    let raw = img.to_rgb8().into_raw();

    let pixels = Tensor::from_vec(raw, (size, size, 3), device)
        .and_then(|t| t.permute((2, 0, 1)))
        .and_then(|t| t.to_dtype(DType::F32))
        .and_then(|t| t / 255.0)
        .map_err(|e| EngineError::Preprocessing(e.to_string()))?;

    let mean = Tensor::from_slice(&MEAN, (3, 1, 1), device)
        .map_err(|e| EngineError::Preprocessing(e.to_string()))?;
    let std = Tensor::from_slice(&STD, (3, 1, 1), device)
        .map_err(|e| EngineError::Preprocessing(e.to_string()))?;

    pixels
        .broadcast_sub(&mean)
        .and_then(|t| t.broadcast_div(&std))
        .map_err(|e| EngineError::Preprocessing(e.to_string()))
}

/// Decode a chunk of image files into a `[batch, 3, size, size]` tensor.
pub fn load_image_batch(
    paths: &[String],
    size: usize,
    device: &Device,
) -> EngineResult<Tensor> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(load_image(path, size, device)?);
    }
    Tensor::stack(&images, 0).map_err(|e| EngineError::Preprocessing(e.to_string()))
}
