//! Modality-specific input preprocessing.
//!
//! Turns raw caller input (text, image paths) into the tensor shapes the
//! backends expect. Tokenization and image decoding are consumed from the
//! `tokenizers` and `image` crates, not reimplemented.

pub mod image;
pub mod text;

pub use text::{TextTokenizer, TokenBatch};
