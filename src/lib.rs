// THEORY:
// This file is the entry point of the `color_perception` library crate. It
// exposes a perceptual color classification engine: samples of an image go in,
// a compact, storable description of the image's colors comes out.
//
// Layers, leaf to root:
// - `core_modules::pixel`: the opaque sRGB sample type and its Lab conversion.
// - `core_modules::category`: the sixteen color categories with their names,
//   salience weights and example swatches.
// - `core_modules::palette`: the curated reference anchors.
// - `core_modules::classifier`: nearest-anchor search in Lab space.
// - `core_modules::perception`: per-image aggregation (color sequence, main
//   color, brightness profile).
// - `core_modules::encoding`: the fixed-width hex strings used for storage.
// - `pipeline` / `parallel_pipeline`: the synchronous and the tokio-based entry
//   points that tie the layers together.
//
// Decoding images and choosing which pixels to sample is left to the caller.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::category::{Category, CategoryInfo};
pub use core_modules::classifier::{Classifier, Match};
pub use core_modules::encoding::{
    StoredPerception, decode_brightness, decode_categories, decode_category, decode_chroma,
    encode_brightness, encode_categories, encode_category, encode_chroma,
};
pub use core_modules::palette::{Palette, ReferencePoint};
pub use core_modules::perception::{
    Chroma, ClassificationResult, Luminance, PerceptionAggregator, Sample, Tally,
};
pub use core_modules::pixel::pixel::{Lab, Pixel};
pub use error::{MalformedReason, PerceptionError, Result};
pub use parallel_pipeline::{ImageSamples, ParallelPipeline};
pub use pipeline::{PerceptionPipeline, PipelineConfig};
