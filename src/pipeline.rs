// THEORY:
// The `pipeline` module is the top-level synchronous API of the perception
// engine. It wires an injected palette, the classifier and the aggregator into
// a single entry point: hand it the samples of one image and the chroma byte the
// sampler computed, and get back the finished `ClassificationResult` or the
// storage record ready to be written.

use crate::core_modules::classifier::Classifier;
use crate::core_modules::encoding::StoredPerception;
use crate::core_modules::palette::Palette;
use crate::core_modules::perception::{Chroma, ClassificationResult, PerceptionAggregator, Sample};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_SHARD_SIZE: usize = 64;

/// Tunables for `ParallelPipeline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker tasks spawned by `ParallelPipeline`. Zero is treated as one.
    pub worker_count: usize,
    /// Samples per shard when `ParallelPipeline::analyze_sharded` splits an image.
    pub shard_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            shard_size: DEFAULT_SHARD_SIZE,
        }
    }
}

/// Classifies the samples of one image at a time on the calling thread.
#[derive(Debug, Clone)]
pub struct PerceptionPipeline {
    classifier: Classifier,
}

impl PerceptionPipeline {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self {
            classifier: Classifier::new(palette),
        }
    }

    /// A pipeline over the built-in palette.
    pub fn standard() -> Self {
        Self::new(Arc::new(Palette::standard()))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// A fresh aggregator for callers that feed samples incrementally.
    pub fn begin(&self) -> PerceptionAggregator {
        PerceptionAggregator::new(self.classifier.clone())
    }

    pub fn analyze(
        &self,
        samples: impl IntoIterator<Item = Sample>,
        chroma: Chroma,
    ) -> ClassificationResult {
        let mut perception = self.begin();
        perception.extend(samples);
        let result = perception.finalize(chroma);
        debug!(
            samples = result.sample_count(),
            main_color = %result.main_color(),
            chroma = %result.chroma(),
            "analyzed image"
        );
        result
    }

    pub fn analyze_and_store(
        &self,
        samples: impl IntoIterator<Item = Sample>,
        chroma: Chroma,
    ) -> StoredPerception {
        self.analyze(samples, chroma).to_stored()
    }
}
