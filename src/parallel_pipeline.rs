// THEORY:
// The `parallel_pipeline` spreads classification work over a fixed pool of tokio
// tasks. The palette is immutable, so every worker shares one `Arc<Palette>`
// through its own `Classifier` clone and no locking is needed for lookups.
//
// Two shapes of work are supported:
// 1.  **Many images** (`analyze_batch`): one task per image. Each image is
//     analyzed by a single worker with its own aggregator. Results come back in
//     input order regardless of which worker finished first.
// 2.  **One large image** (`analyze_sharded`): the sample list is cut into
//     contiguous shards, each shard is aggregated on some worker, and the partial
//     aggregators are merged back in shard order. Because merging concatenates
//     sequences and sums votes, the result is identical to a sequential pass.
//
// A single dispatcher task hands jobs to workers round-robin. Each job carries a
// oneshot sender for its reply. Dropping the pipeline closes the job channel,
// which ends the dispatcher, which closes every worker channel.

use crate::core_modules::classifier::Classifier;
use crate::core_modules::palette::Palette;
use crate::core_modules::perception::{Chroma, ClassificationResult, PerceptionAggregator, Sample};
use crate::error::{PerceptionError, Result};
use crate::pipeline::PipelineConfig;
use futures::future::try_join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// The samples of one image plus its upstream chroma byte.
#[derive(Debug, Clone, Default)]
pub struct ImageSamples {
    pub samples: Vec<Sample>,
    pub chroma: Chroma,
}

pub struct PerceptionTask {
    pub task_id: u64,
    pub samples: Vec<Sample>,
    pub result_sender: oneshot::Sender<PerceptionAggregator>,
}

pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<PerceptionTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the dispatcher and `worker_count` workers on the current tokio
    /// runtime. Fails when called outside of one.
    pub fn new(classifier: Classifier, worker_count: usize) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| PerceptionError::WorkerPool(format!("no tokio runtime: {e}")))?;
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<PerceptionTask>();
        let mut workers = Vec::with_capacity(worker_count + 1);

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<PerceptionTask>())
            .unzip();

        workers.push(runtime.spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                // A closed worker channel drops the task, which fails its reply.
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_count;
            }
        }));

        for (worker_idx, mut worker_receiver) in worker_receivers.into_iter().enumerate() {
            let worker_classifier = classifier.clone();
            workers.push(runtime.spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let task_id = task.task_id;
                    let perception = Self::process_task(&worker_classifier, task.samples);
                    trace!(worker_idx, task_id, samples = perception.sample_count(), "task done");
                    // The caller may have given up waiting; nothing to do then.
                    let _ = task.result_sender.send(perception);
                }
            }));
        }

        debug!(worker_count, "perception worker pool started");
        Ok(Self {
            task_sender,
            workers,
        })
    }

    fn process_task(classifier: &Classifier, samples: Vec<Sample>) -> PerceptionAggregator {
        let mut perception = PerceptionAggregator::with_capacity(classifier.clone(), samples.len());
        perception.extend(samples);
        perception
    }

    pub async fn submit(&self, task_id: u64, samples: Vec<Sample>) -> Result<PerceptionAggregator> {
        let (result_sender, result_receiver) = oneshot::channel();

        self.task_sender
            .send(PerceptionTask {
                task_id,
                samples,
                result_sender,
            })
            .map_err(|_| PerceptionError::WorkerPool("failed to send task to worker pool".into()))?;

        result_receiver
            .await
            .map_err(|_| PerceptionError::WorkerPool(format!("task {task_id} was dropped by its worker")))
    }

    /// Closes the job channel and waits for every task to exit.
    pub async fn shutdown(self) {
        drop(self.task_sender);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

pub struct ParallelPipeline {
    config: PipelineConfig,
    classifier: Classifier,
    worker_pool: WorkerPool,
    task_counter: AtomicU64,
}

impl ParallelPipeline {
    /// Starts the worker pool. Must be called from within a tokio runtime,
    /// otherwise `PerceptionError::WorkerPool` is returned.
    pub fn new(palette: Arc<Palette>, config: PipelineConfig) -> Result<Self> {
        let classifier = Classifier::new(palette);
        let worker_pool = WorkerPool::new(classifier.clone(), config.worker_count)?;
        Ok(Self {
            config,
            classifier,
            worker_pool,
            task_counter: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn next_task_id(&self) -> u64 {
        self.task_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Analyzes one image on a single worker.
    pub async fn analyze(&self, samples: Vec<Sample>, chroma: Chroma) -> Result<ClassificationResult> {
        let perception = self.worker_pool.submit(self.next_task_id(), samples).await?;
        Ok(perception.finalize(chroma))
    }

    /// Analyzes many images concurrently; results are in input order.
    pub async fn analyze_batch(&self, images: Vec<ImageSamples>) -> Result<Vec<ClassificationResult>> {
        let image_count = images.len();
        let results = try_join_all(
            images
                .into_iter()
                .map(|image| self.analyze(image.samples, image.chroma)),
        )
        .await?;
        debug!(image_count, "analyzed image batch");
        Ok(results)
    }

    /// Splits one image's samples across workers and merges the shards in order.
    pub async fn analyze_sharded(
        &self,
        samples: Vec<Sample>,
        chroma: Chroma,
    ) -> Result<ClassificationResult> {
        let shard_size = self.config.shard_size.max(1);
        let shards = try_join_all(
            samples
                .chunks(shard_size)
                .map(|shard| self.worker_pool.submit(self.next_task_id(), shard.to_vec())),
        )
        .await?;

        let shard_count = shards.len();
        let mut perception = PerceptionAggregator::with_capacity(self.classifier.clone(), samples.len());
        for shard in shards {
            perception.merge(shard);
        }
        debug!(shard_count, samples = perception.sample_count(), "merged sharded image");
        Ok(perception.finalize(chroma))
    }

    pub async fn shutdown(self) {
        self.worker_pool.shutdown().await;
    }
}
