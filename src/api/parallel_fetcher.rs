// src/api/parallel_fetcher.rs
//! Bounded fan-out of tile fetches with first-error fan-in.
//!
//! One generator task feeds fetch tasks through a hand-off channel to a
//! fixed set of workers. Workers push results through a second hand-off to
//! the collector, which owns the frame map. The first failure cancels
//! everything still pending and is the only error reported.

use super::url_generator::UrlGenerator;
use super::TileSource;
use crate::constants::MAX_CONCURRENT_FETCHES;
use crate::error::AppError;
use crate::render::TextOverlay;
use crate::types::{AnimationRequest, FetchTask, Frame, FrameSequence};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

type TaskReceiver = Arc<Mutex<mpsc::Receiver<FetchTask>>>;
type FrameResult = Result<Frame, AppError>;

/// Fetches and decorates every frame of a request with bounded concurrency.
#[derive(Clone)]
pub struct TileFetcher {
    source: Arc<dyn TileSource>,
    overlay: TextOverlay,
    max_concurrency: usize,
}

impl TileFetcher {
    /// Creates a fetcher running at most `MAX_CONCURRENT_FETCHES` workers.
    pub fn new(source: Arc<dyn TileSource>, overlay: TextOverlay) -> Self {
        Self {
            source,
            overlay,
            max_concurrency: MAX_CONCURRENT_FETCHES,
        }
    }

    /// Overrides the worker limit (at least one worker).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Number of workers started for `task_count` tasks.
    pub fn worker_count(&self, task_count: usize) -> usize {
        self.max_concurrency.min(task_count)
    }

    /// Retrieves every frame of `request`, or the first error encountered.
    ///
    /// All-or-nothing: no partial sequence is ever returned. In-flight
    /// network calls are not aborted on failure; workers notice the
    /// cancellation at their next hand-off and exit on their own.
    pub async fn fetch_frames(&self, request: &AnimationRequest) -> Result<FrameSequence, AppError> {
        let generator = UrlGenerator::new(request)?;
        let total = generator.remaining();
        let workers = self.worker_count(total);

        log::info!(
            "Fetching {} frames of '{}' with {} workers",
            total,
            request.parameter.name,
            workers
        );

        let cancellation = CancellationToken::new();
        // Completion also counts as a stop signal for anything still running.
        let _stop_on_exit = cancellation.clone().drop_guard();

        let (task_tx, task_rx) = mpsc::channel::<FetchTask>(1);
        let task_rx: TaskReceiver = Arc::new(Mutex::new(task_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<FrameResult>(1);

        let producer = tokio::spawn(generator.run(task_tx, cancellation.clone()));

        let mut join_set = JoinSet::new();
        for id in 0..workers {
            let worker = FrameWorker {
                id,
                source: Arc::clone(&self.source),
                overlay: self.overlay.clone(),
            };
            join_set.spawn(worker.run(
                Arc::clone(&task_rx),
                result_tx.clone(),
                cancellation.clone(),
            ));
        }
        // Workers hold the only senders; the loop below ends when they are done.
        drop(result_tx);

        let mut frames = FrameSequence::new();
        while let Some(result) = result_rx.recv().await {
            match result {
                Ok(frame) => {
                    log::debug!("Frame {} ready ({}/{})", frame.value, frames.len() + 1, total);
                    let value = frame.value.clone();
                    if frames.insert(frame).is_some() {
                        log::warn!("Parameter value {} produced more than one frame", value);
                    }
                }
                Err(e) => {
                    log::warn!("Frame failed, cancelling remaining work: {}", e);
                    cancellation.cancel();
                    join_set.detach_all();
                    return Err(e);
                }
            }
        }

        while let Some(joined) = join_set.join_next().await {
            let processed = joined?;
            log::trace!("Worker finished after {} tasks", processed);
        }

        // Check whether the generator itself failed.
        producer.await??;

        log::info!("Fetched {} frames", frames.len());
        Ok(frames)
    }
}

/// Fetches and decorates tasks until the task source runs dry or the
/// pipeline is cancelled.
struct FrameWorker {
    id: usize,
    source: Arc<dyn TileSource>,
    overlay: TextOverlay,
}

impl FrameWorker {
    /// Returns the number of tasks this worker completed.
    async fn run(
        self,
        tasks: TaskReceiver,
        results: mpsc::Sender<FrameResult>,
        cancellation: CancellationToken,
    ) -> usize {
        let mut processed = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                task = async { tasks.lock().await.recv().await } => task,
            };
            let Some(task) = next else {
                break;
            };

            let result = self.process(task).await;
            processed += 1;

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => break,
                sent = results.send(result) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }

        log::trace!("Worker {} exiting", self.id);
        processed
    }

    async fn process(&self, task: FetchTask) -> FrameResult {
        let bytes = self.source.fetch_tile(&task.url).await?;

        let overlay = self.overlay.clone();
        tokio::task::spawn_blocking(move || render_frame(&overlay, &bytes, task)).await?
    }
}

/// Decodes a fetched tile and burns its overlay in.
fn render_frame(overlay: &TextOverlay, bytes: &[u8], task: FetchTask) -> FrameResult {
    let image = image::load_from_memory(bytes)
        .map_err(|source| AppError::DecodeFailed {
            value: task.value.clone(),
            source,
        })?
        .to_rgba8();

    let image = overlay.decorate(image, &task.value, &task.overlay)?;

    Ok(Frame {
        value: task.value,
        image,
    })
}
