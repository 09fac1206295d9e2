use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::TrySendError;
use parking_lot::Mutex;

use crate::common::{BvrFrame, ModelConfig};
use crate::data::send_channels::{pipeline_channels, DetectionState, PipelineJob, SendState};
use crate::data::{OwnedOutput, PostprocessError, RawOutput};
use crate::detection_runners::inference_process::PostProcess;
use crate::detection_runners::{BvrPipeline, Y};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Accepted,
    /// A frame was still in flight, so this one was discarded.
    Dropped,
}

/// Runs one pipeline on a dedicated thread, one frame at a time.
///
/// `submit` never blocks: while a frame is in flight new frames are dropped rather than queued.
/// Only the newest result is kept; an uncollected one is replaced when the next frame finishes.
pub struct PipelineWorker {
    pipeline: Arc<Mutex<Option<BvrPipeline>>>,
    in_flight: Arc<AtomicBool>,
    replaced: Arc<AtomicUsize>,
    send: Option<SendState>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PipelineWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineWorker")
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .field("running", &self.is_running())
            .finish()
    }
}

impl PipelineWorker {
    pub fn new(config: &ModelConfig, shapes: &[Vec<usize>], profile: bool) -> anyhow::Result<Self> {
        Self::spawn(BvrPipeline::new(config, shapes)?, profile)
    }

    pub fn spawn(pipeline: BvrPipeline, profile: bool) -> anyhow::Result<Self> {
        let pipeline = Arc::new(Mutex::new(Some(pipeline)));
        let in_flight = Arc::new(AtomicBool::new(false));
        let replaced = Arc::new(AtomicUsize::new(0));
        let (send, state) = pipeline_channels();

        let handle = {
            let pipeline = Arc::clone(&pipeline);
            let in_flight = Arc::clone(&in_flight);
            let replaced = Arc::clone(&replaced);
            std::thread::Builder::new()
                .name("bvr-postprocess".to_string())
                .spawn(move || worker_loop(state, pipeline, in_flight, replaced, profile))?
        };

        Ok(Self {
            pipeline,
            in_flight,
            replaced,
            send: Some(send),
            handle: Some(handle),
        })
    }

    /// Hands a frame to the worker unless one is already in flight.
    pub fn submit(&self, outputs: Vec<OwnedOutput>, frame: BvrFrame) -> SubmitStatus {
        let Some(send) = &self.send else {
            return SubmitStatus::Dropped;
        };
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::trace!("Frame {} dropped, previous frame still in flight", frame.timestamp);
            return SubmitStatus::Dropped;
        }
        match send.job_tx.try_send(Box::new(PipelineJob { outputs, frame })) {
            Ok(()) => SubmitStatus::Accepted,
            Err(_) => {
                self.in_flight.store(false, Ordering::Release);
                SubmitStatus::Dropped
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// `false` once the worker thread has stopped or exited.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Results discarded because a newer one arrived before they were collected.
    pub fn replaced_results(&self) -> usize {
        self.replaced.load(Ordering::Acquire)
    }

    pub fn try_recv(&self) -> Option<anyhow::Result<Y>> {
        self.send.as_ref()?.det_rx.try_recv().ok().map(|y| *y)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<anyhow::Result<Y>> {
        self.send.as_ref()?.det_rx.recv_timeout(timeout).ok().map(|y| *y)
    }

    /// Waits for the in-flight frame, frees the current model's buffers, then loads the new model.
    ///
    /// If loading fails no model stays loaded and submitted frames report [`PostprocessError::NotLoaded`].
    /// Fails with [`PostprocessError::WorkerStopped`] once the worker thread is gone.
    pub fn switch_model(&self, config: &ModelConfig, shapes: &[Vec<usize>]) -> anyhow::Result<()> {
        loop {
            if !self.is_running() {
                return Err(PostprocessError::WorkerStopped.into());
            }
            if self
                .in_flight
                .compare_exchange_weak(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
            std::thread::yield_now();
        }

        let result = {
            let mut guard = self.pipeline.lock();
            if let Some(old) = guard.take() {
                log::info!("Releasing {}", old.config().model_name);
                drop(old);
            }
            BvrPipeline::new(config, shapes).map(|p| {
                *guard = Some(p);
            })
        };

        self.in_flight.store(false, Ordering::Release);
        result
    }

    /// Runs `f` on the loaded pipeline, e.g. to read its layout or timings.
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&BvrPipeline) -> R) -> Option<R> {
        self.pipeline.lock().as_ref().map(f)
    }

    /// Finishes the in-flight frame and joins the worker thread. Later submits are dropped.
    pub fn stop(&mut self) {
        // closing the job channel ends the worker loop
        self.send.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Post-processing worker panicked");
            }
        }
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(
    state: DetectionState,
    pipeline: Arc<Mutex<Option<BvrPipeline>>>,
    in_flight: Arc<AtomicBool>,
    replaced: Arc<AtomicUsize>,
    profile: bool,
) {
    while let Ok(job) = state.job_rx.recv() {
        let result = {
            let mut guard = pipeline.lock();
            match guard.as_mut() {
                Some(p) => {
                    let xs: Vec<RawOutput> = job.outputs.iter().map(|o| o.as_raw()).collect();
                    p.forward(&xs, &job.frame, profile)
                }
                None => Err(PostprocessError::NotLoaded.into()),
            }
        };
        in_flight.store(false, Ordering::Release);
        if !publish(&state, Box::new(result), &replaced) {
            break;
        }
    }
    log::debug!("Post-processing worker stopped");
}

/// Queues a result, replacing one the caller hasn't collected yet. `false` once nobody listens.
fn publish(state: &DetectionState, result: Box<anyhow::Result<Y>>, replaced: &AtomicUsize) -> bool {
    match state.det_tx.try_send(result) {
        Ok(()) => true,
        Err(TrySendError::Full(result)) => {
            if state.stale_rx.try_recv().is_ok() {
                log::trace!("Uncollected result replaced by a newer frame");
            }
            if let Err(TrySendError::Disconnected(_)) = state.det_tx.try_send(result) {
                return false;
            }
            replaced.fetch_add(1, Ordering::AcqRel);
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
