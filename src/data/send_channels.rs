use crate::common::BvrFrame;
use crate::data::OwnedOutput;
use crate::detection_runners::Y;

/// One frame's worth of raw outputs handed to the worker.
#[derive(Debug)]
pub struct PipelineJob {
    pub outputs: Vec<OwnedOutput>,
    pub frame: BvrFrame,
}

/// Worker-side ends of the channels.
#[derive(Debug)]
pub struct DetectionState {
    pub job_rx: crossbeam_channel::Receiver<Box<PipelineJob>>,
    pub det_tx: crossbeam_channel::Sender<Box<anyhow::Result<Y>>>,
    /// Clears an uncollected result so a newer one can take its slot.
    pub stale_rx: crossbeam_channel::Receiver<Box<anyhow::Result<Y>>>,
}

/// Caller-side ends of the channels.
#[derive(Debug)]
pub struct SendState {
    pub job_tx: crossbeam_channel::Sender<Box<PipelineJob>>,
    pub det_rx: crossbeam_channel::Receiver<Box<anyhow::Result<Y>>>,
}

/// Bounded(1) job and result queues. At most one frame and one result are ever held.
pub fn pipeline_channels() -> (SendState, DetectionState) {
    let (job_tx, job_rx) = crossbeam_channel::bounded(1);
    let (det_tx, det_rx) = crossbeam_channel::bounded(1);
    let stale_rx = det_rx.clone();
    (SendState { job_tx, det_rx }, DetectionState { job_rx, det_tx, stale_rx })
}
