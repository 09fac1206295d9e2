use std::time::Instant;

use crate::common::{BvrDetection, BvrFrame, MaskImage, ModelConfig};
use crate::data::RawOutput;
use crate::detection_runners::Y;
use crate::utils;

/// Stages of turning raw model outputs into a frame result.
pub trait PostProcess: Sized {
    /// Resolves the layout and allocates every per-model buffer.
    fn new(config: &ModelConfig, shapes: &[Vec<usize>]) -> anyhow::Result<Self>;

    /// Decodes anchors into candidates held by the instance. Returns the candidate count.
    fn decode(&mut self, xs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<usize>;

    /// Suppresses overlapping candidates and returns the surviving detections.
    fn suppress(&mut self, xs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<Vec<BvrDetection>>;

    /// Builds the instance mask for segmentation models.
    fn synthesize(&mut self, xs: &[RawOutput], frame: &BvrFrame, detections: &[BvrDetection]) -> anyhow::Result<Option<MaskImage>>;

    /// Feeds the temporal aggregator and assembles the frame result.
    fn smooth(&mut self, frame: &BvrFrame, detections: Vec<BvrDetection>, mask: Option<MaskImage>) -> Y;

    /// Records how long a stage took.
    fn record_time(&mut self, stage: usize, elapsed: std::time::Duration);

    /// Executes the full pipeline.
    fn run(&mut self, xs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<Y> {
        self.decode(xs, frame)?;
        let detections = self.suppress(xs, frame)?;
        let mask = self.synthesize(xs, frame, &detections)?;
        Ok(self.smooth(frame, detections, mask))
    }

    /// Executes the full pipeline, timing each stage.
    fn forward(&mut self, xs: &[RawOutput], frame: &BvrFrame, profile: bool) -> anyhow::Result<Y> {
        use crate::data::{STAGE_DECODE, STAGE_MASK, STAGE_NMS, STAGE_SMOOTH};

        let detect_time = Instant::now();
        let mut _detect_elapsed = detect_time.elapsed();

        let t_decode = Instant::now();
        let n = self.decode(xs, frame)?;
        let t_decode = t_decode.elapsed();
        _detect_elapsed = utils::trace(profile, "TIME", "Decode", detect_time, _detect_elapsed);

        let t_nms = Instant::now();
        let detections = self.suppress(xs, frame)?;
        let t_nms = t_nms.elapsed();
        _detect_elapsed = utils::trace(profile, "TIME", "NMS", detect_time, _detect_elapsed);

        let t_mask = Instant::now();
        let mask = self.synthesize(xs, frame, &detections)?;
        let t_mask = t_mask.elapsed();
        _detect_elapsed = utils::trace(profile, "TIME", "Mask", detect_time, _detect_elapsed);

        let t_smooth = Instant::now();
        log::debug!("{} candidates, {} detections", n, detections.len());
        let y = self.smooth(frame, detections, mask);
        let t_smooth = t_smooth.elapsed();
        _detect_elapsed = utils::trace(profile, "TIME", "Smoothing", detect_time, _detect_elapsed);

        self.record_time(STAGE_DECODE, t_decode);
        self.record_time(STAGE_NMS, t_nms);
        self.record_time(STAGE_MASK, t_mask);
        self.record_time(STAGE_SMOOTH, t_smooth);

        if profile {
            log::info!("> Decode: {t_decode:?} | NMS: {t_nms:?} | Mask: {t_mask:?} | Smoothing: {t_smooth:?}");
        }

        Ok(y)
    }

    fn print_time(&self);
}
