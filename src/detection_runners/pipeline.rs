use std::time::{Duration, Instant};

use crate::common::{BvrDetection, BvrFrame, MaskImage, ModelConfig};
use crate::data::{
    ClassPalette, DynConf, FrameRate, PostprocessError, RawOutput, TimeCalc,
};
use crate::detection_processing::{
    cap_detections, decode_keypoints, nms, resolve_layout, AnchorDecoder, CandidateDetection,
    CoordinateMapper, DetectionHistory, LayoutDescriptor, MaskSynthesizer, TensorView,
};
use crate::detection_runners::inference_process::PostProcess;
use crate::detection_runners::Y;

/// One loaded model's post-processing state.
///
/// Every buffer is sized at load and reused for each frame. Instances are never shared
/// between models; switching models means dropping this and building a new one.
#[derive(Debug)]
pub struct BvrPipeline {
    config: ModelConfig,
    shapes: Vec<Vec<usize>>,
    layout: LayoutDescriptor,
    decoder: AnchorDecoder,
    palette: ClassPalette,
    box_scratch: Vec<f32>,
    proto_scratch: Vec<f32>,
    candidates: Vec<CandidateDetection>,
    masks: Option<MaskSynthesizer>,
    history: DetectionHistory,
    time: TimeCalc,
    frame_rate: FrameRate,
}

impl PostProcess for BvrPipeline {
    fn new(config: &ModelConfig, shapes: &[Vec<usize>]) -> anyhow::Result<Self> {
        config.validate()?;
        let layout = resolve_layout(shapes, config)?;

        let confs = DynConf::new(
            config.confidence_threshold,
            &config.per_class_thresholds,
            &config.labels,
            layout.num_classes,
        );
        let decoder = AnchorDecoder::new(&layout, confs, config.score_mode, config.min_box_size);
        let masks = layout
            .proto
            .map(|proto| MaskSynthesizer::new(proto, config.mask_threshold));

        log::info!(
            "Loaded {}: {} layout, {} features x {} anchors, {} classes ({} active), objectness: {}, mask coeffs: {}, keypoints: {}",
            if config.model_name.is_empty() { "model" } else { config.model_name.as_str() },
            layout.kind.name(),
            layout.feature_count,
            layout.anchor_count,
            layout.num_classes,
            layout.active_classes,
            layout.has_objectness,
            layout.mask_coeff_len,
            layout.keypoint_count,
        );

        Ok(Self {
            box_scratch: Vec::with_capacity(layout.box_len()),
            proto_scratch: Vec::with_capacity(layout.proto.map(|p| p.len()).unwrap_or(0)),
            candidates: Vec::with_capacity(layout.anchor_count),
            palette: ClassPalette::new(&config.class_colours),
            history: DetectionHistory::new(config.history_depth),
            config: config.clone(),
            shapes: shapes.to_vec(),
            layout,
            decoder,
            masks,
            time: TimeCalc::default(),
            frame_rate: FrameRate::default(),
        })
    }

    fn decode(&mut self, xs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<usize> {
        self.check_outputs(xs)?;

        let n = self.layout.box_len();
        let raw = &xs[0];
        raw.dequantize(n, &mut self.box_scratch);
        let data = raw.as_f32(&self.box_scratch, n);
        let view = TensorView::new(data, self.layout.feature_count, self.layout.anchor_count, self.layout.anchors_position)?;
        let mapper = CoordinateMapper::for_frame(frame, &self.config);

        self.decoder.decode_into(&view, &mapper, frame, &mut self.candidates);
        Ok(self.candidates.len())
    }

    fn suppress(&mut self, xs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<Vec<BvrDetection>> {
        nms(&mut self.candidates, self.config.effective_iou_threshold(), self.config.nms_mode);
        cap_detections(&mut self.candidates, self.config.max_detections);

        let n = self.layout.box_len();
        let data = xs[0].as_f32(&self.box_scratch, n);
        let view = TensorView::new(data, self.layout.feature_count, self.layout.anchor_count, self.layout.anchors_position)?;
        let mapper = CoordinateMapper::for_frame(frame, &self.config);

        let (config, layout) = (&self.config, &self.layout);
        let detections = self
            .candidates
            .drain(..)
            .map(|c| {
                let mut det = BvrDetection::new(c.class_id, c.bbox, Some(config.label_for(c.class_id)), c.confidence);
                det.mask_coeffs = c.mask_coeffs;
                if layout.has_keypoints() {
                    det.keypoints = Some(decode_keypoints(&view, c.anchor, layout, &mapper));
                }
                det.last_inference_time = frame.timestamp;
                det
            })
            .collect::<Vec<_>>();

        if log::log_enabled!(log::Level::Debug) {
            detections.iter().for_each(BvrDetection::print_detection);
        }
        Ok(detections)
    }

    fn synthesize(&mut self, xs: &[RawOutput], frame: &BvrFrame, detections: &[BvrDetection]) -> anyhow::Result<Option<MaskImage>> {
        let Some(masks) = self.masks.as_mut() else {
            return Ok(None);
        };
        if detections.is_empty() {
            return Ok(None);
        }

        let proto = &xs[1];
        let n = masks.shape().len();
        proto.dequantize(n, &mut self.proto_scratch);
        masks.load_proto(proto.as_f32(&self.proto_scratch, n));
        let mask = masks
            .synthesize(detections)
            .upscale(frame.img_width, frame.img_height, self.config.mask_upscale)?;
        Ok(Some(mask))
    }

    fn smooth(&mut self, frame: &BvrFrame, detections: Vec<BvrDetection>, mask: Option<MaskImage>) -> Y {
        if let Some(fps) = self.frame_rate.tick(Instant::now()) {
            log::debug!("Post-processing at {:.1} fps", fps);
        }

        let y = Y::default().with_timestamp(frame.timestamp);
        if self.history.depth() == 0 {
            return y.with_detections(detections).with_mask(mask);
        }

        let has_detections = !detections.is_empty();
        self.history.push(frame.timestamp, detections);
        let mask = self.history.hold_mask(has_detections, mask);
        y.with_detections(self.history.smoothed()).with_mask(mask)
    }

    fn record_time(&mut self, stage: usize, elapsed: Duration) {
        self.time.add_or_push(stage, elapsed);
    }

    fn print_time(&self) {
        log::info!("Avg: {:?} ({})", self.time.avg(), self.time.summary());
    }
}

impl BvrPipeline {
    fn check_outputs(&self, xs: &[RawOutput]) -> Result<(), PostprocessError> {
        if xs.len() != self.shapes.len() {
            return Err(PostprocessError::OutputCount(xs.len()));
        }
        for (raw, shape) in xs.iter().zip(&self.shapes) {
            if &raw.shape != shape {
                return Err(PostprocessError::ShapeMismatch {
                    shape: raw.shape.clone(),
                    expected: shape.iter().product(),
                    actual: raw.data.len(),
                });
            }
            raw.check_len()?;
        }
        Ok(())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn palette(&self) -> &ClassPalette {
        &self.palette
    }

    /// Box colour for a detection, from the configured class colours.
    pub fn colour_for(&self, detection: &BvrDetection) -> u32 {
        self.palette.colour_for(detection.class_id, &detection.get_label())
    }

    pub fn history(&self) -> &DetectionHistory {
        &self.history
    }

    pub fn time(&self) -> &TimeCalc {
        &self.time
    }

    pub fn fps(&self) -> f32 {
        self.frame_rate.fps()
    }

    /// Forgets smoothing history and timing, keeping the buffers.
    pub fn reset(&mut self) {
        self.history.clear();
        self.time.clear();
        self.frame_rate.reset(Instant::now());
    }
}
