use std::collections::HashMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::utils;
use crate::data::{
    CoordinateSpace, LabelThreshold, MaskUpscale, NmsMode, PostprocessError, ScoreMode,
};
use crate::detection_processing::AnchorsPosition;

/// Deepest history the temporal aggregator keeps.
pub const MAX_HISTORY_DEPTH: usize = 3;

/// Everything the pipeline reads at model load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_name: String,
    pub labels: Vec<String>,
    pub input_width: u32,
    pub input_height: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub per_class_thresholds: Vec<LabelThreshold>,
    pub nms_mode: NmsMode,
    /// Effective NMS threshold is `iou_threshold * suppression_tightening_factor`.
    pub suppression_tightening_factor: f32,
    pub score_mode: ScoreMode,
    /// Forces the objectness channel on or off when the label count can't settle it.
    pub has_objectness: Option<bool>,
    pub keypoint_count: usize,
    pub keypoint_visibility_threshold: f32,
    pub coordinate_space: CoordinateSpace,
    /// Forces the detection tensor orientation instead of inferring it from the shape.
    pub anchors_position: Option<AnchorsPosition>,
    pub mask_threshold: f32,
    pub mask_upscale: MaskUpscale,
    /// Boxes narrower or shorter than this many source pixels are dropped. `0` disables.
    pub min_box_size: f32,
    pub max_detections: Option<usize>,
    /// `0` disables temporal smoothing.
    pub history_depth: usize,
    /// ARGB colours keyed by label.
    pub class_colours: HashMap<String, u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            labels: vec![],
            input_width: 640,
            input_height: 640,
            confidence_threshold: 0.5,
            iou_threshold: 0.45,
            per_class_thresholds: vec![],
            nms_mode: NmsMode::Global,
            suppression_tightening_factor: 1.0,
            score_mode: ScoreMode::ObjectnessProduct,
            has_objectness: None,
            keypoint_count: 17,
            keypoint_visibility_threshold: 0.5,
            coordinate_space: CoordinateSpace::Auto,
            anchors_position: None,
            mask_threshold: 0.5,
            mask_upscale: MaskUpscale::Nearest,
            min_box_size: 0.,
            max_detections: None,
            history_depth: 0,
            class_colours: HashMap::new(),
        }
    }
}

impl ModelConfig {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: ModelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), PostprocessError> {
        let unit = |name: &str, v: f32| -> Result<(), PostprocessError> {
            if !(0.0..=1.0).contains(&v) {
                return Err(PostprocessError::InvalidConfig(format!("{name} must be in [0, 1], got {v}")));
            }
            Ok(())
        };

        unit("confidence_threshold", self.confidence_threshold)?;
        unit("iou_threshold", self.iou_threshold)?;
        unit("mask_threshold", self.mask_threshold)?;
        unit("keypoint_visibility_threshold", self.keypoint_visibility_threshold)?;
        for t in &self.per_class_thresholds {
            unit("per-class threshold", t.threshold)?;
            if t.id.is_none() && t.label.is_none() {
                return Err(PostprocessError::InvalidConfig(
                    "per-class threshold needs an id or a label".to_string(),
                ));
            }
        }
        if !(self.suppression_tightening_factor > 0. && self.suppression_tightening_factor <= 1.) {
            return Err(PostprocessError::InvalidConfig(format!(
                "suppression_tightening_factor must be in (0, 1], got {}",
                self.suppression_tightening_factor
            )));
        }
        if let ScoreMode::ObjectnessProductWithFallback { floor } = self.score_mode {
            unit("score fallback floor", floor)?;
        }
        if self.input_width == 0 || self.input_height == 0 {
            return Err(PostprocessError::InvalidConfig("model input dimensions must be non-zero".to_string()));
        }
        if self.history_depth > MAX_HISTORY_DEPTH {
            return Err(PostprocessError::InvalidConfig(format!(
                "history_depth must be at most {MAX_HISTORY_DEPTH}, got {}", self.history_depth
            )));
        }
        if self.min_box_size < 0. || !self.min_box_size.is_finite() {
            return Err(PostprocessError::InvalidConfig("min_box_size must be a finite non-negative value".to_string()));
        }
        Ok(())
    }

    /// Effective IoU threshold handed to NMS.
    pub fn effective_iou_threshold(&self) -> f32 {
        self.iou_threshold * self.suppression_tightening_factor
    }

    pub fn declared_classes(&self) -> Option<usize> {
        match self.labels.len() {
            0 => None,
            n => Some(n),
        }
    }

    pub fn label_for(&self, class_id: usize) -> String {
        self.labels
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|x| x.to_string()).collect();
        self
    }

    pub fn with_label_strings(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Loads labels from a text file, one per line.
    pub fn with_labels_file<P: AsRef<Path>>(mut self, path: P) -> anyhow::Result<Self> {
        self.labels = utils::file_to_vec(path)?;
        Ok(self)
    }

    /// Loads labels from a `{0: 'person', 1: 'bicycle'}` metadata string.
    pub fn with_labels_metadata(mut self, names: &str) -> anyhow::Result<Self> {
        self.labels = utils::parse_names_metadata(names)?;
        Ok(self)
    }

    pub fn with_input_size(mut self, width: u32, height: u32) -> Self {
        self.input_width = width;
        self.input_height = height;
        self
    }

    pub fn with_confidence_threshold(mut self, x: f32) -> Self {
        self.confidence_threshold = x;
        self
    }

    pub fn with_iou_threshold(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_class_threshold(mut self, threshold: LabelThreshold) -> Self {
        self.per_class_thresholds.push(threshold);
        self
    }

    pub fn with_nms_mode(mut self, mode: NmsMode) -> Self {
        self.nms_mode = mode;
        self
    }

    pub fn with_tightening_factor(mut self, x: f32) -> Self {
        self.suppression_tightening_factor = x;
        self
    }

    pub fn with_score_mode(mut self, mode: ScoreMode) -> Self {
        self.score_mode = mode;
        self
    }

    pub fn with_objectness(mut self, x: bool) -> Self {
        self.has_objectness = Some(x);
        self
    }

    pub fn with_keypoints(mut self, count: usize, visibility_threshold: f32) -> Self {
        self.keypoint_count = count;
        self.keypoint_visibility_threshold = visibility_threshold;
        self
    }

    pub fn with_coordinate_space(mut self, space: CoordinateSpace) -> Self {
        self.coordinate_space = space;
        self
    }

    pub fn with_anchors_position(mut self, position: AnchorsPosition) -> Self {
        self.anchors_position = Some(position);
        self
    }

    pub fn with_mask_threshold(mut self, x: f32) -> Self {
        self.mask_threshold = x;
        self
    }

    pub fn with_mask_upscale(mut self, mode: MaskUpscale) -> Self {
        self.mask_upscale = mode;
        self
    }

    pub fn with_min_box_size(mut self, x: f32) -> Self {
        self.min_box_size = x;
        self
    }

    pub fn with_max_detections(mut self, x: usize) -> Self {
        self.max_detections = Some(x);
        self
    }

    pub fn with_history_depth(mut self, x: usize) -> Self {
        self.history_depth = x;
        self
    }

    pub fn with_class_colour(mut self, label: &str, argb: u32) -> Self {
        self.class_colours.insert(label.to_string(), argb);
        self
    }

    pub fn to_string(&self) -> String {
        format!("Model: {}\n\
        Labels: {}\n\
        Model Input Resolution: {}x{}\n\
        Confidence Threshold: {} ({} per-class overrides)\n\
        IoU Threshold: {} x {} ({})\n\
        Coordinate Space: {}",
                self.model_name, self.labels.len(),
                self.input_width, self.input_height,
                self.confidence_threshold, self.per_class_thresholds.len(),
                self.iou_threshold, self.suppression_tightening_factor, self.nms_mode.name(),
                self.coordinate_space.name())
    }
}
