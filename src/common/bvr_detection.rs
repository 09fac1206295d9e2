use serde::{Deserialize, Serialize};
use crate::common::{BvrBox, BvrKeypoint};
use crate::detection_processing::nms::Nms;

/// A surviving detection in source pixel space.
///
/// Mask coefficients and keypoints are carried through from the decoder unchanged.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BvrDetection {
    pub class_id: usize,
    pub bbox: BvrBox,
    pub label: Option<String>,
    pub confidence: f32,
    pub mask_coeffs: Option<Vec<f32>>,
    pub keypoints: Option<Vec<BvrKeypoint>>,
    /// Timestamp of the frame this came from.
    pub last_inference_time: u128,
}

impl Nms for BvrDetection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn class_id(&self) -> usize {
        self.class_id
    }
}

impl BvrDetection {
    pub fn new(class_id: usize, bbox: BvrBox, label: Option<String>, confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            label,
            confidence,
            ..Default::default()
        }
    }

    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BvrBox::new(x1, y1, x2, y2);
        self
    }

    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = BvrBox::default().with_cxcy_wh(cx, cy, w, h);
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: usize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_mask_coeffs(mut self, coeffs: Vec<f32>) -> Self {
        self.mask_coeffs = Some(coeffs);
        self
    }

    pub fn with_keypoints(mut self, keypoints: Vec<BvrKeypoint>) -> Self {
        self.keypoints = Some(keypoints);
        self
    }

    /// The label, or `"Unknown"` when none was resolved.
    pub fn get_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn print_detection(&self) {
        log::debug!(
            "Detection: {} ({}) {:.2} @ [{:.1}, {:.1}, {:.1}, {:.1}] kps: {} mask: {}",
            self.get_label(),
            self.class_id,
            self.confidence,
            self.bbox.x1, self.bbox.y1, self.bbox.x2, self.bbox.y2,
            self.keypoints.as_ref().map_or(0, Vec::len),
            self.mask_coeffs.is_some(),
        );
    }
}
