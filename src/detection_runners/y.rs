//! File/code adapted from https://github.com/jamjamjon/usls

use crate::common::{BvrDetection, MaskImage};

/// Post-processing result of one frame: detections, the composited instance mask for
/// segmentation models, and the frame's timestamp.
#[derive(Clone, PartialEq, Default)]
pub struct Y {
    detections: Option<Vec<BvrDetection>>,
    mask: Option<MaskImage>,
    timestamp: u128,
}

impl std::fmt::Debug for Y {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut f = f.debug_struct("Y");
        if let Some(x) = &self.detections {
            if !x.is_empty() {
                f.field("BvrDetections", &x);
            }
        }
        if let Some(x) = &self.mask {
            f.field("Mask", &format_args!("{}x{} ({} on)", x.width, x.height, x.on_count()));
        }
        f.finish()
    }
}

impl Y {
    pub fn with_detections(mut self, detections: Vec<BvrDetection>) -> Self {
        self.detections = Some(detections);
        self
    }

    pub fn with_mask(mut self, mask: Option<MaskImage>) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u128) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// `None` until the pipeline has run the suppression stage.
    pub fn detections(&self) -> Option<&Vec<BvrDetection>> {
        self.detections.as_ref()
    }

    /// Detections as a slice, empty when none were set.
    pub fn detections_or_empty(&self) -> &[BvrDetection] {
        self.detections.as_deref().unwrap_or(&[])
    }

    pub fn mask(&self) -> Option<&MaskImage> {
        self.mask.as_ref()
    }

    pub fn timestamp(&self) -> u128 {
        self.timestamp
    }

    pub fn into_parts(self) -> (Vec<BvrDetection>, Option<MaskImage>) {
        (self.detections.unwrap_or_default(), self.mask)
    }
}
