use std::collections::VecDeque;

use crate::common::{BvrDetection, MaskImage, MAX_HISTORY_DEPTH};

/// Short sliding window of recent frames for best-effort smoothing.
///
/// Not a tracker: detections are matched to the nearest same-class box in each older frame,
/// with no identity carried beyond the window.
#[derive(Debug, Clone, Default)]
pub struct DetectionHistory {
    depth: usize,
    /// Newest first.
    frames: VecDeque<(u128, Vec<BvrDetection>)>,
    last_mask: Option<MaskImage>,
}

impl DetectionHistory {
    pub fn new(depth: usize) -> Self {
        let depth = depth.min(MAX_HISTORY_DEPTH);
        Self {
            depth,
            frames: VecDeque::with_capacity(depth),
            last_mask: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Records a frame, evicting the oldest one past `depth`.
    pub fn push(&mut self, timestamp: u128, detections: Vec<BvrDetection>) {
        if self.depth == 0 {
            return;
        }
        self.frames.push_front((timestamp, detections));
        self.frames.truncate(self.depth);
    }

    pub fn newest(&self) -> Option<&(u128, Vec<BvrDetection>)> {
        self.frames.front()
    }

    /// Newest frame's detections with box and confidence averaged over their matches.
    pub fn smoothed(&self) -> Vec<BvrDetection> {
        let Some((_, latest)) = self.frames.front() else {
            return vec![];
        };

        latest
            .iter()
            .map(|det| {
                let (mut x1, mut y1, mut x2, mut y2) = det.bbox.xy1_xy2();
                let mut confidence = det.confidence;
                let mut matches = 1.;

                for (_, older) in self.frames.iter().skip(1) {
                    let closest = older
                        .iter()
                        .filter(|o| o.class_id == det.class_id)
                        .min_by(|a, b| {
                            a.bbox
                                .center_distance_sq(&det.bbox)
                                .total_cmp(&b.bbox.center_distance_sq(&det.bbox))
                        });
                    if let Some(o) = closest {
                        x1 += o.bbox.x1;
                        y1 += o.bbox.y1;
                        x2 += o.bbox.x2;
                        y2 += o.bbox.y2;
                        confidence += o.confidence;
                        matches += 1.;
                    }
                }

                let mut smoothed = det.clone();
                smoothed.bbox = smoothed.bbox.with_x1y1_x2y2(x1 / matches, y1 / matches, x2 / matches, y2 / matches);
                smoothed.confidence = confidence / matches;
                smoothed
            })
            .collect()
    }

    /// Mask to show for the current frame.
    ///
    /// A fresh mask is remembered and returned. A frame without detections gets the
    /// remembered mask once; the following empty frame gets nothing.
    pub fn hold_mask(&mut self, has_detections: bool, mask: Option<MaskImage>) -> Option<MaskImage> {
        if has_detections {
            self.last_mask = mask.clone();
            return mask;
        }
        self.last_mask.take()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.last_mask = None;
    }
}
