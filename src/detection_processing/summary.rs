use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::common::BvrDetection;

/// Detection count per label.
pub fn detection_summary(detections: &[BvrDetection]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for det in detections {
        *counts.entry(det.get_label()).or_insert(0) += 1;
    }
    counts
}

/// Safe/unsafe split of a frame's detections, e.g. helmet vs bare head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub total: usize,
    pub safe: usize,
    pub unsafe_count: usize,
    /// Percentage of safe detections, `0` when there are none.
    pub compliance_rate: f32,
}

impl ComplianceStats {
    /// A detection is safe when its label matches one of `safe_labels`, ignoring case.
    pub fn from_detections(detections: &[BvrDetection], safe_labels: &[&str]) -> Self {
        let total = detections.len();
        let safe = detections
            .iter()
            .filter(|d| {
                let label = d.get_label();
                safe_labels.iter().any(|s| s.eq_ignore_ascii_case(&label))
            })
            .count();
        let compliance_rate = if total > 0 {
            safe as f32 / total as f32 * 100.
        } else {
            0.
        };

        Self {
            total,
            safe,
            unsafe_count: total - safe,
            compliance_rate,
        }
    }
}
