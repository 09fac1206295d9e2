#![allow(dead_code)]

use bvr_postprocess::common::{BvrBox, BvrDetection};

/// `(1, features, anchors)` buffer from per-anchor rows.
pub(crate) fn features_first(rows: &[Vec<f32>]) -> (Vec<usize>, Vec<f32>) {
    let anchors = rows.len();
    let features = rows[0].len();
    let mut data = vec![0.; features * anchors];
    for (i, row) in rows.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            data[j * anchors + i] = *v;
        }
    }
    (vec![1, features, anchors], data)
}

/// `(1, anchors, features)` buffer from per-anchor rows.
pub(crate) fn anchors_first(rows: &[Vec<f32>]) -> (Vec<usize>, Vec<f32>) {
    (vec![1, rows.len(), rows[0].len()], rows.concat())
}

/// Rows that never pass gating.
pub(crate) fn background(features: usize, anchors: usize) -> Vec<Vec<f32>> {
    vec![vec![0.; features]; anchors]
}

pub(crate) fn logit(p: f32) -> f32 {
    (p / (1. - p)).ln()
}

pub(crate) fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

pub(crate) fn detection(class_id: usize, x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> BvrDetection {
    BvrDetection::new(class_id, BvrBox::new(x1, y1, x2, y2), Some(format!("class_{class_id}")), confidence)
}
