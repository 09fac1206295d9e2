use serde::{Deserialize, Serialize};

/// Joint pairs of the 17-point COCO skeleton, for renderers.
pub const SKELETON: [(usize, usize); 16] = [
    // head
    (0, 1), (0, 2),
    (1, 3), (2, 4),
    // torso
    (5, 6),
    (5, 11), (6, 12),
    (11, 12),
    // arms
    (5, 7), (7, 9),
    (6, 8), (8, 10),
    // legs
    (11, 13), (13, 15),
    (12, 14), (14, 16),
];

/// ARGB colour per COCO keypoint index: head red, left limbs blue/cyan, right limbs green/magenta.
pub const KEYPOINT_COLOURS: [u32; 17] = [
    0xFFFF0000, 0xFFFF0000, 0xFFFF0000, 0xFFFF0000, 0xFFFF0000,
    0xFF0000FF, 0xFF00FF00,
    0xFF0000FF, 0xFF00FF00,
    0xFF0000FF, 0xFF00FF00,
    0xFF00FFFF, 0xFFFF00FF,
    0xFF00FFFF, 0xFFFF00FF,
    0xFF00FFFF, 0xFFFF00FF,
];

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvrKeypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl BvrKeypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Keypoints at or below the threshold stay in the result but should not be drawn.
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

/// Skeleton edges whose two ends are both visible.
pub fn visible_edges(keypoints: &[BvrKeypoint], threshold: f32) -> Vec<(usize, usize)> {
    SKELETON
        .iter()
        .copied()
        .filter(|&(a, b)| {
            match (keypoints.get(a), keypoints.get(b)) {
                (Some(ka), Some(kb)) => ka.is_visible(threshold) && kb.is_visible(threshold),
                _ => false,
            }
        })
        .collect()
}
