use serde::{Deserialize, Serialize};

/// Box centers at or below this value are read as normalized coordinates.
pub const NORMALIZED_BOX_LIMIT: f32 = 1.5;

/// Keypoints at or below this value are read as normalized coordinates.
pub const NORMALIZED_KEYPOINT_LIMIT: f32 = 1.0;

/// How decoded geometry relates to the source image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Guess per anchor with [`is_normalized`].
    #[default]
    Auto,
    /// Values are in `[0, 1]` of the source image.
    Normalized,
    /// Values are in model-input pixels (e.g. 0..640).
    ModelInput,
}

impl CoordinateSpace {
    pub fn name(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::Normalized => "normalized".to_string(),
            Self::ModelInput => "model_input".to_string(),
        }
    }

    pub fn from(space: String) -> CoordinateSpace {
        match space.to_lowercase().as_str() {
            "normalized" | "normalised" => CoordinateSpace::Normalized,
            "model_input" | "pixel" | "pixels" => CoordinateSpace::ModelInput,
            _ => CoordinateSpace::Auto,
        }
    }

    /// Resolves whether the point `(x, y)` should be scaled as normalized.
    pub fn treats_as_normalized(&self, x: f32, y: f32, limit: f32) -> bool {
        match self {
            Self::Auto => is_normalized(x, y, limit),
            Self::Normalized => true,
            Self::ModelInput => false,
        }
    }
}

/// The compatibility heuristic: a point whose coordinates are both at or below `limit` is
/// assumed normalized. A genuine pixel-space coordinate under the limit is misread, so models
/// with known conventions should set [`CoordinateSpace::Normalized`] or
/// [`CoordinateSpace::ModelInput`] instead.
pub fn is_normalized(x: f32, y: f32, limit: f32) -> bool {
    x <= limit && y <= limit
}
