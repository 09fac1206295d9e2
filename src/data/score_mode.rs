use serde::{Deserialize, Serialize};

/// How an objectness channel combines with the best class score.
///
/// Ignored for layouts without objectness.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    ClassOnly,
    #[default]
    ObjectnessProduct,
    /// Product of objectness and class score, except when objectness is under `floor`
    /// while the class score is over it, in which case the class score is used as is.
    ObjectnessProductWithFallback { floor: f32 },
}

impl ScoreMode {
    pub fn name(&self) -> String {
        match self {
            Self::ClassOnly => "class_only".to_string(),
            Self::ObjectnessProduct => "objectness_product".to_string(),
            Self::ObjectnessProductWithFallback { .. } => "objectness_product_with_fallback".to_string(),
        }
    }

    pub fn combine(&self, objectness: Option<f32>, class_score: f32) -> f32 {
        let objectness = match objectness {
            Some(o) => o,
            None => return class_score,
        };
        match self {
            Self::ClassOnly => class_score,
            Self::ObjectnessProduct => objectness * class_score,
            Self::ObjectnessProductWithFallback { floor } => {
                if objectness < *floor && class_score > *floor {
                    class_score
                } else {
                    objectness * class_score
                }
            }
        }
    }
}
