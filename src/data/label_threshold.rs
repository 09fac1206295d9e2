use serde::{Deserialize, Serialize};

/// A confidence threshold for one class, keyed by id, by label, or both.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelThreshold {
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub label: Option<String>,
    pub threshold: f32,
}

impl LabelThreshold {
    pub fn new(id: u16, label: String, threshold: f32) -> Self {
        Self {
            id: Some(id),
            label: Some(label),
            threshold,
        }
    }

    pub fn for_id(id: u16, threshold: f32) -> Self {
        Self {
            id: Some(id),
            label: None,
            threshold,
        }
    }

    pub fn for_label(label: &str, threshold: f32) -> Self {
        Self {
            id: None,
            label: Some(label.to_string()),
            threshold,
        }
    }

    /// Returns true when `conf` does not reach this threshold.
    pub fn check_conf(&self, conf: f32) -> bool {
        self.threshold > conf
    }

    pub fn matches_id(&self, id: usize) -> bool {
        self.id.map(|x| x as usize == id).unwrap_or(false)
    }

    /// Labels compare case-insensitively.
    pub fn matches_label(&self, label: &str) -> bool {
        match &self.label {
            Some(l) => l.eq_ignore_ascii_case(label),
            None => false,
        }
    }

    pub fn check_label_conf(&self, other: &LabelThreshold) -> bool {
        if self.label != other.label || self.id != other.id {
            return false;
        }
        self.threshold >= other.threshold
    }
}
