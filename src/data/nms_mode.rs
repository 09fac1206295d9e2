use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NmsMode {
    /// Any two overlapping boxes compete, whatever their class.
    #[default]
    Global,
    /// Only boxes of the same class compete.
    ClassPartitioned,
}

impl NmsMode {
    pub fn name(&self) -> String {
        match self {
            Self::Global => "global".to_string(),
            Self::ClassPartitioned => "class-partitioned".to_string(),
        }
    }

    pub fn from(mode: String) -> NmsMode {
        match mode.to_lowercase().replace('_', "-").as_str() {
            "class-partitioned" | "per-class" | "class" => NmsMode::ClassPartitioned,
            _ => NmsMode::Global,
        }
    }
}
