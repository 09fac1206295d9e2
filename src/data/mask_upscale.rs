use serde::{Deserialize, Serialize};

/// Resampling used when bringing a proto-resolution mask up to source resolution.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskUpscale {
    /// Keep the mask at proto resolution.
    None,
    #[default]
    Nearest,
    Bilinear,
}

impl MaskUpscale {
    pub fn name(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Nearest => "nearest".to_string(),
            Self::Bilinear => "bilinear".to_string(),
        }
    }

    pub fn from(mode: String) -> MaskUpscale {
        match mode.to_lowercase().as_str() {
            "none" => MaskUpscale::None,
            "bilinear" => MaskUpscale::Bilinear,
            _ => MaskUpscale::Nearest,
        }
    }
}
