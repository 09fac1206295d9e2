use crate::common::ModelConfig;
use crate::data::{LabelThreshold, NmsMode, ScoreMode};

/// Known fine-tuned models, each expressed as a [`ModelConfig`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ModelPreset {
    Grocery,
    Helmet,
    FireSmoke,
    Face,
    Dent,
    LicensePlate,
    BlinkDrowse,
    #[default] GeneralObject,
    OilSpill,
    TeaScanner,
    Pose,
    Segmentation,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 12] = [
        Self::Grocery,
        Self::Helmet,
        Self::FireSmoke,
        Self::Face,
        Self::Dent,
        Self::LicensePlate,
        Self::BlinkDrowse,
        Self::GeneralObject,
        Self::OilSpill,
        Self::TeaScanner,
        Self::Pose,
        Self::Segmentation,
    ];

    pub fn name(&self) -> String {
        match self {
            Self::Grocery => "Grocery Detection".to_string(),
            Self::Helmet => "Helmet Detection".to_string(),
            Self::FireSmoke => "Fire & Smoke Detection".to_string(),
            Self::Face => "Face Detection".to_string(),
            Self::Dent => "Dent Detection".to_string(),
            Self::LicensePlate => "License Plate Detection".to_string(),
            Self::BlinkDrowse => "Blink & Drowsiness Detection".to_string(),
            Self::GeneralObject => "General Object Detection".to_string(),
            Self::OilSpill => "Oil Spill Detection".to_string(),
            Self::TeaScanner => "Tea & Scanner Detection".to_string(),
            Self::Pose => "Pose Estimation".to_string(),
            Self::Segmentation => "Instance Segmentation".to_string(),
        }
    }

    pub fn from(preset: String) -> ModelPreset {
        let key: String = preset
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "grocery" | "grocerydetection" => ModelPreset::Grocery,
            "helmet" | "helmetdetection" => ModelPreset::Helmet,
            "firesmoke" | "firesmokedetection" | "fire" => ModelPreset::FireSmoke,
            "face" | "facedetection" => ModelPreset::Face,
            "dent" | "dentdetection" => ModelPreset::Dent,
            "licenseplate" | "licenseplatedetection" | "plate" => ModelPreset::LicensePlate,
            "blinkdrowse" | "blinkdrowsinessdetection" | "drowsiness" => ModelPreset::BlinkDrowse,
            "oilspill" | "oilspilldetection" => ModelPreset::OilSpill,
            "teascanner" | "teascannerdetection" => ModelPreset::TeaScanner,
            "pose" | "poseestimation" => ModelPreset::Pose,
            "segmentation" | "instancesegmentation" | "seg" => ModelPreset::Segmentation,
            _ => ModelPreset::GeneralObject,
        }
    }

    pub fn config(&self) -> ModelConfig {
        let base = ModelConfig::new(&self.name());
        match self {
            Self::Grocery | Self::TeaScanner => base,
            Self::Helmet => base
                .with_confidence_threshold(0.25)
                .with_nms_mode(NmsMode::ClassPartitioned)
                .with_score_mode(ScoreMode::ObjectnessProductWithFallback { floor: 0.3 })
                .with_class_threshold(LabelThreshold::for_label("helmet", 0.175))
                .with_class_threshold(LabelThreshold::for_label("head", 0.3))
                .with_class_colour("head", 0xFFFF0000)
                .with_class_colour("helmet", 0xFF00FF00)
                .with_class_colour("person", 0xFFFFA500),
            Self::FireSmoke => base
                .with_confidence_threshold(0.45)
                .with_score_mode(ScoreMode::ClassOnly)
                .with_class_colour("fire", 0xFFFF4500)
                .with_class_colour("smoke", 0xFF808080),
            Self::Face => base
                .with_confidence_threshold(0.45)
                .with_nms_mode(NmsMode::ClassPartitioned)
                .with_class_threshold(LabelThreshold::for_label("fire", 0.40))
                .with_class_threshold(LabelThreshold::for_label("smoke", 0.35))
                .with_class_threshold(LabelThreshold::for_label("person", 0.50))
                .with_class_threshold(LabelThreshold::for_label("face", 0.50))
                .with_class_colour("face", 0xFF00CED1),
            Self::Dent => base
                .with_confidence_threshold(0.4)
                .with_class_colour("dent", 0xFFDC143C)
                .with_class_colour("scratch", 0xFFFF8C00),
            Self::LicensePlate => base.with_class_colour("plate", 0xFFFFD700),
            Self::BlinkDrowse => base
                .with_class_colour("open_eyes", 0xFF00FF00)
                .with_class_colour("closed_eyes", 0xFFFF0000)
                .with_class_colour("yawn", 0xFFFFA500),
            Self::GeneralObject => base.with_confidence_threshold(0.45),
            Self::OilSpill => base.with_class_colour("oil", 0xFF8B4513),
            Self::Pose => base
                .with_labels(&["person"])
                .with_tightening_factor(0.3)
                .with_keypoints(17, 0.5),
            Self::Segmentation => base
                .with_confidence_threshold(0.25)
                .with_nms_mode(NmsMode::ClassPartitioned)
                .with_tightening_factor(0.7)
                .with_objectness(false)
                .with_history_depth(3),
        }
    }
}

impl From<ModelPreset> for ModelConfig {
    fn from(preset: ModelPreset) -> Self {
        preset.config()
    }
}
