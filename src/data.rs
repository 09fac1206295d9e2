mod class_palette;
mod coordinate_space;
mod dyn_conf;
mod label_threshold;
mod mask_upscale;
mod nms_mode;
mod postprocess_error;
mod raw_output;
mod score_mode;
mod time_calc;
pub mod send_channels;

pub use class_palette::*;
pub use coordinate_space::*;
pub use dyn_conf::DynConf;
pub use label_threshold::LabelThreshold;
pub use mask_upscale::MaskUpscale;
pub use nms_mode::NmsMode;
pub use postprocess_error::PostprocessError;
pub use raw_output::*;
pub use score_mode::ScoreMode;
pub use time_calc::*;
