mod bvr_box;
mod bvr_detection;
mod bvr_frame;
mod bvr_keypoint;
mod bvr_mask;
mod model_config;
mod model_preset;

pub use bvr_box::*;
pub use bvr_detection::*;
pub use bvr_frame::*;
pub use bvr_keypoint::*;
pub use bvr_mask::*;
pub use model_config::*;
pub use model_preset::*;
