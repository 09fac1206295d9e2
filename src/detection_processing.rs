pub mod anchor_decoder;
pub mod coordinate_mapper;
pub mod keypoint_decoder;
pub mod mask_synth;
pub mod nms;
pub mod output_layout;
pub mod summary;
pub mod temporal;
pub mod tensor_view;

pub use anchor_decoder::{AnchorDecoder, CandidateDetection};
pub use coordinate_mapper::CoordinateMapper;
pub use keypoint_decoder::decode_keypoints;
pub use mask_synth::{MaskSynthesizer, SigmoidLut};
pub use nms::{cap_detections, nms, Nms};
pub use output_layout::{resolve_layout, LayoutDescriptor, ModelKind, ProtoLayout, ProtoShape};
pub use summary::{detection_summary, ComplianceStats};
pub use temporal::DetectionHistory;
pub use tensor_view::{AnchorsPosition, TensorView};
