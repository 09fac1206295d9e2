mod utils;
pub mod common;
pub mod data;
pub mod detection_processing;
pub mod detection_runners;

use crate::common::{BvrFrame, ModelConfig};
use crate::data::RawOutput;
use crate::detection_runners::{BvrPipeline, PostProcess, Y};

/// Builds a pipeline for a model whose outputs have the given shapes.
///
/// Fails when the shapes match no supported layout or the configuration is out of range.
pub fn init_pipeline(model_details: &ModelConfig, output_shapes: &[Vec<usize>]) -> anyhow::Result<BvrPipeline> {
    log::info!("Initializing post-processing pipeline\n{}", model_details.to_string());
    BvrPipeline::new(model_details, output_shapes)
}

/// Turns one frame's raw outputs into detections (and a mask for segmentation models).
pub fn run_postprocess(pipeline: &mut BvrPipeline, outputs: &[RawOutput], frame: &BvrFrame) -> anyhow::Result<Y> {
    pipeline.forward(outputs, frame, false)
}
