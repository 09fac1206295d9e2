pub mod inference_process;
pub mod pipeline;
pub mod pipeline_worker;
pub mod y;

pub use inference_process::PostProcess;
pub use pipeline::BvrPipeline;
pub use pipeline_worker::{PipelineWorker, SubmitStatus};
pub use y::Y;
