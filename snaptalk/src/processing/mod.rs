mod pipeline;

pub use pipeline::RecognitionPipeline;
