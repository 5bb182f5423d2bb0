//! Processor domain - Per-entity post-processing of search hits

mod result_processor;
mod registry;

pub use result_processor::{PassthroughProcessor, ProcessContext, ResultProcessor, PRODUCT_ENTITY};
pub use registry::{ProcessorRegistry, ProcessorRegistryBuilder, DEFAULT_PROCESSOR};

#[cfg(test)]
pub use result_processor::mock::MockProcessor;
