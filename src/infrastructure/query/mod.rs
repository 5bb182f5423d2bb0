//! Query translation infrastructure

mod translator;

pub use translator::SearchQueryTranslator;
