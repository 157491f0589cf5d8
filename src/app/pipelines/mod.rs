pub mod clean_pipeline;

pub use clean_pipeline::CleaningEtl;
