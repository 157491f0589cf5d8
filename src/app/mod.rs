// Application layer: concrete pipelines and the built-in sample data.

pub mod pipelines;
pub mod sample;
