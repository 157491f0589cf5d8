pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::LocalStorage;
pub use app::pipelines::CleaningEtl;
pub use core::{cleaner::CleaningPipeline, etl::EtlEngine};
pub use domain::model::{Employee, Record, Schema, Table, ValidationResult};
pub use utils::error::{CleanError, Result};
