pub mod cleaner;
pub mod dedup;
pub mod etl;
pub mod impute;
pub mod rules;

pub use crate::domain::model::{Record, Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
