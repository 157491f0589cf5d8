use super::DEFAULT_ARCHIVE_NAME;
use crate::core::impute::ImputeOptions;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "small-clean")]
#[command(about = "Deduplicate, impute and validate employee tables")]
pub struct CliConfig {
    /// CSV or JSON input; the built-in sample is used when omitted
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Bundle all outputs into a single zip archive
    #[arg(long)]
    pub zip: bool,

    /// Value for numeric columns that have no observed values
    #[arg(long)]
    pub numeric_fallback: Option<f64>,

    /// Value for text columns that have no observed values
    #[arg(long)]
    pub text_fallback: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.zip.then_some(DEFAULT_ARCHIVE_NAME)
    }

    fn impute_options(&self) -> ImputeOptions {
        ImputeOptions {
            numeric_fallback: self.numeric_fallback,
            text_fallback: self.text_fallback.clone(),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validation::validate_path("input", input)?;
            validation::validate_file_extension("input", input, &validation::INPUT_EXTENSIONS)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        Ok(())
    }
}
