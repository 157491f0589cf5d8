use crate::adapters::tabular::{read_table, write_delimited};
use crate::app::sample::sample_table;
use crate::core::cleaner::CleaningPipeline;
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::domain::model::Schema;
use crate::utils::error::{CleanError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_FILE: &str = "report.json";

/// Reads a table from `source`, cleans it and writes the results to `sink`.
pub struct CleaningEtl<S: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: S,
    pub(crate) config: C,
    cleaner: CleaningPipeline,
}

impl<S: Storage, C: ConfigProvider> CleaningEtl<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        let cleaner = CleaningPipeline::new(config.impute_options());
        Self {
            source,
            sink,
            config,
            cleaner,
        }
    }

    /// 依設定的輸出格式產生 (檔名, 內容)
    fn render_outputs(&self, result: &TransformResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            let (name, data) = match format.as_str() {
                "csv" => ("cleaned.csv", write_delimited(&result.employees, b',')?.into_bytes()),
                "tsv" => ("cleaned.tsv", write_delimited(&result.employees, b'\t')?.into_bytes()),
                "json" => (
                    "cleaned.json",
                    serde_json::to_string_pretty(&result.employees)?.into_bytes(),
                ),
                other => {
                    return Err(CleanError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            };
            files.push((name.to_string(), data));
        }

        files.push((
            REPORT_FILE.to_string(),
            serde_json::to_string_pretty(&result.report)?.into_bytes(),
        ));

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CleaningEtl<S, C> {
    async fn extract(&self) -> Result<Table> {
        match self.config.input_path() {
            Some(path) => {
                tracing::info!("📥 Reading input from: {}", path);
                let data = self.source.read_file(path).await?;
                read_table(path, Schema::employees(), &data)
            }
            None => {
                tracing::info!("📥 No input configured, using built-in sample data");
                sample_table()
            }
        }
    }

    async fn transform(&self, table: Table) -> Result<TransformResult> {
        let outcome = self.cleaner.run(table);

        if let Some(reason) = &outcome.report.aborted {
            tracing::warn!("Cleaning produced no output: {}", reason);
        }

        Ok(TransformResult {
            employees: outcome.employees,
            report: outcome.report,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let files = self.render_outputs(&result)?;

        let Some(archive_name) = self.config.archive_name() else {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.sink.write_file(name, data).await?;
            }
            return Ok(self.config.output_path().to_string());
        };

        tracing::debug!("Creating ZIP file with {} files", files.len());

        // 建立 ZIP 檔
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for (name, data) in &files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.sink.write_file(archive_name, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), archive_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::impute::ImputeOptions;
    use crate::domain::model::{CleanReport, Employee};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self::default()
        }

        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CleanError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.put(path, data).await;
            Ok(())
        }
    }

    struct MockConfig {
        input_path: Option<String>,
        output_formats: Vec<String>,
        archive_name: Option<String>,
    }

    impl MockConfig {
        fn new(input_path: Option<&str>, formats: &[&str]) -> Self {
            Self {
                input_path: input_path.map(str::to_string),
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
                archive_name: None,
            }
        }

        fn zipped(mut self) -> Self {
            self.archive_name = Some("out.zip".to_string());
            self
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> Option<&str> {
            self.input_path.as_deref()
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive_name.as_deref()
        }

        fn impute_options(&self) -> ImputeOptions {
            ImputeOptions::default()
        }
    }

    fn transform_result(employees: Vec<Employee>) -> TransformResult {
        let now = chrono::Utc::now();
        TransformResult {
            report: CleanReport {
                input_rows: employees.len(),
                duplicates_removed: 0,
                imputations: vec![],
                rejections: vec![],
                output_rows: employees.len(),
                aborted: None,
                started_at: now,
                finished_at: now,
            },
            employees,
        }
    }

    #[tokio::test]
    async fn test_extract_without_input_uses_sample() {
        let pipeline = CleaningEtl::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new(None, &["csv"]),
        );

        let table = pipeline.extract().await.unwrap();
        assert_eq!(table.len(), 6);
    }

    #[tokio::test]
    async fn test_extract_reads_csv_from_source() {
        let source = MockStorage::new();
        source
            .put("people.csv", b"name,age,email,salary\nAnn,30,ann@x.io,10\n")
            .await;

        let pipeline = CleaningEtl::new(
            source,
            MockStorage::new(),
            MockConfig::new(Some("people.csv"), &["csv"]),
        );

        let table = pipeline.extract().await.unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_extract_missing_input_is_error() {
        let pipeline = CleaningEtl::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new(Some("absent.csv"), &["csv"]),
        );
        assert!(pipeline.extract().await.is_err());
    }

    #[tokio::test]
    async fn test_transform_cleans_sample() {
        let pipeline = CleaningEtl::new(
            MockStorage::new(),
            MockStorage::new(),
            MockConfig::new(None, &["csv"]),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(result.employees.len(), 3);
        assert_eq!(result.report.duplicates_removed, 1);
        assert_eq!(result.report.rejections.len(), 2);
    }

    #[tokio::test]
    async fn test_transform_swallows_unexpected_errors() {
        let source = MockStorage::new();
        source
            .put("people.csv", b"name,age,email,salary\nAnn,thirty,ann@x.io,10\n")
            .await;

        let pipeline = CleaningEtl::new(
            source,
            MockStorage::new(),
            MockConfig::new(Some("people.csv"), &["csv"]),
        );

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert!(result.employees.is_empty());
        assert!(result.report.aborted.is_some());
    }

    #[tokio::test]
    async fn test_load_writes_each_format_and_report() {
        let sink = MockStorage::new();
        let pipeline = CleaningEtl::new(
            MockStorage::new(),
            sink.clone(),
            MockConfig::new(None, &["csv", "tsv", "json"]),
        );

        let employees = vec![Employee {
            name: "Ann".to_string(),
            age: 30,
            email: "ann@x.io".to_string(),
            salary: 10.0,
        }];
        let output_path = pipeline.load(transform_result(employees)).await.unwrap();

        assert_eq!(output_path, "test_output");
        let csv = String::from_utf8(sink.get_file("cleaned.csv").await.unwrap()).unwrap();
        assert_eq!(csv, "name,age,email,salary\nAnn,30,ann@x.io,10.0\n");
        assert!(sink.get_file("cleaned.tsv").await.is_some());
        assert!(sink.get_file("cleaned.json").await.is_some());
        assert!(sink.get_file(REPORT_FILE).await.is_some());
    }

    #[tokio::test]
    async fn test_load_with_archive_bundles_outputs() {
        let sink = MockStorage::new();
        let pipeline = CleaningEtl::new(
            MockStorage::new(),
            sink.clone(),
            MockConfig::new(None, &["csv", "json"]).zipped(),
        );

        let output_path = pipeline.load(transform_result(vec![])).await.unwrap();
        assert_eq!(output_path, "test_output/out.zip");

        let zip_bytes = sink.get_file("out.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();

        assert_eq!(file_names, vec!["cleaned.csv", "cleaned.json", "report.json"]);
        assert!(sink.get_file("cleaned.csv").await.is_none());
    }
}
