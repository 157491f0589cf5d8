use crate::core::Pipeline;
use crate::domain::model::{CleanReport, Employee};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// What a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct EtlOutput {
    pub output_path: String,
    pub employees: Vec<Employee>,
    pub report: CleanReport,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<EtlOutput> {
        tracing::info!("Starting cleaning run...");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", table.len());
        self.monitor.log_stats("extract");

        // Transform
        let result = self.pipeline.transform(table).await?;
        tracing::info!("Kept {} rows", result.employees.len());
        self.monitor.log_stats("transform");

        let employees = result.employees.clone();
        let report = result.report.clone();

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(EtlOutput {
            output_path,
            employees,
            report,
        })
    }
}
