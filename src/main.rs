use clap::Parser;
use small_clean::core::etl::EtlOutput;
use small_clean::utils::error::{CleanError, ErrorSeverity};
use small_clean::utils::{logger, validation::Validate};
use small_clean::{CleaningEtl, CliConfig, EtlEngine, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting small-clean CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 輸入路徑相對於工作目錄，輸出寫到 output_path
    let source = LocalStorage::new(".");
    let sink = LocalStorage::new(config.output_path.clone());
    let pipeline = CleaningEtl::new(source, sink, config);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            print_summary(&output);
            tracing::info!("✅ Cleaning completed, output saved to: {}", output.output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn print_summary(output: &EtlOutput) {
    let report = &output.report;

    if let Some(reason) = &report.aborted {
        println!("⚠️  Cleaning aborted, no rows kept: {}", reason);
    }

    println!(
        "📊 {} rows in, {} duplicates removed, {} rejected, {} kept",
        report.input_rows,
        report.duplicates_removed,
        report.rejections.len(),
        report.output_rows
    );

    for imputation in &report.imputations {
        println!(
            "🩹 {}: filled {} with {:?} {}",
            imputation.column, imputation.filled, imputation.strategy, imputation.value
        );
    }

    for rejection in &report.rejections {
        println!("🚫 row {}: {}", rejection.row, rejection.reason);
    }

    println!();
    println!("{:<16} {:>5}  {:<28} {:>12}", "name", "age", "email", "salary");
    for e in &output.employees {
        println!("{:<16} {:>5}  {:<28} {:>12.2}", e.name, e.age, e.email, e.salary);
    }
    println!();
    println!("📁 Output saved to: {}", output.output_path);
}

fn exit_with(e: CleanError) -> ! {
    tracing::error!(
        "❌ Cleaning run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
