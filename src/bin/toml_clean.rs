use clap::Parser;
use small_clean::config::toml_config::TomlConfig;
use small_clean::core::ConfigProvider;
use small_clean::utils::error::ErrorSeverity;
use small_clean::utils::{logger, validation::Validate};
use small_clean::{CleaningEtl, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-clean")]
#[command(about = "Table cleaning driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "clean-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌，設定檔的 log_level = "debug" 等同 --verbose
    logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));

    tracing::info!("🚀 Starting TOML-based cleaning tool");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let source = LocalStorage::new(".");
    let sink = LocalStorage::new(config.output_path());
    let pipeline = CleaningEtl::new(source, sink, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            let report = &output.report;
            if let Some(reason) = &report.aborted {
                println!("⚠️  Cleaning aborted, no rows kept: {}", reason);
            }
            println!(
                "✅ {} rows in, {} duplicates removed, {} rejected, {} kept",
                report.input_rows,
                report.duplicates_removed,
                report.rejections.len(),
                report.output_rows
            );
            println!("📁 Output saved to: {}", output.output_path);
        }
        Err(e) => {
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
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    println!(
        "  Source: {}",
        config.input_path().unwrap_or("built-in sample")
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    let impute = config.impute_options();
    if let Some(fallback) = impute.numeric_fallback {
        println!("  Numeric fallback: {}", fallback);
    }
    if let Some(fallback) = &impute.text_fallback {
        println!("  Text fallback: {}", fallback);
    }
    if let Some(level) = config.log_level() {
        println!("  Log level: {}", level);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
