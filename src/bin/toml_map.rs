use anyhow::Context;
use clap::Parser;
use quake_map::core::ConfigProvider;
use quake_map::render::Legend;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{LocalStorage, MapEngine, MapPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Earthquake map renderer driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "quake-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override skip_invalid_records from config
    #[arg(long)]
    skip_invalid: Option<bool>,

    /// Dry run - show what would be fetched and rendered without doing it
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger_with_level(args.verbose, args.log_json, config.log_level());

    tracing::info!("🚀 Starting TOML-based quake-map");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(skip) = args.skip_invalid {
        config.validation.skip_invalid_records = Some(skip);
        tracing::info!("🔧 skip_invalid_records overridden to: {}", skip);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        perform_dry_run(&config).context("dry run failed")?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = MapPipeline::new(storage, config);
    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map rendered successfully!");
            println!("✅ Map rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Map build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let options = config.map_options();
    println!("📋 Configuration Summary:");
    println!("  Title: {} / {}", options.title, options.subtitle);
    println!("  Feed: {}", config.feed_url());
    println!(
        "  Plates: {}",
        config.plates_source().unwrap_or("(disabled)")
    );
    println!("  Output: {}", config.output_path());
    println!("  Timeout: {:?}", config.request_timeout());
    println!("  Skip invalid records: {}", config.skip_invalid_records());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let options = config.map_options();

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🗺️ View:");
    println!("  Center: {:?}, zoom {}", options.center, options.zoom);
    println!("  Base layers:");
    for (i, layer) in options.base_layers.iter().enumerate() {
        let marker = if i == 0 { " (initial)" } else { "" };
        println!("    - {}{}: {}", layer.name, marker, layer.url_template);
    }

    // 圖例預覽
    println!();
    println!("🎨 Depth legend:");
    let legend = Legend::depth(config.plates_source().is_some());
    for entry in &legend.entries {
        println!("  {}  {}", entry.color, entry.label.replace("&ndash;", "-"));
    }

    println!();
    println!("💾 Output:");
    let output = std::path::Path::new(config.output_path());
    println!("  Page: {}", output.join("index.html").display());
    if config.emit_geojson() {
        println!("  Markers: {}", output.join("earthquakes.geojson").display());
    }
    if output.exists() && !output.is_dir() {
        anyhow::bail!("output path {} exists and is not a directory", output.display());
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
