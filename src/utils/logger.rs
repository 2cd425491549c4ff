use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise `level` (e.g. from the TOML config), otherwise info/debug.
fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("quake_map={},info", level)),
        None if verbose => EnvFilter::new("quake_map=debug,info"),
        None => EnvFilter::new("quake_map=info"),
    })
}

pub fn init_logger(verbose: bool, json: bool) {
    init_logger_with_level(verbose, json, None);
}

/// JSON 格式方便交給日誌收集器
pub fn init_logger_with_level(verbose: bool, json: bool, level: Option<&str>) {
    let filter = build_filter(verbose, level);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
