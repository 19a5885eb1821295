use std::sync::Once;

use log::LevelFilter;

/// Crates whose output is noisy at `info`; capped at [`LoggingConfig::gpu_level`].
const GPU_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// Precedence: `env_filter`, then `RUST_LOG`, then the two levels below.
/// Slot acquire/release traces live at `trace` under `triframe_engine::provider`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter string, e.g. "triframe_engine::provider=trace".
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub gpu_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            gpu_level: LevelFilter::Warn,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config
            .env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok());

        // A logger installed elsewhere (test harness) wins.
        if builder(&config, filter.as_deref()).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

fn builder(config: &LoggingConfig, filter: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match filter {
        Some(filter) => {
            builder.parse_filters(filter);
        }
        None => {
            builder.filter_level(config.default_level);
            for module in GPU_MODULES {
                builder.filter_module(module, config.gpu_level);
            }
        }
    }

    builder
        .write_style(config.write_style)
        .format_timestamp_millis();
    builder
}
