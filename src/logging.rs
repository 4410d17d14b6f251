//! Logger setup for the viewer binary.
//!
//! Shader build logs, selection changes, and GL errors are all reported
//! through `log`; this installs the `env_logger` backend that prints them.

use std::sync::Once;

use log::LevelFilter;

/// Filter used when neither the config nor `RUST_LOG` names one. The viewer
/// reports selections at `info`; dependencies only speak up on warnings.
pub const DEFAULT_FILTER: &str = "warn,shadeview=info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter, e.g. `"shadeview=debug"`. Overrides `RUST_LOG`.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Sets an explicit filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Picks the filter: explicit config, then `env`, then [`DEFAULT_FILTER`].
    /// Blank values are skipped.
    pub fn resolve_filter(&self, env: Option<&str>) -> String {
        [self.env_filter.as_deref(), env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILTER)
            .to_string()
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = config.resolve_filter(env.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Warn);
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        // A test harness may have installed its own logger.
        if builder.try_init().is_err() {
            log::warn!("a global logger was already installed");
        }

        log::debug!("logging initialized with `{filter}`");
    });
}
