use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` name one.
///
/// wgpu's internals are chatty at `info`; keep them at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "lumen_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
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
    /// Filter string actually applied: explicit config, then `RUST_LOG`, then
    /// [`DEFAULT_FILTER`].
    pub fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding binaries).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized ({filter})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig {
            env_filter: Some("lumen_engine=trace".into()),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_filter(), "lumen_engine=trace");
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
