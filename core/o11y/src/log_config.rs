use crate::env_filter::{BuildEnvFilterError, EnvFilterBuilder};
use tracing_subscriber::EnvFilter;

/// Configures logging.
#[derive(Default, serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Comma-separated list of EnvFilter directives. `RUST_LOG` is used when unset.
    pub rust_log: Option<String>,
    /// Some("") enables global debug logging.
    /// Some("module") enables debug logging for "module".
    pub verbose_module: Option<String>,
}

impl LogConfig {
    pub fn env_filter(&self) -> Result<EnvFilter, BuildEnvFilterError> {
        let builder = match &self.rust_log {
            Some(rust_log) => EnvFilterBuilder::new(rust_log.as_str()),
            None => EnvFilterBuilder::from_env(),
        };
        builder.verbose(self.verbose_module.as_deref()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config() {
        let config: LogConfig =
            serde_json::from_str(r#"{"rust_log": "info", "verbose_module": "store"}"#).unwrap();
        let filter = config.env_filter().unwrap().to_string();
        assert!(filter.contains("store=debug"), "{filter}");
        assert_eq!(serde_json::from_str::<LogConfig>("{}").unwrap(), LogConfig::default());
    }
}
