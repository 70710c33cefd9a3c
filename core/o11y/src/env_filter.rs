use std::borrow::Cow;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// The default value for the `RUST_LOG` environment variable if one isn't specified otherwise.
pub const DEFAULT_RUST_LOG: &str = "l2pricing=info,store=info,simulator=info,warn";

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum BuildEnvFilterError {
    #[error("could not create a log filter for {1}")]
    CreateEnvFilter(#[source] ParseError, String),
}

#[derive(Debug)]
pub struct EnvFilterBuilder<'a> {
    rust_log: Cow<'a, str>,
    verbose: Option<Cow<'a, str>>,
}

impl<'a> EnvFilterBuilder<'a> {
    /// Reads `RUST_LOG`, falling back to [`DEFAULT_RUST_LOG`].
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("RUST_LOG").map(Cow::Owned).unwrap_or(Cow::Borrowed(DEFAULT_RUST_LOG)),
        )
    }

    /// Uses exactly `rust_log`, ignoring the environment.
    pub fn new<S: Into<Cow<'a, str>>>(rust_log: S) -> Self {
        Self { rust_log: rust_log.into(), verbose: None }
    }

    /// Enables debug output for `target`, or for every target if it is empty.
    pub fn verbose<S: Into<Cow<'a, str>>>(mut self, target: Option<S>) -> Self {
        self.verbose = target.map(Into::into);
        self
    }

    pub fn finish(self) -> Result<EnvFilter, BuildEnvFilterError> {
        let mut env_filter = EnvFilter::try_new(&*self.rust_log)
            .map_err(|err| BuildEnvFilterError::CreateEnvFilter(err, self.rust_log.to_string()))?;
        if let Some(target) = self.verbose {
            env_filter = if target.is_empty() {
                env_filter.add_directive(tracing::Level::DEBUG.into())
            } else {
                let directive = format!("{target}=debug");
                let parsed = directive
                    .parse()
                    .map_err(|err| BuildEnvFilterError::CreateEnvFilter(err, directive.clone()))?;
                env_filter.add_directive(parsed)
            };
        }
        Ok(env_filter)
    }
}
