use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PkgJsonConfigError {
    #[error(transparent)]
    #[diagnostic(code(pkgjson_config::error))]
    ConfigError(#[from] config::ConfigError),

    /// A config value was found, but it couldn't be turned into the type
    /// the command expected.
    #[error("Invalid value for config key `{key}`.")]
    #[diagnostic(code(pkgjson_config::parse_error))]
    ConfigParseError {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
