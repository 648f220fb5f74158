//! Layered configuration for the `pkgjson` command line.
//!
//! Values are looked up, lowest to highest priority, in a global config
//! file, `PKGJSON_CONFIG_*` environment variables, and `pkgjsonrc` files in
//! the package root. Command line arguments win over all of them.

use std::path::PathBuf;
use std::str::FromStr;

use clap::parser::ValueSource;
use config::{Environment, File};
use miette::Result;

pub use clap::ArgMatches;
pub use config::Config as PkgJsonConfig;

pub use error::PkgJsonConfigError;

mod error;

pub trait PkgJsonConfigLayer {
    fn layer_config(&mut self, _matches: &ArgMatches, _config: &PkgJsonConfig) -> Result<()> {
        Ok(())
    }
}

/// Looks up `key` in `config` unless the user passed it explicitly on the
/// command line. Returns `Ok(None)` when there's nothing to layer.
pub fn layered_value<T>(
    matches: &ArgMatches,
    config: &PkgJsonConfig,
    key: &str,
) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if matches.value_source(key) == Some(ValueSource::CommandLine) {
        return Ok(None);
    }
    match config.get_string(key) {
        Ok(val) => Ok(Some(T::from_str(&val).map_err(|e| {
            PkgJsonConfigError::ConfigParseError {
                key: key.into(),
                source: Box::new(e),
            }
        })?)),
        Err(_) => Ok(None),
    }
}

pub struct PkgJsonConfigOptions {
    global: bool,
    env: bool,
    pkg_root: Option<PathBuf>,
    global_config_file: Option<PathBuf>,
}

impl Default for PkgJsonConfigOptions {
    fn default() -> Self {
        PkgJsonConfigOptions {
            global: true,
            env: true,
            pkg_root: None,
            global_config_file: None,
        }
    }
}

impl PkgJsonConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn env(mut self, env: bool) -> Self {
        self.env = env;
        self
    }

    pub fn pkg_root(mut self, root: Option<PathBuf>) -> Self {
        self.pkg_root = root;
        self
    }

    pub fn global_config_file(mut self, file: Option<PathBuf>) -> Self {
        self.global_config_file = file;
        self
    }

    pub fn load(self) -> Result<PkgJsonConfig> {
        let mut builder = PkgJsonConfig::builder();
        if self.global {
            if let Some(config_file) = self.global_config_file {
                let path = config_file.display().to_string();
                builder = builder.add_source(File::with_name(&path[..]).required(false));
            }
        }
        if self.env {
            builder = builder.add_source(Environment::with_prefix("pkgjson_config"));
        }
        if let Some(root) = self.pkg_root {
            for name in ["pkgjsonrc", ".pkgjsonrc", "pkgjsonrc.toml", ".pkgjsonrc.toml"] {
                builder = builder.add_source(
                    File::with_name(&root.join(name).display().to_string()).required(false),
                );
            }
        }
        Ok(builder.build().map_err(PkgJsonConfigError::ConfigError)?)
    }
}
