use std::path::PathBuf;

use async_trait::async_trait;
use clap::{ArgMatches, CommandFactory, FromArgMatches as _, Parser, Subcommand};
use directories::ProjectDirs;
use miette::{IntoDiagnostic, Result};
use pkgjson_config::{layered_value, PkgJsonConfig, PkgJsonConfigLayer, PkgJsonConfigOptions};
use pkgjson_store::ManifestStore;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use commands::{fmt::FmtCmd, init::InitCmd, view::ViewCmd, PkgJsonCommand};

mod commands;
mod error;

pub use error::PkgJsonError;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct PkgJson {
    /// Package path to operate on. Defaults to the current directory.
    #[arg(global = true, long = "root")]
    root: Option<PathBuf>,

    /// Manifest file to operate on, relative to the package root.
    #[arg(global = true, long, default_value = "package.json")]
    manifest: PathBuf,

    /// File to read configuration values from.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Log output level/directive. Supports plain loglevels (off, error,
    /// warn, info, debug, trace) as well as more advanced directives in the
    /// format `target[span{field=value}]=level`.
    #[arg(global = true, long, default_value = "warn")]
    loglevel: String,

    /// Disable all output
    #[arg(global = true, long, short)]
    quiet: bool,

    /// Format output as JSON.
    #[arg(global = true, long)]
    json: bool,

    #[command(subcommand)]
    subcommand: PkgJsonCmd,
}

impl PkgJson {
    fn setup_logging(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(
                EnvFilter::builder()
                    .with_default_directive(if self.quiet {
                        LevelFilter::OFF.into()
                    } else {
                        self.loglevel.parse().into_diagnostic()?
                    })
                    .from_env_lossy(),
            )
            .init();
        Ok(())
    }

    fn manifest_path(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&self.manifest)
    }

    pub async fn load() -> Result<()> {
        let start = std::time::Instant::now();
        let matches = PkgJson::command().get_matches();
        let mut pkgjson = PkgJson::from_arg_matches(&matches).into_diagnostic()?;
        let cfg = if let Some(file) = &pkgjson.config {
            PkgJsonConfigOptions::new()
                .global_config_file(Some(file.clone()))
                .pkg_root(pkgjson.root.clone())
                .load()?
        } else {
            PkgJsonConfigOptions::new()
                .global_config_file(
                    ProjectDirs::from("", "", "pkgjson")
                        .map(|d| d.config_dir().to_owned().join("pkgjsonrc.toml")),
                )
                .pkg_root(Some(pkgjson.root.clone().unwrap_or_else(|| PathBuf::from("."))))
                .load()?
        };
        pkgjson.layer_config(&matches, &cfg)?;
        pkgjson.setup_logging()?;
        pkgjson.execute().await?;
        tracing::info!("Ran in {}s", start.elapsed().as_millis() as f32 / 1000.0);
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
pub enum PkgJsonCmd {
    /// Create a new package.json with default contents.
    Init(InitCmd),

    /// Print a package.json, or one of its fields.
    View(ViewCmd),

    /// Rewrite a package.json with standard formatting.
    Fmt(FmtCmd),
}

#[async_trait]
impl PkgJsonCommand for PkgJson {
    async fn execute(self) -> Result<()> {
        let store = ManifestStore::new(self.manifest_path());
        tracing::info!("Running command: {:#?}", self.subcommand);
        tracing::debug!("Using manifest at {}", store.path().display());
        match self.subcommand {
            PkgJsonCmd::Init(mut init) => {
                init.store = store;
                init.execute().await
            }
            PkgJsonCmd::View(mut view) => {
                view.store = store;
                view.execute().await
            }
            PkgJsonCmd::Fmt(mut fmt) => {
                fmt.store = store;
                fmt.execute().await
            }
        }
    }
}

impl PkgJsonConfigLayer for PkgJson {
    fn layer_config(&mut self, args: &ArgMatches, conf: &PkgJsonConfig) -> Result<()> {
        if let Some(loglevel) = layered_value(args, conf, "loglevel")? {
            self.loglevel = loglevel;
        }
        if let Some(manifest) = layered_value(args, conf, "manifest")? {
            self.manifest = manifest;
        }
        Ok(())
    }
}
