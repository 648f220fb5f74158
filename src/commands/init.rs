use std::path::PathBuf;

use async_trait::async_trait;
use clap::Args;
use miette::{IntoDiagnostic, Result, WrapErr};
use pkgjson_store::ManifestStore;

use crate::commands::PkgJsonCommand;
use crate::error::PkgJsonError;

/// Creates a package.json with the same contents `npm init -y` would.
#[derive(Debug, Args)]
pub struct InitCmd {
    /// Package name. Defaults to the name of the package root directory.
    #[arg()]
    name: Option<String>,

    /// Overwrite the manifest if one already exists.
    #[arg(long, short)]
    force: bool,

    #[arg(from_global)]
    root: Option<PathBuf>,

    #[arg(from_global)]
    quiet: bool,

    #[arg(skip)]
    pub(crate) store: ManifestStore,
}

#[async_trait]
impl PkgJsonCommand for InitCmd {
    async fn execute(self) -> Result<()> {
        let path = self.store.path();
        if !self.force && async_std::fs::metadata(path).await.is_ok() {
            return Err(PkgJsonError::ManifestExists(path.to_owned()).into());
        }
        let name = match self.name {
            Some(ref name) => name.clone(),
            None => self.default_name()?,
        };
        tracing::debug!("Initializing package {name}.");
        let manifest = pkgjson_store::create_default(name);
        self.store.save(&manifest).await?;
        if !self.quiet {
            let json = serde_json::to_string_pretty(&manifest)
                .into_diagnostic()
                .wrap_err("init::serialize")?;
            println!("Wrote to {}:\n\n{json}\n", path.display());
        }
        Ok(())
    }
}

impl InitCmd {
    fn default_name(&self) -> Result<String> {
        let root = match self.root {
            Some(ref root) => root.clone(),
            None => std::env::current_dir().into_diagnostic()?,
        };
        let root = root
            .canonicalize()
            .into_diagnostic()
            .wrap_err("init::canonicalize_root")?;
        Ok(root
            .file_name()
            .map(|name| package_name_from_dir(&name.to_string_lossy()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "app".into()))
    }
}

fn package_name_from_dir(dir: &str) -> String {
    dir.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
