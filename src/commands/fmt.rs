use async_trait::async_trait;
use clap::Args;
use miette::Result;
use pkgjson_store::ManifestStore;

use crate::commands::PkgJsonCommand;

/// Rewrites the package manifest with two-space indentation and a trailing
/// newline. Keys stay in the order they were in, and fields pkgjson doesn't
/// know about are kept as they are.
#[derive(Debug, Args)]
pub struct FmtCmd {
    #[arg(skip)]
    pub(crate) store: ManifestStore,
}

#[async_trait]
impl PkgJsonCommand for FmtCmd {
    async fn execute(self) -> Result<()> {
        let manifest = self.store.load().await?;
        self.store.save(&manifest).await?;
        tracing::info!(
            "Reformatted {} ({}).",
            self.store.path().display(),
            manifest.id()
        );
        Ok(())
    }
}
