use async_trait::async_trait;
use miette::Result;

pub mod fmt;
pub mod init;
pub mod view;

#[async_trait]
pub trait PkgJsonCommand {
    async fn execute(self) -> Result<()>;
}
