use miette::Result;
use pkgjson::PkgJson;

#[async_std::main]
async fn main() -> Result<()> {
    PkgJson::load().await
}
