//! Reads and writes `package.json` manifests.
//!
//! ## API Layout
//!
//! The default APIs are async functions running on
//! [`async-std`](https://crates.io/crates/async-std). Synchronous versions
//! behave exactly like their unsuffixed counterparts and are available
//! through the `_sync` suffix.
//!
//! Every call is independent: nothing is cached and nothing is locked. Two
//! writers racing on the same file leave whichever one finished last.
//!
//! ## Examples
//!
//! ```no_run
//! #[async_std::main]
//! async fn main() -> pkgjson_store::Result<()> {
//!     let manifest = pkgjson_store::create_default("my-app");
//!     pkgjson_store::save("./package.json", &manifest).await?;
//!
//!     let loaded = pkgjson_store::load("./package.json").await?;
//!     assert_eq!(manifest, loaded);
//!     Ok(())
//! }
//! ```
//!
//! Or, if you'd rather not deal with futures:
//!
//! ```no_run
//! fn main() -> pkgjson_store::Result<()> {
//!     let manifest = pkgjson_store::create_default("my-app");
//!     pkgjson_store::save_sync("./package.json", &manifest)?;
//!     let loaded = pkgjson_store::load_sync("./package.json")?;
//!     assert_eq!(manifest, loaded);
//!     Ok(())
//! }
//! ```

pub use pkgjson_manifest::Manifest;

pub use error::{ManifestStoreError, Result};
pub use store::*;

mod error;
mod store;

/// Where manifests are read from and written to when no location is given.
pub const DEFAULT_MANIFEST_PATH: &str = "./package.json";

/// Returns the manifest `npm init -y` would produce for `app_name`.
///
/// Has no side effects: nothing is written until the result is passed to
/// [`save`] or [`save_sync`].
pub fn create_default(app_name: impl Into<String>) -> Manifest {
    Manifest::new(app_name)
}
