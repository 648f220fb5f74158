use std::path::{Path, PathBuf};

use pkgjson_manifest::Manifest;

use crate::error::{ManifestStoreError, Result};
use crate::DEFAULT_MANIFEST_PATH;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// A manifest location. Defaults to [`DEFAULT_MANIFEST_PATH`].
///
/// This is a convenience wrapper around the free functions in this crate for
/// callers that keep passing the same path around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestStore {
    path: PathBuf,
}

impl Default for ManifestStore {
    fn default() -> Self {
        ManifestStore {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Manifest> {
        load(&self.path).await
    }

    pub fn load_sync(&self) -> Result<Manifest> {
        load_sync(&self.path)
    }

    pub async fn save(&self, manifest: &Manifest) -> Result<()> {
        save(&self.path, manifest).await
    }

    pub fn save_sync(&self, manifest: &Manifest) -> Result<()> {
        save_sync(&self.path, manifest)
    }
}

// ---------
// Async API
// ---------

/// Reads and parses the manifest at `path`.
///
/// ## Example
/// ```no_run
/// #[async_std::main]
/// async fn main() -> pkgjson_store::Result<()> {
///     let manifest = pkgjson_store::load("./package.json").await?;
///     println!("{}", manifest.id());
///     Ok(())
/// }
/// ```
pub async fn load<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    tracing::debug!("Loading manifest from {}", path.display());
    let bytes = async_std::fs::read(path)
        .await
        .map_err(|e| ManifestStoreError::from_read(path, e))?;
    decode(path, &bytes)
}

/// Writes `manifest` to `path`, replacing whatever was there.
///
/// ## Example
/// ```no_run
/// #[async_std::main]
/// async fn main() -> pkgjson_store::Result<()> {
///     let manifest = pkgjson_store::create_default("my-app");
///     pkgjson_store::save("./package.json", &manifest).await?;
///     Ok(())
/// }
/// ```
pub async fn save<P: AsRef<Path>>(path: P, manifest: &Manifest) -> Result<()> {
    let path = path.as_ref();
    let json = encode(path, manifest)?;
    tracing::debug!("Saving manifest for {} to {}", manifest.id(), path.display());
    async_std::fs::write(path, json.as_bytes())
        .await
        .map_err(|source| ManifestStoreError::Unwritable {
            path: path.into(),
            source,
        })
}

// --------
// Sync API
// --------

/// Reads and parses the manifest at `path`, blocking until done.
///
/// ## Example
/// ```no_run
/// fn main() -> pkgjson_store::Result<()> {
///     let manifest = pkgjson_store::load_sync("./package.json")?;
///     println!("{}", manifest.id());
///     Ok(())
/// }
/// ```
pub fn load_sync<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    tracing::debug!("Loading manifest from {}", path.display());
    let bytes = std::fs::read(path).map_err(|e| ManifestStoreError::from_read(path, e))?;
    decode(path, &bytes)
}

/// Writes `manifest` to `path`, replacing whatever was there, blocking until
/// done.
///
/// ## Example
/// ```no_run
/// fn main() -> pkgjson_store::Result<()> {
///     let manifest = pkgjson_store::create_default("my-app");
///     pkgjson_store::save_sync("./package.json", &manifest)?;
///     Ok(())
/// }
/// ```
pub fn save_sync<P: AsRef<Path>>(path: P, manifest: &Manifest) -> Result<()> {
    let path = path.as_ref();
    let json = encode(path, manifest)?;
    tracing::debug!("Saving manifest for {} to {}", manifest.id(), path.display());
    std::fs::write(path, json.as_bytes()).map_err(|source| ManifestStoreError::Unwritable {
        path: path.into(),
        source,
    })
}

fn decode(path: &Path, bytes: &[u8]) -> Result<Manifest> {
    tracing::trace!("Parsing {} bytes from {}", bytes.len(), path.display());
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    serde_json::from_slice(bytes)
        .and_then(Manifest::from_value)
        .map_err(|source| ManifestStoreError::MalformedContent {
            path: path.into(),
            source,
        })
}

/// Two-space indentation, trailing newline. Keys keep the order they were
/// loaded in.
fn encode(path: &Path, manifest: &Manifest) -> Result<String> {
    let mut json = manifest
        .to_value()
        .and_then(|value| serde_json::to_string_pretty(&value))
        .map_err(|e| ManifestStoreError::Unwritable {
            path: path.into(),
            source: e.into(),
        })?;
    json.push('\n');
    Ok(json)
}
