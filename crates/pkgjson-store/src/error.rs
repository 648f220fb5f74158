use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ManifestStoreError {
    /// There's no file at the requested location.
    #[error("No package manifest found at {}.", .path.display())]
    #[diagnostic(
        code(pkgjson_store::not_found),
        url(docsrs),
        help("Check the path, or create a new manifest with `pkgjson init`.")
    )]
    NotFound { path: PathBuf },

    /// The file exists, but reading it failed.
    #[error("Failed to read package manifest at {}.", .path.display())]
    #[diagnostic(code(pkgjson_store::unreadable), url(docsrs))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's contents are not valid JSON, or are JSON that doesn't have
    /// the shape of a package manifest.
    #[error("Package manifest at {} is malformed.", .path.display())]
    #[diagnostic(
        code(pkgjson_store::malformed_content),
        url(docsrs),
        help("A manifest must be a JSON object with at least `name` and `version`.")
    )]
    MalformedContent {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest could not be written to the requested location.
    #[error("Failed to write package manifest to {}.", .path.display())]
    #[diagnostic(code(pkgjson_store::unwritable), url(docsrs))]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestStoreError {
    pub(crate) fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            ManifestStoreError::NotFound { path }
        } else {
            ManifestStoreError::Unreadable { path, source: err }
        }
    }
}

/// The result type returned by calls to this library
pub type Result<T> = std::result::Result<T, ManifestStoreError>;
