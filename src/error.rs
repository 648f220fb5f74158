use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PkgJsonError {
    /// `pkgjson init` refuses to clobber an existing manifest unless told to.
    #[error("A package manifest already exists at {}.", .0.display())]
    #[diagnostic(
        code(pkgjson::init::manifest_exists),
        url(docsrs),
        help("Pass `--force` to overwrite it.")
    )]
    ManifestExists(PathBuf),

    /// The requested field isn't present in the manifest.
    #[error("Field `{0}` is not set in this manifest.")]
    #[diagnostic(
        code(pkgjson::view::field_not_found),
        url(docsrs),
        help("Use `.` to reach into nested fields, for example `scripts.test` or `keywords.0`.")
    )]
    FieldNotFound(String),
}
