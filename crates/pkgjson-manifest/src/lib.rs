//! Types describing the shape of a `package.json` manifest.

pub use manifest::*;

mod manifest;
