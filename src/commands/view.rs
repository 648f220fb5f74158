use async_trait::async_trait;
use clap::Args;
use colored::*;
use miette::{IntoDiagnostic, Result, WrapErr};
use pkgjson_manifest::{Bin, Manifest, Person, PersonField};
use pkgjson_store::ManifestStore;
use serde_json::Value;

use crate::commands::PkgJsonCommand;
use crate::error::PkgJsonError;

/// Prints a summary of the package manifest, or the value of a single field.
#[derive(Debug, Args)]
#[command(visible_aliases = ["v", "info"])]
pub struct ViewCmd {
    /// Field to print. Use `.` to reach into nested fields, for example
    /// `scripts.test` or `keywords.0`.
    #[arg()]
    field: Option<String>,

    #[arg(from_global)]
    json: bool,

    #[arg(skip)]
    pub(crate) store: ManifestStore,
}

#[async_trait]
impl PkgJsonCommand for ViewCmd {
    async fn execute(self) -> Result<()> {
        let manifest = self.store.load().await?;
        if let Some(field) = &self.field {
            let value = manifest
                .to_value()
                .into_diagnostic()
                .wrap_err("view::to_value")?;
            let found = lookup(&value, field)
                .ok_or_else(|| PkgJsonError::FieldNotFound(field.clone()))?;
            match found {
                Value::String(s) if !self.json => println!("{s}"),
                other => println!(
                    "{}",
                    serde_json::to_string_pretty(other)
                        .into_diagnostic()
                        .wrap_err("view::json_serialize")?
                ),
            }
        } else if self.json {
            println!(
                "{}",
                manifest
                    .to_value()
                    .and_then(|value| serde_json::to_string_pretty(&value))
                    .into_diagnostic()
                    .wrap_err("view::json_serialize")?
            );
        } else {
            print_summary(&manifest);
        }
        Ok(())
    }
}

fn lookup<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    field.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

fn print_summary(manifest: &Manifest) {
    let Manifest {
        ref name,
        ref version,
        ref description,
        ref license,
        ref author,
        ref homepage,
        ref keywords,
        ref bin,
        ref scripts,
        ref dependencies,
        ref dev_dependencies,
        ..
    } = *manifest;

    // name@version | license | deps: 123 | devDeps: 123
    println!(
        "{}@{} | {} | deps: {} | devDeps: {}",
        name.bright_green().underline(),
        version.bright_green().underline(),
        license.as_deref().unwrap_or("no license").green(),
        dependencies.as_ref().map(|d| d.len()).unwrap_or(0).to_string().cyan(),
        dev_dependencies
            .as_ref()
            .map(|d| d.len())
            .unwrap_or(0)
            .to_string()
            .cyan(),
    );

    if let Some(description) = description.as_ref().filter(|d| !d.is_empty()) {
        println!("{description}");
    }

    if let Some(home) = homepage.as_ref() {
        println!("{}", home.cyan());
    }
    println!();

    // keywords: foo, bar, baz
    if let Some(keywords) = keywords.as_ref().filter(|k| !k.is_empty()) {
        println!(
            "keywords: {}\n",
            keywords
                .iter()
                .map(|k| k.yellow().to_string())
                .collect::<Vec<String>>()
                .join(", ")
        );
    }

    // bin: foo, bar
    match bin {
        Some(Bin::Str(_)) => println!("bin: {}\n", name.yellow()),
        Some(Bin::Hash(bins)) if !bins.is_empty() => println!(
            "bin: {}\n",
            bins.keys()
                .map(|k| k.yellow().to_string())
                .collect::<Vec<String>>()
                .join(", ")
        ),
        _ => {}
    }

    if let Some(scripts) = scripts.as_ref().filter(|s| !s.is_empty()) {
        println!("scripts:");
        for (event, command) in scripts {
            println!("{}: {command}", event.yellow());
        }
        println!();
    }

    if let Some(deps) = dependencies.as_ref().filter(|d| !d.is_empty()) {
        println!("dependencies:");
        for (dep, range) in deps {
            println!("{}: {range}", dep.yellow());
        }
        println!();
    }

    match author {
        Some(PersonField::Str(author)) if !author.is_empty() => {
            println!("author: {}", author.yellow());
        }
        Some(PersonField::Obj(Person { name, email, .. })) => {
            print!("author: {}", name.yellow());
            if let Some(email) = email {
                print!(" <{}>", email.cyan());
            }
            println!();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_lookup() {
        let value = json!({
            "name": "hello",
            "scripts": {"test": "jest"},
            "keywords": ["a", "b"]
        });
        assert_eq!(lookup(&value, "name"), Some(&json!("hello")));
        assert_eq!(lookup(&value, "scripts.test"), Some(&json!("jest")));
        assert_eq!(lookup(&value, "keywords.1"), Some(&json!("b")));
        assert_eq!(lookup(&value, "keywords.5"), None);
        assert_eq!(lookup(&value, "name.nope"), None);
        assert_eq!(lookup(&value, "homepage"), None);
    }
}
