use derive_builder::Builder;
use indexmap::IndexMap;
use node_semver::{SemverError, Version};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `package.json` document.
///
/// Fields are declared in the order `npm init` writes them, so a freshly
/// created manifest serializes the way Node tooling expects. Optional fields
/// are `None` when the key is missing from the document; an empty list or
/// object is a distinct, present value.
///
/// `description`, `author` and `license` must be set when building a
/// manifest with [`ManifestBuilder`], but a document that leaves them out
/// still loads.
///
/// Use [`Manifest::from_value`] and [`Manifest::to_value`] to keep a loaded
/// document's key order when it's written back.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The name of the package.
    ///
    /// At most 214 characters (scope included), URL-safe, and lowercase
    /// unless scoped. None of this is checked here: registries enforce it.
    #[builder(setter(into))]
    pub name: String,

    /// The version of the package. Should be parseable by node-semver; see
    /// [`Manifest::semver`].
    #[builder(setter(into))]
    pub version: String,

    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    /// Lifecycle scripts, keyed by event name. Key order is preserved.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<IndexMap<String, String>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonField>,

    /// Ideally an SPDX license expression, such as `"(MIT OR Apache-2.0)"`.
    #[builder(setter(into, strip_option))]
    #[serde(alias = "licence", skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bugs: Option<Bugs>,

    /// Information about the repository this project is hosted in.
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<PersonField>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<Funding>,

    /// Glob patterns of files to include when the package is packed.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<Bin>,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub man: Option<Man>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directories: Option<Directories>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<IndexMap<String, Value>>,

    // Deps
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, String>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<IndexMap<String, String>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_dependencies: Option<IndexMap<String, String>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_dependencies_meta: Option<IndexMap<String, PeerDependencyMeta>>,

    #[builder(setter(strip_option), default)]
    #[serde(
        rename = "bundleDependencies",
        alias = "bundledDependencies",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle_dependencies: Option<BundledDependencies>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_dependencies: Option<IndexMap<String, String>>,

    /// Replacement specs for packages anywhere in the dependency tree.
    /// Values may be nested objects, so they're kept as raw JSON.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<IndexMap<String, Value>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engines: Option<IndexMap<String, String>>,

    /// Supported operating systems. Entries starting with `!` are blocked.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Vec<String>>,

    /// Supported CPU architectures. Entries starting with `!` are blocked.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Vec<String>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_config: Option<IndexMap<String, Value>>,

    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<String>>,

    /// Any top-level fields not modeled above, in document order.
    #[builder(default)]
    #[serde(flatten, default, skip_serializing_if = "IndexMap::is_empty")]
    pub rest: IndexMap<String, Value>,

    /// Top-level key order of the document this manifest was read from.
    #[builder(default)]
    #[serde(skip)]
    pub key_order: KeyOrder,
}

impl Manifest {
    /// The manifest `npm init -y` would write for a package called
    /// `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        let mut scripts = IndexMap::new();
        scripts.insert(
            "test".to_owned(),
            r#"echo "Error: no test specified" && exit 1"#.to_owned(),
        );
        Manifest {
            name: app_name.into(),
            version: "1.0.0".into(),
            description: Some(String::new()),
            main: Some("index.js".into()),
            browser: None,
            scripts: Some(scripts),
            keywords: Some(Vec::new()),
            author: Some(PersonField::Str(String::new())),
            license: Some("ISC".into()),
            homepage: None,
            bugs: None,
            repository: None,
            contributors: None,
            funding: None,
            files: None,
            bin: None,
            man: None,
            directories: None,
            config: None,
            dependencies: None,
            dev_dependencies: None,
            peer_dependencies: None,
            peer_dependencies_meta: None,
            bundle_dependencies: None,
            optional_dependencies: None,
            overrides: None,
            engines: None,
            os: None,
            cpu: None,
            private: None,
            publish_config: None,
            workspaces: None,
            rest: IndexMap::new(),
            key_order: KeyOrder::default(),
        }
    }

    /// Reads a manifest out of a parsed JSON document, remembering the order
    /// its top-level keys appeared in.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let key_order = match &value {
            Value::Object(map) => KeyOrder::from_keys(map.keys()),
            _ => KeyOrder::default(),
        };
        let mut manifest = Manifest::deserialize(value)?;
        manifest.key_order = key_order;
        Ok(manifest)
    }

    /// Serializes the manifest. Keys recorded in [`Manifest::key_order`] come
    /// first, in that order. Keys the document didn't have follow in field
    /// order, then unknown fields.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            let mut fields = std::mem::take(map).into_iter().collect::<IndexMap<_, _>>();
            for key in self.key_order.iter() {
                if let Some(val) = fields.shift_remove(key) {
                    map.insert(key.clone(), val);
                }
            }
            map.extend(fields);
        }
        Ok(value)
    }

    /// Parses `version` using npm's semver rules.
    pub fn semver(&self) -> Result<Version, SemverError> {
        self.version.parse()
    }

    /// `name@version`, the identifier registries key published packages by.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest::new("app")
    }
}

/// The order a document's top-level keys were read in. Aliased keys are
/// recorded under the name they're written back as.
///
/// Two manifests with the same fields compare equal whatever their key order.
#[derive(Clone, Debug, Default)]
pub struct KeyOrder(Vec<String>);

impl KeyOrder {
    fn from_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Self {
        KeyOrder(
            keys.map(|key| match key.as_str() {
                "licence" => "license".to_owned(),
                "bundledDependencies" => "bundleDependencies".to_owned(),
                _ => key.clone(),
            })
            .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl PartialEq for KeyOrder {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for KeyOrder {}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BundledDependencies {
    /// `true` bundles every dependency, `false` bundles none.
    All(bool),
    Some(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bugs {
    Str(String),
    Obj(Bug),
}

/// Where to report issues. Either field may be given alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bug {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Bug> for Bugs {
    fn from(value: Bug) -> Self {
        Bugs::Obj(value)
    }
}

/// Represents a human!
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PersonField {
    Str(String),
    Obj(Person),
}

impl From<&str> for PersonField {
    fn from(value: &str) -> Self {
        PersonField::Str(value.into())
    }
}

impl From<String> for PersonField {
    fn from(value: String) -> Self {
        PersonField::Str(value)
    }
}

impl From<Person> for PersonField {
    fn from(value: Person) -> Self {
        PersonField::Obj(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Person {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Repository {
    Str(String),
    Obj(RepositoryInfo),
}

impl From<RepositoryInfo> for Repository {
    fn from(value: RepositoryInfo) -> Self {
        Repository::Obj(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryInfo {
    #[serde(rename = "type")]
    pub repo_type: String,
    pub url: String,
    /// Path of the package inside a monorepo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Funding {
    Str(String),
    Obj(FundingInfo),
    Vec(Vec<FundingInfo>),
}

impl From<FundingInfo> for Funding {
    fn from(value: FundingInfo) -> Self {
        Funding::Obj(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FundingInfo {
    /// e.g. `individual`, `patreon`, `opencollective`.
    #[serde(rename = "type")]
    pub funding_type: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bin {
    Str(String),
    Hash(IndexMap<String, String>),
}

impl From<IndexMap<String, String>> for Bin {
    fn from(value: IndexMap<String, String>) -> Self {
        Bin::Hash(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Man {
    Str(String),
    Vec(Vec<String>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Directories {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub man: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeerDependencyMeta {
    /// Optional peers don't produce warnings when they're missing.
    pub optional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;

    #[test]
    fn basic_from_json() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.2.3",
    "description": "description",
    "author": "Kat",
    "license": "MIT",
    "homepage": "https://foo.dev",
    "devDependencies": {
        "foo": "^3.2.1"
    }
}
        "#;
        let mut deps = IndexMap::new();
        deps.insert(String::from("foo"), String::from("^3.2.1"));
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(
            parsed,
            ManifestBuilder::default()
                .name("hello")
                .version("1.2.3")
                .description("description")
                .author("Kat")
                .license("MIT")
                .homepage("https://foo.dev")
                .dev_dependencies(deps)
                .build()
                .into_diagnostic()?
        );
        Ok(())
    }

    #[test]
    fn missing_name_or_version() {
        assert!(serde_json::from_str::<Manifest>(r#"{"version": "1.0.0"}"#).is_err());
        assert!(serde_json::from_str::<Manifest>(r#"{"name": "hello"}"#).is_err());
    }

    #[test]
    fn minimal_document() -> Result<()> {
        let string = r#"{"name": "ws-root", "version": "1.0.0", "private": true}"#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.author, None);
        assert_eq!(parsed.license, None);
        let json = serde_json::to_value(&parsed).into_diagnostic()?;
        assert_eq!(
            json,
            serde_json::json!({"name": "ws-root", "version": "1.0.0", "private": true})
        );
        Ok(())
    }

    #[test]
    fn builder_requires_template_fields() {
        let built = ManifestBuilder::default()
            .name("hello")
            .version("1.0.0")
            .description("")
            .author("")
            .build();
        assert!(built.is_err());
    }

    #[test]
    fn default_template() -> Result<()> {
        let manifest = Manifest::new("test");
        assert_eq!(
            serde_json::to_value(&manifest).into_diagnostic()?,
            serde_json::json!({
                "name": "test",
                "version": "1.0.0",
                "description": "",
                "main": "index.js",
                "scripts": {
                    "test": "echo \"Error: no test specified\" && exit 1"
                },
                "keywords": [],
                "author": "",
                "license": "ISC"
            })
        );
        assert_eq!(Manifest::default().name, "app");
        Ok(())
    }

    #[test]
    fn default_template_key_order() -> Result<()> {
        let json = serde_json::to_value(Manifest::new("test")).into_diagnostic()?;
        let keys = json
            .as_object()
            .expect("manifests serialize to objects")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "name",
                "version",
                "description",
                "main",
                "scripts",
                "keywords",
                "author",
                "license"
            ]
        );
        Ok(())
    }

    #[test]
    fn union_fields() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": {"name": "Kat", "email": "kat@example.com"},
    "license": "MIT",
    "bugs": "https://github.com/owner/project/issues",
    "repository": {"type": "git", "url": "https://github.com/facebook/react.git", "directory": "packages/react-dom"},
    "contributors": ["Someone <someone@example.com>", {"name": "Other"}],
    "funding": [{"type": "patreon", "url": "https://patreon.com/me"}],
    "bin": "./cli.js",
    "man": ["./man/foo.1", "./man/bar.1"],
    "bundledDependencies": true
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(
            parsed.author,
            Some(PersonField::Obj(Person {
                name: "Kat".into(),
                email: Some("kat@example.com".into()),
                url: None,
            }))
        );
        assert_eq!(
            parsed.bugs,
            Some(Bugs::Str("https://github.com/owner/project/issues".into()))
        );
        assert_eq!(
            parsed.repository,
            Some(Repository::Obj(RepositoryInfo {
                repo_type: "git".into(),
                url: "https://github.com/facebook/react.git".into(),
                directory: Some("packages/react-dom".into()),
            }))
        );
        assert_eq!(
            parsed.contributors,
            Some(vec![
                PersonField::Str("Someone <someone@example.com>".into()),
                PersonField::Obj(Person {
                    name: "Other".into(),
                    email: None,
                    url: None,
                }),
            ])
        );
        assert_eq!(
            parsed.funding,
            Some(Funding::Vec(vec![FundingInfo {
                funding_type: "patreon".into(),
                url: "https://patreon.com/me".into(),
            }]))
        );
        assert_eq!(parsed.bin, Some(Bin::Str("./cli.js".into())));
        assert_eq!(
            parsed.man,
            Some(Man::Vec(vec!["./man/foo.1".into(), "./man/bar.1".into()]))
        );
        assert_eq!(
            parsed.bundle_dependencies,
            Some(BundledDependencies::All(true))
        );
        Ok(())
    }

    #[test]
    fn absent_and_empty_are_distinct() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": "",
    "license": "ISC",
    "files": []
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(parsed.files, Some(Vec::new()));
        assert_eq!(parsed.keywords, None);
        let json = serde_json::to_value(&parsed).into_diagnostic()?;
        assert_eq!(json["files"], serde_json::json!([]));
        assert!(json.get("keywords").is_none());
        Ok(())
    }

    #[test]
    fn unknown_fields_pass_through() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": "",
    "license": "ISC",
    "type": "module",
    "volta": {"node": "18.0.0"},
    "_id": 42
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(
            parsed.rest.keys().collect::<Vec<_>>(),
            vec!["type", "volta", "_id"]
        );
        assert_eq!(parsed.rest["_id"], serde_json::json!(42));
        let json = serde_json::to_value(&parsed).into_diagnostic()?;
        assert_eq!(json["volta"]["node"], "18.0.0");
        Ok(())
    }

    #[test]
    fn peer_dependencies_meta() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": "",
    "license": "ISC",
    "peerDependencies": {"soy-milk": "1.2"},
    "peerDependenciesMeta": {"soy-milk": {"optional": true}}
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        let meta = parsed
            .peer_dependencies_meta
            .expect("peerDependenciesMeta was in the document");
        assert_eq!(meta["soy-milk"], PeerDependencyMeta { optional: true });
        Ok(())
    }

    #[test]
    fn licence_alias() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": "",
    "licence": "Parity-7.0"
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(parsed.license.as_deref(), Some("Parity-7.0"));
        Ok(())
    }

    #[test]
    fn parse_version() -> Result<()> {
        let manifest = ManifestBuilder::default()
            .name("hello")
            .version("1.2.3")
            .description("")
            .author("")
            .license("ISC")
            .build()
            .into_diagnostic()?;
        assert_eq!(
            manifest.semver().into_diagnostic()?,
            "1.2.3".parse::<Version>().into_diagnostic()?
        );
        assert_eq!(manifest.id(), "hello@1.2.3");

        let invalid = Manifest {
            version: "invalid".into(),
            ..manifest
        };
        assert!(invalid.semver().is_err());
        Ok(())
    }

    #[test]
    fn document_key_order() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "type": "module",
    "licence": "MIT",
    "dependencies": {"zeta": "^1.0.0"},
    "scripts": {"test": "jest"},
    "description": "",
    "author": "Kat"
}
        "#;
        let value = serde_json::from_str::<Value>(string).into_diagnostic()?;
        let mut parsed = Manifest::from_value(value).into_diagnostic()?;
        parsed.homepage = Some("https://foo.dev".into());
        let json = parsed.to_value().into_diagnostic()?;
        let keys = json
            .as_object()
            .expect("manifests serialize to objects")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "name",
                "version",
                "type",
                "license",
                "dependencies",
                "scripts",
                "description",
                "author",
                "homepage"
            ]
        );
        Ok(())
    }

    #[test]
    fn key_order_is_not_compared() -> Result<()> {
        let value = serde_json::json!({
            "license": "ISC",
            "author": "",
            "keywords": [],
            "scripts": {"test": "echo \"Error: no test specified\" && exit 1"},
            "main": "index.js",
            "description": "",
            "version": "1.0.0",
            "name": "test"
        });
        assert_eq!(
            Manifest::from_value(value).into_diagnostic()?,
            Manifest::new("test")
        );
        Ok(())
    }

    #[test]
    fn bool_props() -> Result<()> {
        let string = r#"
{
    "name": "hello",
    "version": "1.0.0",
    "description": "",
    "author": "",
    "license": "ISC",
    "private": true
}
        "#;
        let parsed = serde_json::from_str::<Manifest>(string).into_diagnostic()?;
        assert_eq!(parsed.private, Some(true));
        Ok(())
    }
}
