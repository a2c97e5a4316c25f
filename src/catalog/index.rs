//! Validated, ordered view of a duck catalog.
//!
//! `DuckCatalog` is either the built-in three-duck roster or a JSON document
//! that passed schema validation and the semantic checks below: unique
//! non-empty labels, known implementation names bound under their own
//! category, and scripted behaviors that never shadow an existing name.

use crate::behavior::{BehaviorRegistry, BuiltinBehavior, ScriptedBehavior};
use crate::catalog::identity::{BehaviorCategory, CatalogKey};
use crate::catalog::model::{CatalogDocument, CatalogSnapshot, Duck, DuckDefinition};
use crate::error::{IndexKind, SimError, SimResult};
use crate::schema_loader::{SchemaLoadOptions, compile_json_schema, load_json_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const CATALOG_SCHEMA_VERSION: &str = "duck_catalog_v1";
const SCHEMA_RELATIVE_PATH: &str = "schema/duck_catalog.schema.json";
const BUNDLED_SCHEMA: &str = include_str!("../../schema/duck_catalog.schema.json");

struct RosterEntry {
    label: &'static str,
    description: &'static str,
    overrides: &'static [(BehaviorCategory, BuiltinBehavior)],
}

const STANDARD_ROSTER: &[RosterEntry] = &[
    RosterEntry {
        label: "MallardDuck",
        description: "I'm a real Mallard duck",
        overrides: &[],
    },
    RosterEntry {
        label: "RedheadDuck",
        description: "I'm a real Redhead duck",
        overrides: &[],
    },
    RosterEntry {
        label: "RubberDuck",
        description: "I'm a rubber duckie",
        overrides: &[
            (BehaviorCategory::Quack, BuiltinBehavior::Squeak),
            (BehaviorCategory::Fly, BuiltinBehavior::FlyNoWay),
        ],
    },
];

#[derive(Clone, Debug)]
/// Ordered ducks plus the registry their bindings resolve against.
pub struct DuckCatalog {
    key: CatalogKey,
    ducks: Vec<Duck>,
    registry: BehaviorRegistry,
}

impl Default for DuckCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl DuckCatalog {
    /// MallardDuck, RedheadDuck and RubberDuck with their usual strategies.
    pub fn standard() -> Self {
        let registry = BehaviorRegistry::standard();
        let ducks = STANDARD_ROSTER
            .iter()
            .map(|entry| {
                let behaviors = BehaviorCategory::ALL.map(|category| {
                    let builtin = entry
                        .overrides
                        .iter()
                        .find(|(bound, _)| *bound == category)
                        .map(|(_, builtin)| *builtin)
                        .unwrap_or_else(|| BuiltinBehavior::default_for(category));
                    (category, registry.builtin(builtin))
                });
                Duck::new(
                    entry.label.to_string(),
                    Some(entry.description.to_string()),
                    behaviors,
                )
            })
            .collect();
        Self {
            key: CatalogKey(CATALOG_SCHEMA_VERSION.to_string()),
            ducks,
            registry,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_ducks(ducks: Vec<Duck>) -> Self {
        Self {
            key: CatalogKey(CATALOG_SCHEMA_VERSION.to_string()),
            ducks,
            registry: BehaviorRegistry::standard(),
        }
    }

    /// Load and validate a catalog document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        validate_against_schema(path, &value)?;

        let document: CatalogDocument = serde_json::from_value(value)
            .with_context(|| format!("decoding catalog {}", path.display()))?;
        Self::from_document(document).with_context(|| format!("loading {}", path.display()))
    }

    /// Build a catalog from an already parsed document.
    ///
    /// Runs the semantic checks only; schema validation happens in `load`.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        validate_schema_version(&document.schema_version)?;

        let mut registry = BehaviorRegistry::standard();
        for scripted in document.behaviors {
            validate_scripted(&scripted)?;
            registry.register(Arc::new(scripted))?;
        }

        let ducks = build_ducks(&document.ducks, &registry)?;
        debug!(
            catalog = %document.schema_version.0,
            ducks = ducks.len(),
            behaviors = registry.len(),
            "catalog loaded"
        );
        Ok(Self {
            key: document.schema_version,
            ducks,
            registry,
        })
    }

    /// The schema version declared by the catalog.
    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    /// Every duck in creation order.
    pub fn list(&self) -> &[Duck] {
        &self.ducks
    }

    pub fn len(&self) -> usize {
        self.ducks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ducks.is_empty()
    }

    pub fn get(&self, index: usize) -> SimResult<&Duck> {
        let len = self.ducks.len();
        self.ducks.get(index).ok_or(SimError::OutOfRange {
            kind: IndexKind::Duck,
            index,
            len,
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> SimResult<&mut Duck> {
        let len = self.ducks.len();
        self.ducks.get_mut(index).ok_or(SimError::OutOfRange {
            kind: IndexKind::Duck,
            index,
            len,
        })
    }

    pub fn label(&self, index: usize) -> SimResult<&str> {
        self.get(index).map(Duck::label)
    }

    /// Index of the first duck carrying `label`.
    pub fn position(&self, label: &str) -> SimResult<usize> {
        self.ducks
            .iter()
            .position(|duck| duck.label() == label)
            .ok_or_else(|| SimError::UnknownDuck {
                label: label.to_string(),
            })
    }

    /// Accepts either a duck label or a catalog index; an exact label wins.
    pub fn resolve_duck(&self, token: &str) -> SimResult<usize> {
        let token = token.trim();
        if let Ok(index) = self.position(token) {
            return Ok(index);
        }
        match token.parse::<usize>() {
            Ok(index) => self.get(index).map(|_| index),
            Err(_) => self.position(token),
        }
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            schema_version: self.key.clone(),
            categories: BehaviorCategory::all().to_vec(),
            ducks: self
                .ducks
                .iter()
                .enumerate()
                .map(|(index, duck)| duck.snapshot(index))
                .collect(),
        }
    }
}

fn build_ducks(definitions: &[DuckDefinition], registry: &BehaviorRegistry) -> Result<Vec<Duck>> {
    if definitions.is_empty() {
        bail!("catalog contains no ducks");
    }

    let mut labels = BTreeSet::new();
    let mut ducks = Vec::with_capacity(definitions.len());
    for def in definitions {
        let label = def.label.trim();
        if label.is_empty() {
            bail!("encountered duck with no label");
        }
        if !labels.insert(label.to_string()) {
            bail!("duplicate duck label {label}");
        }

        let mut behaviors = Vec::with_capacity(BehaviorCategory::ALL.len());
        for category in BehaviorCategory::ALL {
            let behavior = match def.behaviors.get(&category) {
                Some(name) => registry
                    .resolve(category, name.as_str())
                    .with_context(|| format!("duck {label} binds {category}"))?,
                None => registry.default_for(category),
            };
            behaviors.push((category, behavior));
        }
        ducks.push(Duck::new(
            label.to_string(),
            def.description.clone(),
            behaviors,
        ));
    }
    Ok(ducks)
}

fn validate_scripted(behavior: &ScriptedBehavior) -> Result<()> {
    if behavior.name.trim().is_empty() {
        bail!("scripted behaviors must have a name");
    }
    if behavior.message.trim().is_empty() {
        bail!("scripted behavior {} has an empty message", behavior.name);
    }
    Ok(())
}

fn validate_schema_version(key: &CatalogKey) -> Result<()> {
    if key.0.is_empty() {
        bail!("schema_version must not be empty");
    }

    if !key
        .0
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!("schema_version must match ^[A-Za-z0-9_.-]+$, got {}", key.0);
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(&key.0) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            key.0,
            allowed
        );
    }
    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from([CATALOG_SCHEMA_VERSION.to_string()])
}

fn validate_against_schema(catalog_path: &Path, catalog_value: &Value) -> Result<()> {
    let allowed = allowed_schema_versions();
    let options = SchemaLoadOptions {
        allowed_versions: Some(&allowed),
        ..Default::default()
    };
    let schema = match resolve_catalog_schema_path(catalog_path) {
        Some(schema_path) => load_json_schema(&schema_path, options)
            .with_context(|| format!("loading catalog schema {}", schema_path.display()))?,
        None => {
            let bundled: Value =
                serde_json::from_str(BUNDLED_SCHEMA).context("parsing bundled catalog schema")?;
            compile_json_schema(&bundled, "bundled catalog schema", options)?
        }
    };
    debug!(schema = %schema.schema_version, catalog = %catalog_path.display(), "validating catalog");

    schema.validate(
        catalog_value,
        &format!("duck catalog {}", catalog_path.display()),
    )
}

// Prefer a schema shipped next to the catalog's data directory, then the one
// in the source tree; fall back to the copy compiled into the binary.
fn resolve_catalog_schema_path(catalog_path: &Path) -> Option<PathBuf> {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join(SCHEMA_RELATIVE_PATH);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(SCHEMA_RELATIVE_PATH);
    manifest.is_file().then_some(manifest)
}
