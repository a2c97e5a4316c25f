//! Catalog document types and the runtime duck they produce.
//!
//! `CatalogDocument` mirrors `schema/duck_catalog.schema.json`; `Duck` is the
//! mutable in-memory entity with one bound strategy per category. Use
//! `DuckCatalog` to turn a document into validated ducks.

use crate::behavior::{ScriptedBehavior, SharedBehavior};
use crate::catalog::identity::{BehaviorCategory, CatalogKey, ImplementationName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Full catalog as stored on disk.
pub struct CatalogDocument {
    pub schema_version: CatalogKey,
    #[serde(default)]
    pub behaviors: Vec<ScriptedBehavior>,
    pub ducks: Vec<DuckDefinition>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
/// One duck entry; omitted categories fall back to the category default.
pub struct DuckDefinition {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub behaviors: BTreeMap<BehaviorCategory, ImplementationName>,
}

#[derive(Clone, Debug)]
struct Binding {
    behavior: SharedBehavior,
    overridden: bool,
}

/// A simulated duck and its current strategies.
#[derive(Clone, Debug)]
pub struct Duck {
    label: String,
    description: Option<String>,
    bindings: BTreeMap<BehaviorCategory, Binding>,
}

impl Duck {
    pub(crate) fn new(
        label: String,
        description: Option<String>,
        behaviors: impl IntoIterator<Item = (BehaviorCategory, SharedBehavior)>,
    ) -> Self {
        let bindings = behaviors
            .into_iter()
            .map(|(category, behavior)| {
                (
                    category,
                    Binding {
                        behavior,
                        overridden: false,
                    },
                )
            })
            .collect();
        Self {
            label,
            description,
            bindings,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Strategy currently bound for `category`.
    pub fn behavior(&self, category: BehaviorCategory) -> Option<&SharedBehavior> {
        self.bindings.get(&category).map(|binding| &binding.behavior)
    }

    /// Whether the binding for `category` has been replaced since construction.
    pub fn is_overridden(&self, category: BehaviorCategory) -> bool {
        self.bindings
            .get(&category)
            .map(|binding| binding.overridden)
            .unwrap_or(false)
    }

    pub(crate) fn bind(&mut self, category: BehaviorCategory, behavior: SharedBehavior) {
        self.bindings.insert(
            category,
            Binding {
                behavior,
                overridden: true,
            },
        );
    }

    /// Serializable view of the duck's bindings.
    pub fn snapshot(&self, index: usize) -> DuckSnapshot {
        DuckSnapshot {
            index,
            label: self.label.clone(),
            description: self.description.clone(),
            behaviors: self
                .bindings
                .iter()
                .map(|(category, binding)| {
                    (
                        *category,
                        BindingSnapshot {
                            implementation: ImplementationName::from(binding.behavior.name()),
                            overridden: binding.overridden,
                        },
                    )
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DuckSnapshot {
    pub index: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub behaviors: BTreeMap<BehaviorCategory, BindingSnapshot>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BindingSnapshot {
    pub implementation: ImplementationName,
    pub overridden: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
/// Whole-catalog view emitted by `duck-sim --json`.
pub struct CatalogSnapshot {
    pub schema_version: CatalogKey,
    pub categories: Vec<BehaviorCategory>,
    pub ducks: Vec<DuckSnapshot>,
}
