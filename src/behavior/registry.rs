//! Name-indexed store of behavior strategies.
//!
//! The registry owns one shared instance per implementation name. Overrides
//! resolve names here, so binding the same name twice hands the duck the same
//! `Arc` and repeated overrides leave identical state behind.

use crate::behavior::{BuiltinBehavior, SharedBehavior};
use crate::catalog::BehaviorCategory;
use crate::error::{SimError, SimResult};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct BehaviorRegistry {
    entries: Vec<SharedBehavior>,
    by_name: BTreeMap<String, usize>,
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl BehaviorRegistry {
    /// Registry holding every built-in strategy.
    pub fn standard() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            by_name: BTreeMap::new(),
        };
        for builtin in BuiltinBehavior::ALL {
            registry.insert(Arc::new(builtin));
        }
        registry
    }

    /// Add a strategy under its own name. Names are never shadowed.
    pub fn register(&mut self, behavior: SharedBehavior) -> SimResult<()> {
        if self.by_name.contains_key(behavior.name()) {
            return Err(SimError::DuplicateImplementation {
                name: behavior.name().to_string(),
            });
        }
        self.insert(behavior);
        Ok(())
    }

    fn insert(&mut self, behavior: SharedBehavior) {
        self.by_name
            .insert(behavior.name().to_string(), self.entries.len());
        self.entries.push(behavior);
    }

    pub fn get(&self, name: &str) -> SimResult<SharedBehavior> {
        self.by_name
            .get(name)
            .map(|&slot| Arc::clone(&self.entries[slot]))
            .ok_or_else(|| SimError::UnknownImplementation {
                name: name.to_string(),
            })
    }

    /// Look up `name` and require that it can be bound under `category`.
    pub fn resolve(&self, category: BehaviorCategory, name: &str) -> SimResult<SharedBehavior> {
        let behavior = self.get(name)?;
        if behavior.category() != category {
            return Err(SimError::CategoryMismatch {
                name: name.to_string(),
                expected: category,
                actual: behavior.category(),
            });
        }
        Ok(behavior)
    }

    pub fn default_for(&self, category: BehaviorCategory) -> SharedBehavior {
        self.builtin(BuiltinBehavior::default_for(category))
    }

    /// Shared instance of a built-in strategy.
    pub fn builtin(&self, builtin: BuiltinBehavior) -> SharedBehavior {
        // `standard` fills the first slots in declaration order and nothing is
        // ever removed.
        Arc::clone(&self.entries[builtin as usize])
    }

    /// Strategies available for a category, in registration order.
    pub fn variants(&self, category: BehaviorCategory) -> impl Iterator<Item = &SharedBehavior> {
        self.entries
            .iter()
            .filter(move |behavior| behavior.category() == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedBehavior> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
