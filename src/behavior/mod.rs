//! Swappable duck behaviors.
//!
//! Every strategy implements [`Behavior`] and is shared as an
//! `Arc<dyn Behavior>` so a duck's binding can be replaced without touching
//! the strategy itself. [`BehaviorRegistry`] maps implementation names to the
//! shared instances that overrides and catalog files refer to.

pub mod registry;
pub mod strategies;

use crate::catalog::BehaviorCategory;
use std::fmt;
use std::sync::Arc;

pub use registry::BehaviorRegistry;
pub use strategies::{BuiltinBehavior, ScriptedBehavior};

/// A named strategy for one behavior category.
pub trait Behavior: fmt::Debug + Send + Sync {
    /// Implementation name used by catalogs and overrides.
    fn name(&self) -> &str;

    /// The category this strategy can be bound under.
    fn category(&self) -> BehaviorCategory;

    /// Perform the behavior and describe the outcome.
    fn execute(&self) -> String;
}

pub type SharedBehavior = Arc<dyn Behavior>;
