//! Behavior dispatch over a duck catalog.
//!
//! `Simulator` owns the catalog and exposes the four core operations: list
//! ducks, list categories, execute a duck's bound behavior, and override one
//! binding. Overrides resolve and validate before touching any duck, so a
//! failed call leaves every binding as it was. `SharedSimulator` puts the
//! whole catalog behind one lock for callers on several threads.

use crate::behavior::SharedBehavior;
use crate::catalog::{BehaviorCategory, CatalogSnapshot, Duck, DuckCatalog};
use crate::error::{SimError, SimResult};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct Simulator {
    catalog: DuckCatalog,
}

/// One executed behavior, as reported by `perform_all`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Performance {
    pub duck: String,
    pub category: BehaviorCategory,
    pub implementation: String,
    pub result: String,
}

impl Simulator {
    pub fn new(catalog: DuckCatalog) -> Self {
        Self { catalog }
    }

    /// Simulator over the built-in three-duck roster.
    pub fn standard() -> Self {
        Self::new(DuckCatalog::standard())
    }

    pub fn catalog(&self) -> &DuckCatalog {
        &self.catalog
    }

    pub fn list_entities(&self) -> &[Duck] {
        self.catalog.list()
    }

    pub fn list_categories(&self) -> &'static [BehaviorCategory] {
        BehaviorCategory::all()
    }

    /// Run the strategy currently bound to `category` on the duck at `duck_index`.
    pub fn execute(&self, duck_index: usize, category: BehaviorCategory) -> SimResult<String> {
        let (duck, behavior) = self.bound(duck_index, category)?;
        let result = behavior.execute();
        debug!(
            duck = duck.label(),
            %category,
            implementation = behavior.name(),
            "behavior executed"
        );
        Ok(result)
    }

    fn bound(
        &self,
        duck_index: usize,
        category: BehaviorCategory,
    ) -> SimResult<(&Duck, &SharedBehavior)> {
        let duck = self.catalog.get(duck_index)?;
        let behavior = duck
            .behavior(category)
            .ok_or_else(|| SimError::UnboundCategory {
                duck: duck.label().to_string(),
                category,
            })?;
        Ok((duck, behavior))
    }

    /// `execute` with the category given by display position.
    pub fn execute_at(&self, duck_index: usize, category_index: usize) -> SimResult<String> {
        let category = BehaviorCategory::at(category_index)?;
        self.execute(duck_index, category)
    }

    /// Bind `implementation` to `category` on one duck.
    pub fn override_behavior(
        &mut self,
        duck_index: usize,
        category: BehaviorCategory,
        implementation: &str,
    ) -> SimResult<()> {
        self.catalog.get(duck_index)?;
        let behavior = self.catalog.registry().resolve(category, implementation)?;
        let duck = self.catalog.get_mut(duck_index)?;
        duck.bind(category, behavior);
        info!(
            duck = duck.label(),
            %category,
            implementation,
            "behavior overridden"
        );
        Ok(())
    }

    pub fn is_overridden(&self, duck_index: usize, category: BehaviorCategory) -> SimResult<bool> {
        Ok(self.catalog.get(duck_index)?.is_overridden(category))
    }

    /// Execute every category on every duck, in catalog then display order.
    pub fn perform_all(&self) -> SimResult<Vec<Performance>> {
        let mut performances = Vec::new();
        for index in 0..self.catalog.len() {
            for category in BehaviorCategory::all() {
                let (duck, behavior) = self.bound(index, *category)?;
                performances.push(Performance {
                    duck: duck.label().to_string(),
                    category: *category,
                    implementation: behavior.name().to_string(),
                    result: behavior.execute(),
                });
            }
        }
        Ok(performances)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.catalog.snapshot()
    }
}

/// Thread-safe handle to a simulator; clones share the same catalog.
#[derive(Clone, Debug, Default)]
pub struct SharedSimulator {
    inner: Arc<Mutex<Simulator>>,
}

impl SharedSimulator {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulator)),
        }
    }

    // Overrides validate before mutating, so a poisoned guard still holds a
    // consistent catalog.
    fn lock(&self) -> MutexGuard<'_, Simulator> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn labels(&self) -> Vec<String> {
        self.lock()
            .list_entities()
            .iter()
            .map(|duck| duck.label().to_string())
            .collect()
    }

    pub fn execute(&self, duck_index: usize, category: BehaviorCategory) -> SimResult<String> {
        self.lock().execute(duck_index, category)
    }

    pub fn override_behavior(
        &self,
        duck_index: usize,
        category: BehaviorCategory,
        implementation: &str,
    ) -> SimResult<()> {
        self.lock()
            .override_behavior(duck_index, category, implementation)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.lock().snapshot()
    }

    /// Run `f` with the catalog locked for its whole duration.
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulator) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BuiltinBehavior;
    use crate::error::IndexKind;
    use std::thread;

    const FLY: BehaviorCategory = BehaviorCategory::Fly;

    #[test]
    fn fresh_catalog_executes_defaults() {
        let sim = Simulator::standard();
        assert_eq!(sim.execute(0, FLY).unwrap(), "I'm flying!!");
        assert_eq!(sim.execute(0, BehaviorCategory::Quack).unwrap(), "Quack");
        assert_eq!(
            sim.execute(1, BehaviorCategory::Swim).unwrap(),
            "All ducks float, even decoys!"
        );
        assert_eq!(sim.execute(2, BehaviorCategory::Quack).unwrap(), "Squeak");
        assert_eq!(sim.execute(2, FLY).unwrap(), "I can't fly");
    }

    #[test]
    fn rocket_override_is_scoped_to_one_duck() {
        let mut sim = Simulator::standard();
        sim.override_behavior(0, FLY, "rocket_powered").unwrap();

        assert_eq!(sim.execute(0, FLY).unwrap(), "I'm flying with a rocket!");
        assert_eq!(sim.execute(1, FLY).unwrap(), "I'm flying!!");
        assert_eq!(sim.execute(2, FLY).unwrap(), "I can't fly");
        assert_eq!(sim.execute(0, BehaviorCategory::Quack).unwrap(), "Quack");
        assert!(sim.is_overridden(0, FLY).unwrap());
        assert!(!sim.is_overridden(1, FLY).unwrap());
    }

    #[test]
    fn repeated_override_leaves_same_state() {
        let mut once = Simulator::standard();
        once.override_behavior(1, FLY, "rocket_powered").unwrap();

        let mut twice = Simulator::standard();
        twice.override_behavior(1, FLY, "rocket_powered").unwrap();
        twice.override_behavior(1, FLY, "rocket_powered").unwrap();

        assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn invalid_override_changes_nothing() {
        let mut sim = Simulator::standard();
        let before = sim.snapshot();

        assert_eq!(
            sim.override_behavior(3, FLY, "rocket_powered").unwrap_err(),
            SimError::OutOfRange {
                kind: IndexKind::Duck,
                index: 3,
                len: 3
            }
        );
        assert!(matches!(
            sim.override_behavior(0, FLY, "squeak"),
            Err(SimError::CategoryMismatch { .. })
        ));
        assert!(matches!(
            sim.override_behavior(0, FLY, "warp_drive"),
            Err(SimError::UnknownImplementation { .. })
        ));
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn out_of_range_execute_is_reported() {
        let sim = Simulator::standard();
        assert!(matches!(
            sim.execute(9, FLY),
            Err(SimError::OutOfRange {
                kind: IndexKind::Duck,
                ..
            })
        ));
        assert!(matches!(
            sim.execute_at(0, 3),
            Err(SimError::OutOfRange {
                kind: IndexKind::Category,
                ..
            })
        ));
        assert_eq!(sim.execute_at(0, 2).unwrap(), "I'm flying!!");
    }

    #[test]
    fn missing_binding_surfaces_as_unbound_category() {
        let grounded = Duck::new(
            "GroundedDuck".to_string(),
            None,
            [
                (
                    BehaviorCategory::Quack,
                    Arc::new(BuiltinBehavior::Quack) as SharedBehavior,
                ),
                (
                    BehaviorCategory::Swim,
                    Arc::new(BuiltinBehavior::Float) as SharedBehavior,
                ),
            ],
        );
        let sim = Simulator::new(DuckCatalog::from_ducks(vec![grounded]));
        let expected = SimError::UnboundCategory {
            duck: "GroundedDuck".to_string(),
            category: FLY,
        };

        assert_eq!(sim.execute(0, BehaviorCategory::Quack).unwrap(), "Quack");
        assert_eq!(sim.execute(0, FLY).unwrap_err(), expected);
        assert_eq!(sim.perform_all().unwrap_err(), expected);
    }

    #[test]
    fn perform_all_covers_every_pair() {
        let sim = Simulator::standard();
        let performances = sim.perform_all().unwrap();
        assert_eq!(performances.len(), 9);
        assert_eq!(performances[0].duck, "MallardDuck");
        assert_eq!(performances[0].category, BehaviorCategory::Quack);
        assert_eq!(performances[8].implementation, "fly_no_way");
    }

    #[test]
    fn shared_simulator_serializes_concurrent_overrides() {
        let shared = SharedSimulator::new(Simulator::standard());
        let handles: Vec<_> = (0..3)
            .map(|index| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .override_behavior(index, FLY, "rocket_powered")
                        .unwrap();
                    shared.execute(index, FLY).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "I'm flying with a rocket!");
        }
        assert_eq!(shared.labels().len(), 3);
        assert!(shared.with(|sim| sim.is_overridden(2, FLY).unwrap()));
    }
}
