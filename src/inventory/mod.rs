use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::types::{preparation::FailureReason, recipe::Recipe};

/// Remaining ingredient quantities shared by every outlet.
///
/// All reads that feed a consumption decision happen under the same lock as
/// the matching decrement, so no two recipes can spend the same units.
#[derive(Debug)]
pub struct InventoryStore {
    quantities: Mutex<HashMap<String, u64>>,
}

impl InventoryStore {
    pub fn new<I, S>(quantities: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            quantities: Mutex::new(
                quantities
                    .into_iter()
                    .map(|(name, quantity)| (name.into(), quantity))
                    .collect(),
            ),
        }
    }

    /// Checks every requirement of `recipe` and, only if all hold, deducts
    /// them. On failure the store is untouched and the first failing
    /// ingredient in recipe order is reported.
    pub fn try_consume(&self, recipe: &Recipe) -> Result<(), FailureReason> {
        let mut quantities = self.lock();
        let mut remaining = Vec::new();

        for (ingredient, required) in recipe.ingredients() {
            let Some(&available) = quantities.get(ingredient) else {
                return Err(FailureReason::IngredientUnavailable {
                    ingredient: ingredient.to_string(),
                });
            };
            let Some(left) = available.checked_sub(required) else {
                return Err(FailureReason::IngredientInsufficient {
                    ingredient: ingredient.to_string(),
                });
            };
            remaining.push((ingredient, required, left));
        }

        for (ingredient, consumed, left) in remaining {
            if let Some(available) = quantities.get_mut(ingredient) {
                *available = left;
                debug!(ingredient, consumed, remaining = left);
            }
        }

        Ok(())
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.lock()
            .iter()
            .map(|(name, quantity)| (name.clone(), *quantity))
            .collect()
    }

    // Nothing in the critical section can panic between the first and last
    // write, so a poisoned guard still holds a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.quantities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl InventoryStore {
    pub fn quantity(&self, ingredient: &str) -> Option<u64> {
        self.lock().get(ingredient).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn consumes_all_requirements_when_satisfiable() {
        let store = InventoryStore::new([("water", 100), ("coffee", 10)]);

        let outcome = store.try_consume(&Recipe::new([("water", 30), ("coffee", 6)]));

        assert_eq!(outcome, Ok(()));
        assert_eq!(store.quantity("water"), Some(70));
        assert_eq!(store.quantity("coffee"), Some(4));
    }

    #[test]
    fn exact_quantity_drains_to_zero() {
        let store = InventoryStore::new([("milk", 20)]);

        assert_eq!(store.try_consume(&Recipe::new([("milk", 20)])), Ok(()));
        assert_eq!(store.quantity("milk"), Some(0));
        assert!(store.try_consume(&Recipe::new([("milk", 1)])).is_err());
    }

    #[test]
    fn insufficient_leaves_store_unchanged() {
        let store = InventoryStore::new([("water", 100), ("coffee", 5)]);
        let before = store.snapshot();

        let outcome = store.try_consume(&Recipe::new([("water", 30), ("coffee", 6)]));

        assert_eq!(
            outcome,
            Err(FailureReason::IngredientInsufficient {
                ingredient: "coffee".to_string()
            })
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn unavailable_leaves_store_unchanged() {
        let store = InventoryStore::new([("water", 100), ("milk", 50)]);
        let before = store.snapshot();

        let outcome = store.try_consume(&Recipe::new([("water", 30), ("milk", 20), ("sugar", 5)]));

        assert_eq!(
            outcome,
            Err(FailureReason::IngredientUnavailable {
                ingredient: "sugar".to_string()
            })
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn repeated_ingredient_is_checked_against_its_total() {
        let store = InventoryStore::new([("water", 100)]);

        let outcome = store.try_consume(&Recipe::new([("water", 60), ("water", 60)]));

        assert_eq!(
            outcome,
            Err(FailureReason::IngredientInsufficient {
                ingredient: "water".to_string()
            })
        );
        assert_eq!(store.quantity("water"), Some(100));

        assert_eq!(store.try_consume(&Recipe::new([("water", 40), ("water", 60)])), Ok(()));
        assert_eq!(store.quantity("water"), Some(0));
    }

    #[test]
    fn first_failing_ingredient_in_recipe_order_is_reported() {
        let store = InventoryStore::new([("water", 10), ("coffee", 1)]);

        let coffee_first = Recipe::new([("coffee", 5), ("sugar", 1), ("water", 50)]);
        let sugar_first = Recipe::new([("sugar", 1), ("coffee", 5), ("water", 50)]);

        assert_eq!(
            store.try_consume(&coffee_first),
            Err(FailureReason::IngredientInsufficient {
                ingredient: "coffee".to_string()
            })
        );
        assert_eq!(
            store.try_consume(&sugar_first),
            Err(FailureReason::IngredientUnavailable {
                ingredient: "sugar".to_string()
            })
        );
    }

    #[test]
    fn parallel_consumers_never_overspend() {
        let store = Arc::new(InventoryStore::new([("water", 1_000), ("coffee", 100)]));
        let recipe = Arc::new(Recipe::new([("water", 30), ("coffee", 3)]));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                let recipe = Arc::clone(&recipe);
                thread::spawn(move || store.try_consume(&recipe).is_ok())
            })
            .collect();

        let prepared = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|prepared| *prepared)
            .count() as u64;

        // water allows 33, coffee allows 33
        assert_eq!(prepared, 33);
        assert_eq!(store.quantity("water"), Some(1_000 - 30 * prepared));
        assert_eq!(store.quantity("coffee"), Some(100 - 3 * prepared));
    }
}
