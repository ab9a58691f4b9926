use std::sync::Arc;

use tracing::{debug, warn};

use crate::dispenser::outlet::OutletLease;
use crate::dispenser::report::Dispensed;
use crate::inventory::InventoryStore;
use crate::types::{preparation::PreparationResult, recipe::Beverage};

/// Lifecycle of one beverage on one outlet. `Prepared` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Checking,
    Consumed,
    Rejected,
    Prepared,
    Failed,
}

#[derive(Debug)]
pub struct PreparationTask {
    beverage: Beverage,
    outlet: usize,
    state: TaskState,
}

impl PreparationTask {
    pub fn new(beverage: Beverage, outlet: usize) -> Self {
        Self {
            beverage,
            outlet,
            state: TaskState::Pending,
        }
    }

    /// Holds `lease` until the beverage reaches a terminal state.
    pub async fn run(mut self, inventory: Arc<InventoryStore>, lease: OutletLease) -> Dispensed {
        self.transition(TaskState::Checking);

        let result = PreparationResult::from(inventory.try_consume(&self.beverage.recipe));

        match &result {
            PreparationResult::Prepared => {
                self.transition(TaskState::Consumed);
                self.transition(TaskState::Prepared);
            }
            PreparationResult::Failed(reason) => {
                self.transition(TaskState::Rejected);
                warn!(
                    beverage = %self.beverage.name,
                    ingredient = reason.ingredient(),
                    %reason,
                    "beverage rejected"
                );
                self.transition(TaskState::Failed);
            }
        }
        drop(lease);

        Dispensed {
            beverage: self.beverage.name,
            outlet: self.outlet,
            result,
        }
    }

    fn transition(&mut self, next: TaskState) {
        debug!(
            beverage = %self.beverage.name,
            outlet = self.outlet,
            from = ?self.state,
            to = ?next
        );
        self.state = next;
    }
}
