pub mod outlet;
pub mod report;
pub mod task;

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::dispenser::outlet::OutletGauge;
use crate::dispenser::report::{BatchReport, DispenseReport};
use crate::dispenser::task::PreparationTask;
use crate::inventory::InventoryStore;
use crate::types::recipe::RecipeTable;

/// Prepares beverages across a fixed number of outlets.
///
/// Beverages are taken in table order and split into rounds of at most
/// `outlets` items. A round runs fully in parallel and must finish before the
/// next one starts.
#[derive(Debug, Clone)]
pub struct Dispenser {
    inventory: Arc<InventoryStore>,
    outlets: NonZeroUsize,
}

impl Dispenser {
    pub fn new(inventory: Arc<InventoryStore>, outlets: NonZeroUsize) -> Self {
        Self { inventory, outlets }
    }

    pub fn inventory(&self) -> &Arc<InventoryStore> {
        &self.inventory
    }

    /// Errors only if a preparation task panics; ingredient shortfalls come
    /// back as failed results.
    pub async fn prepare_all(&self, recipes: &RecipeTable) -> Result<DispenseReport> {
        let mut report = DispenseReport::default();
        let gauge = Arc::new(OutletGauge::default());

        info!(
            beverages = recipes.len(),
            outlets = self.outlets.get(),
            "starting dispense run"
        );

        for (index, batch) in recipes.beverages().chunks(self.outlets.get()).enumerate() {
            let mut tasks = JoinSet::new();
            let busy_at_start = gauge.busy();

            for (outlet, beverage) in batch.iter().enumerate() {
                let lease = gauge.lease();
                let task = PreparationTask::new(beverage.clone(), outlet);
                tasks.spawn(task.run(Arc::clone(&self.inventory), lease));
            }

            let mut results = Vec::with_capacity(batch.len());
            while let Some(joined) = tasks.join_next().await {
                let dispensed = joined
                    .with_context(|| format!("preparation task in batch {index} did not complete"))?;
                debug!(
                    batch = index,
                    beverage = %dispensed.beverage,
                    outlet = dispensed.outlet,
                    prepared = dispensed.result.is_prepared(),
                    "outlet released"
                );
                results.push(dispensed);
            }

            info!(batch = index, size = results.len(), "batch complete");
            report.push(BatchReport {
                index,
                busy_at_start,
                results,
            });
        }

        report.set_peak_busy_outlets(gauge.peak());
        info!(
            prepared = report.prepared_count(),
            failed = report.failed_count(),
            peak_busy_outlets = report.peak_busy_outlets(),
            "dispense run complete"
        );

        Ok(report)
    }
}
