use tracing::debug;

use crate::status::StatusSink;
use crate::types::preparation::PreparationResult;

/// Outcome of one beverage, tagged with the outlet slot that handled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispensed {
    pub beverage: String,
    pub outlet: usize,
    pub result: PreparationResult,
}

/// Results of one outlet-bounded round, in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub index: usize,
    /// Outlets still occupied by earlier rounds when this one was dispatched.
    pub busy_at_start: usize,
    pub results: Vec<Dispensed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispenseReport {
    batches: Vec<BatchReport>,
    peak_busy_outlets: usize,
}

impl DispenseReport {
    pub fn push(&mut self, batch: BatchReport) {
        self.batches.push(batch);
    }

    pub fn set_peak_busy_outlets(&mut self, peak: usize) {
        self.peak_busy_outlets = peak;
    }

    pub fn peak_busy_outlets(&self) -> usize {
        self.peak_busy_outlets
    }

    pub fn batches(&self) -> &[BatchReport] {
        &self.batches
    }

    pub fn results(&self) -> impl Iterator<Item = &Dispensed> {
        self.batches.iter().flat_map(|batch| batch.results.iter())
    }

    pub fn prepared_count(&self) -> usize {
        self.results()
            .filter(|dispensed| dispensed.result.is_prepared())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.results().count() - self.prepared_count()
    }

    pub fn emit_to(&self, sink: &mut dyn StatusSink) {
        for batch in &self.batches {
            debug!(
                batch = batch.index,
                busy_at_start = batch.busy_at_start,
                size = batch.results.len(),
                "emitting batch"
            );
            for dispensed in &batch.results {
                sink.emit(&dispensed.beverage, &dispensed.result);
            }
        }
    }
}
