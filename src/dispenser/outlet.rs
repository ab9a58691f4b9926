use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts outlets that are occupied by a dispatched beverage.
#[derive(Debug, Default)]
pub struct OutletGauge {
    busy: AtomicUsize,
    peak: AtomicUsize,
}

impl OutletGauge {
    /// Occupies one outlet until the returned lease is dropped.
    pub fn lease(self: &Arc<Self>) -> OutletLease {
        let busy = self.busy.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(busy, Ordering::SeqCst);

        OutletLease {
            gauge: Arc::clone(self),
        }
    }

    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Released on drop, including when the holding task panics.
#[derive(Debug)]
pub struct OutletLease {
    gauge: Arc<OutletGauge>,
}

impl Drop for OutletLease {
    fn drop(&mut self) {
        self.gauge.busy.fetch_sub(1, Ordering::SeqCst);
    }
}
