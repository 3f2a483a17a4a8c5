//! Join point for a fixed number of independent loads.
//!
//! A [`LoadBarrier`] counts outstanding loads. Every arrival, successful or
//! not, decrements the counter; the arrival that brings it to zero receives
//! the gathered results. After that the barrier stays complete and any
//! further arrival is ignored, so the release happens exactly once.

/// Counts pending loads and releases the gathered results at zero.
#[derive(Debug)]
pub struct LoadBarrier<T> {
    pending: usize,
    items: Vec<T>,
    failed: usize,
    released: bool,
}

impl<T> LoadBarrier<T> {
    /// Barrier expecting `pending` arrivals.
    pub fn new(pending: usize) -> Self {
        Self {
            pending,
            items: Vec::with_capacity(pending),
            failed: 0,
            released: false,
        }
    }

    /// Arrivals still outstanding.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Arrivals that reported failure so far.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// `true` once the results have been released.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Record one arrival. `None` marks a failed load.
    ///
    /// Returns the gathered results if this arrival completed the barrier.
    pub fn arrive(&mut self, item: Option<T>) -> Option<Vec<T>> {
        if self.released || self.pending == 0 {
            log::debug!("arrival after barrier completion ignored");
            return None;
        }
        self.pending -= 1;
        match item {
            Some(item) => self.items.push(item),
            None => self.failed += 1,
        }
        self.take_ready()
    }

    /// Release the results if nothing is pending and they have not been
    /// released yet. Covers the zero-loads case, where no arrival will ever
    /// come.
    pub fn take_ready(&mut self) -> Option<Vec<T>> {
        if self.released || self.pending > 0 {
            return None;
        }
        self.released = true;
        Some(std::mem::take(&mut self.items))
    }

    /// Count every outstanding load as failed and release what arrived.
    ///
    /// Used when the producers went away without reporting.
    pub fn abandon(&mut self) -> Option<Vec<T>> {
        self.failed += self.pending;
        self.pending = 0;
        self.take_ready()
    }
}
