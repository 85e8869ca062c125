// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Admission control for pixel tasks.
//!
//! A 1024 × 1024 image has a million pixels, and we don't want a
//! million tasks queued up at once.  The controller holds a counter
//! of tasks in flight and a limit.  Before handing a pixel off, the
//! sweep asks for a slot; if the counter is below the limit it gets
//! one and the counter goes up, otherwise it computes the pixel
//! itself.  The slot goes back when the task is done.
//!
//! The check and the increment are a single compare-and-swap, so two
//! threads can never both squeeze into the last free slot: the
//! counter never exceeds the limit.  A limit of `n` means at most `n`
//! tasks, not `n + 1`.  A limit of zero turns concurrency off.
//!
//! Slots are handed out as `Slot` guards and returned when the guard
//! is dropped, so a task that panics still gives its slot back.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts tasks in flight against a fixed limit.
#[derive(Debug)]
pub struct AdmissionController {
    limit: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    admitted: AtomicUsize,
}

impl AdmissionController {
    /// A controller that lets at most `limit` tasks be in flight.
    pub fn new(limit: usize) -> Self {
        AdmissionController {
            limit,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            admitted: AtomicUsize::new(0),
        }
    }

    /// The configured limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Reserves a slot if one is free.  Returns false when the caller
    /// should do the work itself.  Every `true` must be matched by
    /// exactly one call to `release`; `try_acquire` does that for you.
    pub fn try_admit(&self) -> bool {
        let mut current = self.in_flight.load(Ordering::Relaxed);
        loop {
            if current >= self.limit {
                return false;
            }
            match self.in_flight.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak.fetch_max(current + 1, Ordering::Relaxed);
                    self.admitted.fetch_add(1, Ordering::Relaxed);
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Gives a slot back.
    pub fn release(&self) {
        let previous = self.in_flight.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "released a slot that was never admitted");
    }

    /// Like `try_admit`, but the slot is released when the returned
    /// guard is dropped.
    pub fn try_acquire(&self) -> Option<Slot> {
        if self.try_admit() {
            Some(Slot { controller: self })
        } else {
            None
        }
    }

    /// Tasks currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The highest `in_flight` has ever been.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// How many slots were handed out in total.
    pub fn admitted(&self) -> usize {
        self.admitted.load(Ordering::Relaxed)
    }
}

/// A reserved slot.  Dropping it returns the slot.
#[derive(Debug)]
pub struct Slot<'a> {
    controller: &'a AdmissionController,
}

impl<'a> Drop for Slot<'a> {
    fn drop(&mut self) {
        self.controller.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn admits_exactly_the_limit() {
        let ac = AdmissionController::new(3);
        assert!(ac.try_admit());
        assert!(ac.try_admit());
        assert!(ac.try_admit());
        assert!(!ac.try_admit());
        assert_eq!(ac.in_flight(), 3);
        ac.release();
        assert!(ac.try_admit());
        assert!(!ac.try_admit());
        assert_eq!(ac.peak(), 3);
        assert_eq!(ac.admitted(), 4);
    }

    #[test]
    fn zero_limit_never_admits() {
        let ac = AdmissionController::new(0);
        assert!(!ac.try_admit());
        assert!(ac.try_acquire().is_none());
        assert_eq!(ac.peak(), 0);
    }

    #[test]
    fn slot_guard_releases_on_drop() {
        let ac = AdmissionController::new(1);
        {
            let _slot = ac.try_acquire().unwrap();
            assert_eq!(ac.in_flight(), 1);
            assert!(ac.try_acquire().is_none());
        }
        assert_eq!(ac.in_flight(), 0);
        assert!(ac.try_acquire().is_some());
    }

    #[test]
    fn contended_admission_never_exceeds_limit() {
        let limit = 4;
        let threads = 16;
        let ac = AdmissionController::new(limit);
        let start = Barrier::new(threads);
        crossbeam::scope(|scope| {
            for _ in 0..threads {
                let (ac, start) = (&ac, &start);
                scope.spawn(move |_| {
                    start.wait();
                    for _ in 0..10_000 {
                        if let Some(_slot) = ac.try_acquire() {
                            assert!(ac.in_flight() <= limit);
                        }
                    }
                });
            }
        })
        .unwrap();
        assert!(ac.peak() <= limit);
        assert!(ac.peak() >= 1);
        assert_eq!(ac.in_flight(), 0);
    }
}
