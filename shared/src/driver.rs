//! Event driver for single-threaded hosts
//!
//! Widgets can fire while a cycle is still dispatching, typically from inside
//! a sink callback. Such changes are queued and folded into one more cycle
//! once the running one returns, so the most recent change always decides the
//! next dispatch and no cycle is ever interleaved with another.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::models::FilterChange;
use crate::sync::{DispatchReport, ViewSynchronizer};

pub struct SyncDriver {
    synchronizer: RefCell<ViewSynchronizer>,
    pending: RefCell<VecDeque<FilterChange>>,
}

impl SyncDriver {
    pub fn new(synchronizer: ViewSynchronizer) -> Self {
        Self {
            synchronizer: RefCell::new(synchronizer),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Run the first dispatch. `None` if called from inside a running cycle.
    pub fn initialize(&self) -> Option<DispatchReport> {
        let mut synchronizer = self.synchronizer.try_borrow_mut().ok()?;
        let report = synchronizer.initialize();
        Some(self.drain(&mut synchronizer).unwrap_or(report))
    }

    /// Submit a control change.
    ///
    /// Returns the report of the last cycle run by this call, or `None` when
    /// the change was queued behind a cycle already in progress.
    pub fn submit(&self, change: FilterChange) -> Option<DispatchReport> {
        self.pending.borrow_mut().push_back(change);

        let Ok(mut synchronizer) = self.synchronizer.try_borrow_mut() else {
            tracing::trace!("Cycle in progress; control change queued");
            return None;
        };
        self.drain(&mut synchronizer)
    }

    /// Read access to the synchronizer between cycles
    pub fn with<R>(&self, f: impl FnOnce(&ViewSynchronizer) -> R) -> Option<R> {
        self.synchronizer.try_borrow().ok().map(|synchronizer| f(&synchronizer))
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    fn drain(&self, synchronizer: &mut ViewSynchronizer) -> Option<DispatchReport> {
        let mut last = None;
        loop {
            let batch: Vec<FilterChange> = self.pending.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                return last;
            }
            tracing::trace!(changes = batch.len(), "Running cycle for queued changes");
            last = Some(synchronizer.handle_all(batch));
        }
    }
}
