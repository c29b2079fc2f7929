use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

type Task = Box<dyn FnOnce()>;

/// A single-threaded "next turn" task queue.
///
/// Writes that must not happen while the host is computing its own update (e.g. writing the
/// selection binding back) are deferred here and run on the next [`Scheduler::run_pending`].
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs every task queued before this call, in order.
    ///
    /// Tasks deferred by those tasks wait for the next turn. Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let batch = core::mem::take(&mut *self.queue.borrow_mut());
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }
}
