//! Deferred execution for time-based operators.
//!
//! A [`Scheduler`] runs a [`OnceTask`] after an optional delay and returns a
//! [`TaskHandle`] that cancels it. Two schedulers ship with the crate:
//!
//! - `futures::executor::LocalSpawner` (feature `futures-scheduler`), which
//!   spawns the task on a `LocalPool` and waits with `futures-time` when the
//!   `timer` feature is on.
//! - [`TestScheduler`], a virtual clock for deterministic tests.

use crate::subscription::Subscription;
pub use std::time::Duration;
use std::{cell::Cell, rc::Rc};

mod test_scheduler;
pub use test_scheduler::TestScheduler;

/// A function pointer plus the arguments it runs with. Using a plain `fn`
/// keeps tasks free of captured borrows, so operators pass their shared
/// state in `args`.
pub struct OnceTask<Args> {
  task: fn(Args),
  args: Args,
}

impl<Args> OnceTask<Args> {
  #[inline]
  pub fn new(task: fn(Args), args: Args) -> Self { OnceTask { task, args } }

  #[inline]
  pub fn run(self) { (self.task)(self.args) }
}

/// Orders tasks and runs them, possibly later.
pub trait Scheduler<Args> {
  fn schedule(&self, task: OnceTask<Args>, delay: Option<Duration>) -> TaskHandle;
}

/// Cancellation handle of a scheduled task. Closed once the task has started
/// or was cancelled.
#[derive(Clone)]
pub struct TaskHandle {
  closed: Rc<Cell<bool>>,
  #[cfg(feature = "futures-scheduler")]
  abort: Option<futures::future::AbortHandle>,
}

impl TaskHandle {
  pub(crate) fn new() -> Self {
    TaskHandle {
      closed: Rc::new(Cell::new(false)),
      #[cfg(feature = "futures-scheduler")]
      abort: None,
    }
  }

  #[inline]
  pub(crate) fn mark_finished(&self) { self.closed.set(true) }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    self.closed.set(true);
    #[cfg(feature = "futures-scheduler")]
    if let Some(abort) = self.abort {
      abort.abort();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed.get() }
}

#[cfg(feature = "futures-scheduler")]
impl<Args: 'static> Scheduler<Args> for futures::executor::LocalSpawner {
  fn schedule(&self, task: OnceTask<Args>, delay: Option<Duration>) -> TaskHandle {
    use futures::{
      future::{AbortHandle, Abortable},
      task::LocalSpawnExt,
    };

    let (abort, registration) = AbortHandle::new_pair();
    let mut handle = TaskHandle::new();
    handle.abort = Some(abort);
    let closed = handle.closed.clone();

    let fut = async move {
      if let Some(delay) = delay {
        sleep(delay).await;
      }
      closed.set(true);
      task.run();
    };
    let spawned = self.spawn_local(async move {
      let _ = Abortable::new(fut, registration).await;
    });
    if let Err(e) = spawned {
      log::error!("cannot spawn scheduled task: {e}");
      handle.mark_finished();
    }
    handle
  }
}

#[cfg(all(feature = "futures-scheduler", feature = "timer", not(target_arch = "wasm32")))]
async fn sleep(delay: Duration) { futures_time::task::sleep(delay.into()).await; }

#[cfg(all(feature = "futures-scheduler", not(all(feature = "timer", not(target_arch = "wasm32")))))]
async fn sleep(delay: Duration) {
  log::warn!("no timer available, task delayed by {delay:?} runs right away");
}
