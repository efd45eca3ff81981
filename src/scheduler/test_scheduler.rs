//! Virtual time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when a test calls [`TestScheduler::advance_by`] or
//! [`TestScheduler::flush`]; due tasks run synchronously inside that call.
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! TestScheduler::init();
//! let mut subject = Subject::<i32, ()>::new();
//! subject
//!   .clone()
//!   .throttle(Duration::from_millis(100), true, TestScheduler)
//!   .subscribe(|v| println!("{v}"));
//! subject.next(1);
//! TestScheduler::advance_by(Duration::from_millis(100));
//! ```
//!
//! State is thread-local, so tests running in parallel threads do not see
//! each other's clock.

use super::{Duration, OnceTask, Scheduler, TaskHandle};
use crate::subscription::Subscription;
use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::BinaryHeap,
};

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
  running: bool,
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  task: Box<dyn FnOnce()>,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState> = RefCell::new(TestSchedulerState::default());
}

/// A virtual time scheduler.
///
/// Zero-sized: every instance on a thread shares the same clock and queue.
#[derive(Clone, Copy, Default, Debug)]
pub struct TestScheduler;

impl TestScheduler {
  /// Resets the clock to zero and drops every pending task.
  pub fn init() {
    TEST_SCHEDULER_STATE.with(|state| {
      let dropped = {
        let mut state = state.borrow_mut();
        state.virtual_time = Duration::ZERO;
        state.next_task_id = 0;
        state.running = false;
        std::mem::take(&mut state.task_queue)
      };
      drop(dropped);
    });
  }

  pub fn now() -> Duration { TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time) }

  /// Number of queued tasks, cancelled ones included until their time comes.
  pub fn pending_count() -> usize { TEST_SCHEDULER_STATE.with(|state| state.borrow().task_queue.len()) }

  /// Moves the clock forward by `duration`, running every task that becomes
  /// due in time order. Tasks scheduled by a running task for a time inside
  /// the window run in the same call.
  ///
  /// Called from inside a running task, it only moves the clock.
  pub fn advance_by(duration: Duration) {
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);
    Self::execute_tasks_until(Some(target_time));
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      if state.virtual_time < target_time {
        state.virtual_time = target_time;
      }
    });
  }

  /// Runs tasks until the queue is empty, moving the clock to each task's
  /// time.
  pub fn flush() { Self::execute_tasks_until(None); }

  fn execute_tasks_until(target_time: Option<Duration>) {
    let entered = TEST_SCHEDULER_STATE.with(|state| !std::mem::replace(&mut state.borrow_mut().running, true));
    if !entered {
      return;
    }
    loop {
      let task = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        let due = state
          .task_queue
          .peek()
          .map_or(false, |t| target_time.map_or(true, |limit| t.scheduled_time <= limit));
        if !due {
          return None;
        }
        let task = state.task_queue.pop()?;
        state.virtual_time = task.scheduled_time;
        Some(task)
      });
      let Some(ScheduledTask { task, handle, .. }) = task else {
        break;
      };
      if handle.is_closed() {
        continue;
      }
      handle.mark_finished();
      task();
    }
    TEST_SCHEDULER_STATE.with(|state| state.borrow_mut().running = false);
  }
}

impl<Args: 'static> Scheduler<Args> for TestScheduler {
  fn schedule(&self, task: OnceTask<Args>, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let scheduled_time = state.virtual_time + delay.unwrap_or(Duration::ZERO);
      let task_id = state.next_task_id;
      state.next_task_id += 1;
      state.task_queue.push(ScheduledTask {
        scheduled_time,
        task_id,
        task: Box::new(move || task.run()),
        handle: handle.clone(),
      });
    });
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::{cell::RefCell, rc::Rc};

  type Log = Rc<RefCell<Vec<(u64, &'static str)>>>;

  fn record(args: (Log, &'static str)) {
    let now = TestScheduler::now().as_millis() as u64;
    args.0.borrow_mut().push((now, args.1));
  }

  #[test]
  fn zero_sized() {
    assert_eq!(std::mem::size_of::<TestScheduler>(), 0);
  }

  #[test]
  fn runs_tasks_in_time_then_fifo_order() {
    TestScheduler::init();
    let log = Log::default();
    let s = TestScheduler;
    s.schedule(OnceTask::new(record, (log.clone(), "late")), Some(Duration::from_millis(20)));
    s.schedule(OnceTask::new(record, (log.clone(), "early")), Some(Duration::from_millis(10)));
    s.schedule(OnceTask::new(record, (log.clone(), "early too")), Some(Duration::from_millis(10)));

    TestScheduler::advance_by(Duration::from_millis(15));
    assert_eq!(*log.borrow(), vec![(10, "early"), (10, "early too")]);
    assert_eq!(TestScheduler::now(), Duration::from_millis(15));

    TestScheduler::flush();
    assert_eq!(log.borrow().last(), Some(&(20, "late")));
  }

  #[test]
  fn cancelled_task_is_skipped() {
    TestScheduler::init();
    let log = Log::default();
    let handle = TestScheduler.schedule(OnceTask::new(record, (log.clone(), "x")), Some(Duration::from_millis(5)));
    assert!(!handle.is_closed());
    handle.clone().unsubscribe();
    TestScheduler::flush();
    assert!(log.borrow().is_empty());
    assert!(handle.is_closed());
  }

  #[test]
  fn task_scheduled_by_task_runs_in_same_advance() {
    fn chain(log: Log) {
      record((log.clone(), "first"));
      TestScheduler.schedule(OnceTask::new(record, (log, "second")), Some(Duration::from_millis(5)));
    }

    TestScheduler::init();
    let log = Log::default();
    TestScheduler.schedule(OnceTask::new(chain, log.clone()), Some(Duration::from_millis(5)));
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*log.borrow(), vec![(5, "first"), (10, "second")]);
  }

  #[test]
  fn init_resets_clock_and_queue() {
    TestScheduler::init();
    TestScheduler.schedule(OnceTask::new(record, (Log::default(), "x")), None);
    TestScheduler::advance_by(Duration::from_millis(3));
    TestScheduler.schedule(OnceTask::new(record, (Log::default(), "y")), Some(Duration::from_secs(1)));
    assert_eq!(TestScheduler::pending_count(), 1);

    TestScheduler::init();
    assert_eq!(TestScheduler::now(), Duration::ZERO);
    assert_eq!(TestScheduler::pending_count(), 0);
  }
}
