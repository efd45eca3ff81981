use super::downstream::Downstream;
use crate::{
  prelude::*,
  rc::{MutRc, RcDerefMut},
};
use std::time::Duration;

/// Config to define leading and trailing behavior for throttle
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ThrottleEdge {
  leading: bool,
  trailing: bool,
}

impl ThrottleEdge {
  /// Emit the value that opens a window, drop the rest of the window.
  #[inline]
  pub fn leading() -> Self { ThrottleEdge { leading: true, trailing: false } }

  /// Emit only the latest value of each window, when the window ends.
  #[inline]
  pub fn trailing() -> Self { ThrottleEdge { leading: false, trailing: true } }

  #[inline]
  pub fn all() -> Self { ThrottleEdge { leading: true, trailing: true } }
}

#[derive(Clone)]
pub struct ThrottleOp<S, SD> {
  pub(crate) source: S,
  pub(crate) duration: Duration,
  pub(crate) edge: ThrottleEdge,
  pub(crate) scheduler: SD,
}

pub struct ThrottleState<Item> {
  trailing: Option<Item>,
  window: Option<TaskHandle>,
}

/// Arguments of the task that ends a throttle window.
pub type WindowArgs<O, Item, Err, SD> =
  (MutRc<ThrottleState<Item>>, Downstream<O, Item, Err>, SD, Duration);

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for ThrottleOp<S, SD>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, ThrottleObserver<O, Item, Err, SD>>,
  SD: Scheduler<WindowArgs<O, Item, Err, SD>> + Clone,
{
  type Unsub = ZipSubscription<S::Unsub, ThrottleSubscription<O, Item, Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let ThrottleOp { source, duration, edge, scheduler } = self;
    let state = MutRc::own(ThrottleState { trailing: None, window: None });
    let downstream = Downstream::new(observer);
    let upstream = source.actual_subscribe(ThrottleObserver {
      state: state.clone(),
      downstream: downstream.clone(),
      edge,
      duration,
      scheduler,
    });
    ZipSubscription::new(upstream, ThrottleSubscription { state, downstream })
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for ThrottleOp<S, SD> where S: ObservableExt<Item, Err> {}

pub struct ThrottleObserver<O, Item, Err, SD> {
  state: MutRc<ThrottleState<Item>>,
  downstream: Downstream<O, Item, Err>,
  edge: ThrottleEdge,
  duration: Duration,
  scheduler: SD,
}

impl<Item, Err, O, SD> Observer<Item, Err> for ThrottleObserver<O, Item, Err, SD>
where
  O: Observer<Item, Err>,
  SD: Scheduler<WindowArgs<O, Item, Err, SD>> + Clone,
{
  fn next(&mut self, value: Item) {
    if self.downstream.is_finished() {
      return;
    }
    let leading = {
      let mut state = self.state.rc_deref_mut();
      if state.window.is_some() {
        if self.edge.trailing {
          state.trailing = Some(value);
        }
        return;
      }
      let task = OnceTask::new(
        window_closed::<O, Item, Err, SD>,
        (self.state.clone(), self.downstream.clone(), self.scheduler.clone(), self.duration),
      );
      state.window = Some(self.scheduler.schedule(task, Some(self.duration)));
      if self.edge.leading {
        Some(value)
      } else {
        state.trailing = Some(value);
        None
      }
    };
    if let Some(value) = leading {
      self.downstream.next(value);
    }
  }

  fn error(self, err: Err) {
    let (window, trailing) = {
      let mut state = self.state.rc_deref_mut();
      (state.window.take(), state.trailing.take())
    };
    if let Some(window) = window {
      window.unsubscribe();
    }
    drop(trailing);
    self.downstream.error(err);
  }

  fn complete(self) {
    let (window, trailing) = {
      let mut state = self.state.rc_deref_mut();
      (state.window.take(), state.trailing.take())
    };
    if let Some(window) = window {
      window.unsubscribe();
    }
    // only kept when the trailing edge is on
    if let Some(value) = trailing {
      self.downstream.next(value);
    }
    self.downstream.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

/// Ends a window. A value held back during the window is emitted and opens
/// the next window; otherwise the throttle goes idle.
fn window_closed<O, Item, Err, SD>((state, downstream, scheduler, duration): WindowArgs<O, Item, Err, SD>)
where
  O: Observer<Item, Err>,
  SD: Scheduler<WindowArgs<O, Item, Err, SD>> + Clone,
{
  if downstream.is_finished() {
    state.rc_deref_mut().window = None;
    return;
  }
  let trailing = {
    let mut guard = state.rc_deref_mut();
    guard.window = None;
    let trailing = guard.trailing.take();
    if trailing.is_some() {
      let task = OnceTask::new(
        window_closed::<O, Item, Err, SD>,
        (state.clone(), downstream.clone(), scheduler.clone(), duration),
      );
      guard.window = Some(scheduler.schedule(task, Some(duration)));
    }
    trailing
  };
  if let Some(value) = trailing {
    downstream.next(value);
  }
}

/// Stops the throttle itself: cancels a pending window and drops the
/// downstream observer, so a held back value is never emitted. Safe to call
/// from inside the downstream's own callback.
pub struct ThrottleSubscription<O, Item, Err> {
  state: MutRc<ThrottleState<Item>>,
  downstream: Downstream<O, Item, Err>,
}

impl<O, Item, Err> Subscription for ThrottleSubscription<O, Item, Err> {
  fn unsubscribe(self) {
    let (window, trailing) = {
      let mut state = self.state.rc_deref_mut();
      (state.window.take(), state.trailing.take())
    };
    if let Some(window) = window {
      window.unsubscribe();
    }
    drop(trailing);
    self.downstream.close();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.downstream.is_closed() }
}
