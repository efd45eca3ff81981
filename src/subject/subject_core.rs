use super::{
  subject_subscription::SubjectSubscription,
  subscribers::{broadcast_complete, broadcast_error, broadcast_value, Slot, Subscribers},
};
use crate::{
  error::SubjectError,
  observer::BoxedObserver,
  rc::{MutRc, RcDeref, RcDerefMut},
};
use std::{collections::VecDeque, rc::Rc};

/// What a subject hands to an observer when it subscribes.
pub(crate) trait Replay<Item> {
  /// Called when `value` is delivered to the subscribers.
  fn record(&mut self, value: &Item);

  fn replay(&self) -> Option<Item>;
}

/// Late subscribers get nothing from the past.
pub(crate) struct NoReplay;

impl<Item> Replay<Item> for NoReplay {
  #[inline]
  fn record(&mut self, _: &Item) {}

  #[inline]
  fn replay(&self) -> Option<Item> { None }
}

/// Late subscribers get the most recently delivered value first.
pub(crate) struct CurrentValue<Item>(pub(crate) Item);

impl<Item: Clone> Replay<Item> for CurrentValue<Item> {
  #[inline]
  fn record(&mut self, value: &Item) { self.0 = value.clone(); }

  #[inline]
  fn replay(&self) -> Option<Item> { Some(self.0.clone()) }
}

enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  #[inline]
  fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }
}

#[derive(Clone)]
enum Terminal<Err> {
  Completed,
  Errored(Err),
}

pub(crate) struct SubjectState<'a, Item, Err, R> {
  subscribers: Subscribers<'a, Item, Err>,
  pub(crate) replay: R,
  terminal: Option<Terminal<Err>>,
  emitting: bool,
  pending: VecDeque<Notification<Item, Err>>,
}

/// Shared state behind every subject flavor.
///
/// # Re-entrancy
///
/// Pushing into a subject from inside one of its own observers is allowed.
/// The push is queued and delivered once the in-flight delivery has reached
/// every observer, so all observers see events in the same order. Only the
/// outermost push call drains the queue.
///
/// Subscribing and unsubscribing from inside a callback take effect right
/// away: a new observer misses the value in flight, a removed one gets no
/// further values, including the rest of the value in flight. A new observer
/// does receive everything still queued, the terminal event included.
pub(crate) struct SubjectCore<'a, Item, Err, R>(MutRc<SubjectState<'a, Item, Err, R>>);

impl<'a, Item, Err, R> Clone for SubjectCore<'a, Item, Err, R> {
  #[inline]
  fn clone(&self) -> Self { SubjectCore(self.0.clone()) }
}

impl<'a, Item, Err, R> SubjectCore<'a, Item, Err, R> {
  pub(crate) fn new(replay: R) -> Self {
    SubjectCore(MutRc::own(SubjectState {
      subscribers: Subscribers::default(),
      replay,
      terminal: None,
      emitting: false,
      pending: VecDeque::new(),
    }))
  }

  #[inline]
  pub(crate) fn state(&self) -> &MutRc<SubjectState<'a, Item, Err, R>> { &self.0 }

  pub(crate) fn subscriber_count(&self) -> usize { self.0.rc_deref().subscribers.len() }

  pub(crate) fn is_terminated(&self) -> bool { self.0.rc_deref().terminal.is_some() }
}

impl<'a, Item, Err, R> SubjectCore<'a, Item, Err, R>
where
  Item: Clone,
  Err: Clone,
  R: Replay<Item>,
{
  #[inline]
  pub(crate) fn next(&self, value: Item) -> Result<(), SubjectError> { self.emit(Notification::Next(value)) }

  #[inline]
  pub(crate) fn error(&self, err: Err) -> Result<(), SubjectError> { self.emit(Notification::Error(err)) }

  #[inline]
  pub(crate) fn complete(&self) -> Result<(), SubjectError> { self.emit(Notification::Complete) }

  pub(crate) fn subscribe(&self, observer: BoxedObserver<'a, Item, Err>) -> SubjectSubscription<'a, Item, Err> {
    let slot = Rc::new(Slot::new(observer));
    let (replay, drain) = {
      let mut state = self.0.rc_deref_mut();
      // A terminal event still waiting in the queue reaches this observer
      // through the queue, after the values queued before it.
      let terminal_queued = state.pending.iter().any(Notification::is_terminal);
      if let Some(terminal) = state.terminal.clone().filter(|_| !terminal_queued) {
        drop(state);
        log::trace!("subscribed to a terminated subject, replaying the terminal event");
        match terminal {
          Terminal::Completed => slot.complete(),
          Terminal::Errored(err) => slot.error(err),
        }
        return SubjectSubscription::new(slot);
      }
      state.subscribers.push(slot.clone());
      let replay = state.replay.replay();
      let drain = replay.is_some() && !state.emitting;
      if drain {
        state.emitting = true;
      }
      (replay, drain)
    };
    log::trace!("observer subscribed to subject, {} active", self.subscriber_count());

    if let Some(value) = replay {
      slot.next(value);
      if drain {
        self.drain();
      }
    }
    SubjectSubscription::new(slot)
  }

  fn emit(&self, notification: Notification<Item, Err>) -> Result<(), SubjectError> {
    {
      let mut state = self.0.rc_deref_mut();
      if state.terminal.is_some() {
        return Err(SubjectError::UseAfterCompletion);
      }
      match &notification {
        Notification::Next(_) => {}
        Notification::Error(err) => state.terminal = Some(Terminal::Errored(err.clone())),
        Notification::Complete => state.terminal = Some(Terminal::Completed),
      }
      if state.emitting {
        state.pending.push_back(notification);
        return Ok(());
      }
      state.emitting = true;
    }
    self.dispatch(notification);
    self.drain();
    Ok(())
  }

  fn drain(&self) {
    loop {
      let notification = {
        let mut state = self.0.rc_deref_mut();
        match state.pending.pop_front() {
          Some(n) => n,
          None => {
            state.emitting = false;
            return;
          }
        }
      };
      self.dispatch(notification);
    }
  }

  fn dispatch(&self, notification: Notification<Item, Err>) {
    match notification {
      Notification::Next(value) => {
        let slots = {
          let mut state = self.0.rc_deref_mut();
          state.replay.record(&value);
          state.subscribers.snapshot()
        };
        broadcast_value(&slots, value);
      }
      Notification::Error(err) => {
        let slots = self.0.rc_deref_mut().subscribers.drain();
        broadcast_error(&slots, err);
      }
      Notification::Complete => {
        let slots = self.0.rc_deref_mut().subscribers.drain();
        broadcast_complete(&slots);
      }
    }
  }
}
