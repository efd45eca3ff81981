//! Bridge from callback-style event sources ("add a target, get called back")
//! into observables.

use crate::{
  prelude::*,
  rc::{MutRc, RcDeref, RcDerefMut},
};
use std::{cell::RefCell, convert::Infallible, rc::Rc};

/// Identifies one registered callback of a [`TargetAction`] source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

/// An event source that reports events by invoking registered callbacks,
/// such as a widget control or a gesture recognizer.
pub trait TargetAction {
  type Event;

  /// Registers `action`; it is invoked for every event until removed.
  fn add_target(&self, action: Box<dyn FnMut(Self::Event)>) -> TargetId;

  /// Unregisters the callback added under `id`. Unknown ids are ignored.
  fn remove_target(&self, id: TargetId);
}

type Action<E> = Rc<RefCell<Box<dyn FnMut(E)>>>;

struct RegistryState<E> {
  next_id: u64,
  targets: Vec<(TargetId, Action<E>)>,
}

/// A plain [`TargetAction`] implementation, for sources that just need to
/// keep a list of callbacks and fire events at them.
pub struct TargetRegistry<E> {
  state: MutRc<RegistryState<E>>,
}

impl<E> TargetRegistry<E> {
  pub fn new() -> Self { TargetRegistry { state: MutRc::own(RegistryState { next_id: 0, targets: vec![] }) } }

  /// Invokes every registered callback with `event`, in registration order.
  /// Callbacks removed by an earlier callback of the same round are skipped.
  pub fn send_action(&self, event: E)
  where
    E: Clone,
  {
    let targets = self.state.rc_deref().targets.clone();
    for (id, action) in targets {
      if !self.is_registered(id) {
        continue;
      }
      match action.try_borrow_mut() {
        Ok(mut action) => (action)(event.clone()),
        Err(_) => log::warn!("target {id:?} fired re-entrantly, event dropped"),
      }
    }
  }

  pub fn target_count(&self) -> usize { self.state.rc_deref().targets.len() }

  fn is_registered(&self, id: TargetId) -> bool { self.state.rc_deref().targets.iter().any(|(i, _)| *i == id) }
}

impl<E> Default for TargetRegistry<E> {
  fn default() -> Self { Self::new() }
}

impl<E> Clone for TargetRegistry<E> {
  fn clone(&self) -> Self { TargetRegistry { state: self.state.clone() } }
}

impl<E> TargetAction for TargetRegistry<E> {
  type Event = E;

  fn add_target(&self, action: Box<dyn FnMut(E)>) -> TargetId {
    let mut state = self.state.rc_deref_mut();
    let id = TargetId(state.next_id);
    state.next_id += 1;
    state.targets.push((id, Rc::new(RefCell::new(action))));
    id
  }

  fn remove_target(&self, id: TargetId) {
    let removed = {
      let mut state = self.state.rc_deref_mut();
      let pos = state.targets.iter().position(|(i, _)| *i == id);
      pos.map(|pos| state.targets.remove(pos))
    };
    // The callback may own observers whose drop touches this registry.
    drop(removed);
  }
}

/// Turns a [`TargetAction`] source into an observable of its events.
///
/// Each subscription registers one callback on the source. The callback only
/// holds a weak reference to the observer; the returned subscription owns
/// it. Dropping or unsubscribing the subscription removes the callback from
/// the source, so keep it alive (e.g. in a
/// [`SubscriptionBag`](crate::subscription::SubscriptionBag)) for as long as
/// events should flow. The stream neither completes nor fails on its own.
pub fn from_target<T: TargetAction>(target: T) -> FromTarget<T> { FromTarget(target) }

#[derive(Clone)]
pub struct FromTarget<T>(T);

impl<T, O> Observable<T::Event, Infallible, O> for FromTarget<T>
where
  T: TargetAction,
  T::Event: 'static,
  O: Observer<T::Event, Infallible> + 'static,
{
  type Unsub = TargetSubscription<T, O>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let observer = MutRc::own(Some(observer));
    let weak = observer.downgrade();
    let id = self.0.add_target(Box::new(move |e| {
      if let Some(mut observer) = weak.upgrade() {
        if !observer.is_finished() {
          observer.next(e);
        }
      }
    }));
    log::trace!("registered target {id:?}");
    TargetSubscription { target: self.0, id, observer }
  }
}

impl<T: TargetAction> ObservableExt<T::Event, Infallible> for FromTarget<T> {}

pub struct TargetSubscription<T: TargetAction, O> {
  target: T,
  id: TargetId,
  observer: MutRc<Option<O>>,
}

impl<T: TargetAction, O> Subscription for TargetSubscription<T, O> {
  #[inline]
  fn unsubscribe(self) { drop(self) }

  fn is_closed(&self) -> bool {
    // Borrowed means the observer is handling an event right now.
    self.observer.try_rc_deref().map_or(false, |o| o.is_none())
  }
}

impl<T: TargetAction, O> Drop for TargetSubscription<T, O> {
  fn drop(&mut self) {
    log::trace!("removing target {:?}", self.id);
    self.target.remove_target(self.id);
    // While the observer is running the callback keeps it alive; it is
    // released once the callback returns.
    let observer = self.observer.try_rc_deref_mut().and_then(|mut o| o.take());
    drop(observer);
  }
}
