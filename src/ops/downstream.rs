//! The observer at the end of an operator that listens to more than one
//! upstream, or to an upstream and a timer.
//!
//! Events are delivered without holding any borrow, so the downstream may
//! push into any upstream of the same operator, or cancel its subscription,
//! from inside a callback. Events raised while a delivery is in flight are
//! queued and delivered in order once it returns.

use crate::{
  prelude::*,
  rc::{MutRc, RcDeref, RcDerefMut},
};
use std::collections::VecDeque;

enum Event<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

struct DownstreamState<O, Item, Err> {
  observer: Option<O>,
  pending: VecDeque<Event<Item, Err>>,
  delivering: bool,
  terminated: bool,
  closed: bool,
}

pub struct Downstream<O, Item, Err>(MutRc<DownstreamState<O, Item, Err>>);

impl<O, Item, Err> Clone for Downstream<O, Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Downstream(self.0.clone()) }
}

impl<O, Item, Err> Downstream<O, Item, Err> {
  pub(crate) fn new(observer: O) -> Self {
    Downstream(MutRc::own(DownstreamState {
      observer: Some(observer),
      pending: VecDeque::new(),
      delivering: false,
      terminated: false,
      closed: false,
    }))
  }

  /// Drops the observer, right away or once its current callback returns,
  /// together with everything still queued for it.
  pub(crate) fn close(&self) {
    let released = {
      let mut state = self.0.rc_deref_mut();
      state.closed = true;
      (state.observer.take(), std::mem::take(&mut state.pending))
    };
    drop(released);
  }

  pub(crate) fn is_closed(&self) -> bool {
    let state = self.0.rc_deref();
    state.closed || (!state.delivering && state.observer.is_none())
  }
}

impl<O, Item, Err> Subscription for Downstream<O, Item, Err> {
  #[inline]
  fn unsubscribe(self) { self.close() }

  #[inline]
  fn is_closed(&self) -> bool { Downstream::is_closed(self) }
}

impl<O, Item, Err> Downstream<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  pub(crate) fn next(&self, value: Item) { self.push(Event::Next(value)) }

  #[inline]
  pub(crate) fn error(&self, err: Err) { self.push(Event::Error(err)) }

  #[inline]
  pub(crate) fn complete(&self) { self.push(Event::Complete) }

  /// No further values are wanted: a terminal event was raised, the
  /// subscription was closed, or the observer itself is finished.
  pub(crate) fn is_finished(&self) -> bool {
    let state = self.0.rc_deref();
    state.terminated
      || state.closed
      || state.observer.as_ref().map_or(!state.delivering, Observer::is_finished)
  }

  fn push(&self, event: Event<Item, Err>) {
    {
      let mut state = self.0.rc_deref_mut();
      if state.terminated || state.closed {
        return;
      }
      if !matches!(event, Event::Next(_)) {
        state.terminated = true;
      }
      state.pending.push_back(event);
      if state.delivering {
        return;
      }
      state.delivering = true;
    }
    self.drain();
  }

  fn drain(&self) {
    loop {
      let (observer, event) = {
        let mut state = self.0.rc_deref_mut();
        match state.pending.pop_front() {
          Some(event) => (state.observer.take(), event),
          None => {
            state.delivering = false;
            return;
          }
        }
      };
      let Some(mut observer) = observer else {
        continue;
      };
      match event {
        Event::Next(value) => {
          observer.next(value);
          let released = {
            let mut state = self.0.rc_deref_mut();
            if state.closed {
              Some(observer)
            } else {
              state.observer = Some(observer);
              None
            }
          };
          drop(released);
        }
        Event::Error(err) => observer.error(err),
        Event::Complete => observer.complete(),
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::observer::ObserverN;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn events_raised_during_delivery_are_queued() {
    let seen = Rc::new(RefCell::new(vec![]));
    let feedback: Rc<RefCell<Option<Downstream<BoxedObserver<'static, i32, ()>, i32, ()>>>> = Rc::new(RefCell::new(None));
    let (s, f) = (seen.clone(), feedback.clone());
    let downstream = Downstream::new(Box::new(ObserverN(move |v: i32| {
      s.borrow_mut().push(v);
      if v == 1 {
        if let Some(d) = f.borrow().as_ref() {
          d.next(2);
          d.complete();
          d.next(3);
        }
      }
    })) as BoxedObserver<'static, i32, ()>);
    *feedback.borrow_mut() = Some(downstream.clone());

    downstream.next(1);
    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(downstream.is_finished());
    assert!(downstream.is_closed());
    feedback.borrow_mut().take();
  }

  #[test]
  fn close_during_delivery_releases_observer_afterwards() {
    let seen = Rc::new(RefCell::new(vec![]));
    let handle: Rc<RefCell<Option<Downstream<BoxedObserver<'static, i32, ()>, i32, ()>>>> = Rc::new(RefCell::new(None));
    let (s, h) = (seen.clone(), handle.clone());
    let downstream = Downstream::new(Box::new(ObserverN(move |v: i32| {
      s.borrow_mut().push(v);
      if let Some(d) = h.borrow_mut().take() {
        d.next(10);
        d.close();
      }
    })) as BoxedObserver<'static, i32, ()>);
    *handle.borrow_mut() = Some(downstream.clone());

    downstream.next(1);
    downstream.next(2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert!(downstream.is_closed());
    // the observer, and the counter it captured, are gone
    assert_eq!(Rc::strong_count(&seen), 1);
  }
}
