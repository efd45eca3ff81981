//! Hot, multicasting sources that are fed by hand.
//!
//! A [`Subject`] forwards each pushed value to the observers subscribed at
//! that moment. A [`BehaviorSubject`] additionally remembers the latest
//! value and hands it to every new observer on subscription.
//!
//! Both are observers themselves, so they can be subscribed to another
//! stream. Pushing through the `Observer` methods after the subject has
//! terminated logs a warning and drops the event; the `try_*` methods report
//! it as [`SubjectError::UseAfterCompletion`] instead.
//!
//! Observers that received the terminal event, or that stopped accepting
//! values, are released by the subject right away.

use crate::{
  error::SubjectError,
  observable::{Observable, ObservableExt},
  observer::Observer,
};

mod subject_core;
use subject_core::{NoReplay, SubjectCore};
mod subscribers;
mod subject_subscription;
pub use subject_subscription::SubjectSubscription;
mod behavior_subject;
pub use behavior_subject::BehaviorSubject;

/// A passthrough subject: late subscribers only see what is pushed after
/// they subscribed (plus the terminal event, if any).
pub struct Subject<'a, Item, Err> {
  core: SubjectCore<'a, Item, Err, NoReplay>,
}

impl<'a, Item, Err> Subject<'a, Item, Err> {
  pub fn new() -> Self { Subject { core: SubjectCore::new(NoReplay) } }
}

impl<'a, Item, Err> Default for Subject<'a, Item, Err> {
  fn default() -> Self { Self::new() }
}

macro_rules! impl_subject {
  ($ty:ident) => {
    impl<'a, Item, Err> Clone for $ty<'a, Item, Err> {
      #[inline]
      fn clone(&self) -> Self { $ty { core: self.core.clone() } }
    }

    impl<'a, Item, Err> $ty<'a, Item, Err> {
      /// Number of observers that still receive values.
      pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

      /// Whether `complete` or `error` has been pushed.
      pub fn is_terminated(&self) -> bool { self.core.is_terminated() }
    }

    impl<'a, Item: Clone, Err: Clone> $ty<'a, Item, Err> {
      #[inline]
      pub fn try_next(&self, value: Item) -> Result<(), SubjectError> { self.core.next(value) }

      #[inline]
      pub fn try_error(&self, err: Err) -> Result<(), SubjectError> { self.core.error(err) }

      #[inline]
      pub fn try_complete(&self) -> Result<(), SubjectError> { self.core.complete() }
    }

    impl<'a, Item: Clone, Err: Clone> Observer<Item, Err> for $ty<'a, Item, Err> {
      fn next(&mut self, value: Item) {
        if let Err(e) = self.try_next(value) {
          log::warn!("{}: {e}", stringify!($ty));
        }
      }

      fn error(self, err: Err) {
        if let Err(e) = self.try_error(err) {
          log::warn!("{}: {e}", stringify!($ty));
        }
      }

      fn complete(self) {
        if let Err(e) = self.try_complete() {
          log::warn!("{}: {e}", stringify!($ty));
        }
      }

      #[inline]
      fn is_finished(&self) -> bool { self.is_terminated() }
    }

    impl<'a, Item, Err, O> Observable<Item, Err, O> for $ty<'a, Item, Err>
    where
      O: Observer<Item, Err> + 'a,
      Item: Clone,
      Err: Clone,
    {
      type Unsub = SubjectSubscription<'a, Item, Err>;

      fn actual_subscribe(self, observer: O) -> Self::Unsub { self.core.subscribe(Box::new(observer)) }
    }

    impl<'a, Item, Err> ObservableExt<Item, Err> for $ty<'a, Item, Err> {}
  };
}

impl_subject!(Subject);
impl_subject!(BehaviorSubject);

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn multicasts_to_current_subscribers_in_order() {
    let seen = Rc::new(RefCell::new(vec![]));
    let mut subject = Subject::<i32, ()>::new();
    let (s1, s2) = (seen.clone(), seen.clone());
    subject.clone().subscribe(move |v| s1.borrow_mut().push(("a", v)));
    subject.clone().subscribe(move |v| s2.borrow_mut().push(("b", v)));

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
  }

  #[test]
  fn late_subscriber_misses_earlier_values() {
    let mut subject = Subject::<i32, ()>::new();
    subject.next(1);
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    subject.clone().subscribe(move |v| s.borrow_mut().push(v));
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![2]);
  }

  #[test]
  fn push_after_completion_is_rejected() {
    let subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    subject.clone().subscribe(move |v| s.borrow_mut().push(v));

    assert_eq!(subject.try_next(1), Ok(()));
    assert_eq!(subject.try_complete(), Ok(()));
    assert_eq!(subject.try_next(2), Err(SubjectError::UseAfterCompletion));
    assert_eq!(subject.try_error(()), Err(SubjectError::UseAfterCompletion));
    assert_eq!(subject.try_complete(), Err(SubjectError::UseAfterCompletion));
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn error_reaches_every_subscriber_once() {
    let errors = Rc::new(RefCell::new(vec![]));
    let subject = Subject::<i32, &str>::new();
    for name in ["a", "b"] {
      let e = errors.clone();
      subject
        .clone()
        .subscribe_all(|_| {}, move |err| e.borrow_mut().push((name, err)), || {});
    }
    subject.clone().error("boom");
    subject.clone().error("again");
    assert_eq!(*errors.borrow(), vec![("a", "boom"), ("b", "boom")]);
  }

  #[test]
  fn late_subscriber_gets_terminal_event() {
    let subject = Subject::<i32, ()>::new();
    subject.clone().complete();
    let completed = Rc::new(RefCell::new(false));
    let c = completed.clone();
    let subscription = subject
      .clone()
      .on_complete(move || *c.borrow_mut() = true)
      .subscribe(|_| {});
    assert!(*completed.borrow());
    assert!(subscription.is_closed());
  }

  #[test]
  fn unsubscribe_stops_delivery() {
    let mut subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let subscription = subject.clone().subscribe(move |v| s.borrow_mut().push(v));
    subject.next(1);
    subscription.unsubscribe();
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn unsubscribe_inside_callback_skips_the_rest() {
    let mut subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));

    let victim: Rc<RefCell<Option<SubjectSubscription<i32, ()>>>> = Rc::new(RefCell::new(None));
    let v = victim.clone();
    let s1 = seen.clone();
    subject.clone().subscribe(move |x| {
      s1.borrow_mut().push(("killer", x));
      if let Some(s) = v.borrow_mut().take() {
        s.unsubscribe();
      }
    });
    let s2 = seen.clone();
    let subscription = subject.clone().subscribe(move |x| s2.borrow_mut().push(("victim", x)));
    *victim.borrow_mut() = Some(subscription.into_inner());

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![("killer", 1), ("killer", 2)]);
  }

  #[test]
  fn observer_can_unsubscribe_itself() {
    let mut subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let own: Rc<RefCell<Option<SubjectSubscription<i32, ()>>>> = Rc::new(RefCell::new(None));
    let (s, o) = (seen.clone(), own.clone());
    let subscription = subject.clone().subscribe(move |x| {
      s.borrow_mut().push(x);
      if let Some(sub) = o.borrow_mut().take() {
        sub.unsubscribe();
      }
    });
    *own.borrow_mut() = Some(subscription.into_inner());

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn subscribe_inside_callback_misses_value_in_flight() {
    let mut subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let (inner_subject, s) = (subject.clone(), seen.clone());
    let added = Rc::new(RefCell::new(false));
    subject.clone().subscribe(move |x| {
      s.borrow_mut().push(("outer", x));
      if !*added.borrow() {
        *added.borrow_mut() = true;
        let s = s.clone();
        inner_subject
          .clone()
          .subscribe(move |x| s.borrow_mut().push(("inner", x)));
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.borrow(), vec![("outer", 1), ("outer", 2), ("inner", 2)]);
  }

  #[test]
  fn reentrant_push_is_delivered_after_current_value() {
    let mut subject = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));

    let (mut feedback, s1) = (subject.clone(), seen.clone());
    subject.clone().subscribe(move |x| {
      s1.borrow_mut().push(("a", x));
      if x == 1 {
        feedback.next(10);
      }
    });
    let s2 = seen.clone();
    subject.clone().subscribe(move |x| s2.borrow_mut().push(("b", x)));

    subject.next(1);
    assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("a", 10), ("b", 10)]);
  }

  #[test]
  fn subscriber_added_before_queued_completion_sees_queued_events() {
    let subject = Subject::<i32, ()>::new();
    let events = Rc::new(RefCell::new(vec![]));

    let (mut inner, e) = (subject.clone(), events.clone());
    let added = Rc::new(RefCell::new(false));
    subject.clone().subscribe_all(
      move |x| {
        e.borrow_mut().push(format!("a {x}"));
        if !added.replace(true) {
          inner.next(2);
          inner.clone().complete();
          let (n, c) = (e.clone(), e.clone());
          inner.clone().subscribe_all(
            move |x| n.borrow_mut().push(format!("b {x}")),
            |_| {},
            move || c.borrow_mut().push("b done".to_string()),
          );
        }
      },
      |_| {},
      {
        let e = events.clone();
        move || e.borrow_mut().push("a done".to_string())
      },
    );

    subject.clone().next(1);
    assert_eq!(*events.borrow(), vec!["a 1", "a 2", "b 2", "a done", "b done"]);
  }

  #[test]
  fn finished_observer_is_released() {
    let mut subject = Subject::<i32, ()>::new();
    let mut first = None;
    subject.clone().first().subscribe(|v| first = Some(v));
    assert_eq!(subject.subscriber_count(), 1);
    subject.next(7);
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(8);
    drop(subject);
    assert_eq!(first, Some(7));
  }

  #[test]
  fn subject_as_observer_of_another_stream() {
    let subject = Subject::<i32, std::convert::Infallible>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    subject.clone().subscribe(move |v| s.borrow_mut().push(v));
    observable::from_iter(1..=3).actual_subscribe(subject.clone());
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert!(subject.is_terminated());
  }
}
