use crate::prelude::*;
use std::{convert::Infallible, marker::PhantomData};

pub struct OnErrorOp<S, F, Err> {
  source: S,
  func: F,
  _m: PhantomData<fn(Err)>,
}

impl<S, F, Err> OnErrorOp<S, F, Err> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { OnErrorOp { source, func, _m: PhantomData } }
}

impl<Item, Err, O, S, F> Observable<Item, Infallible, O> for OnErrorOp<S, F, Err>
where
  O: Observer<Item, Infallible>,
  S: Observable<Item, Err, OnErrorObserver<O, F>>,
  F: FnOnce(Err),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let handler = self.func;
    self.source.actual_subscribe(OnErrorObserver { observer, handler })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Infallible> for OnErrorOp<S, F, Err>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(Err),
{
}

/// Hands the upstream error to `handler`; the downstream observer is dropped
/// without a terminal event.
pub struct OnErrorObserver<O, F> {
  observer: O,
  handler: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Infallible>,
  F: FnOnce(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) { (self.handler)(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::cell::{Cell, RefCell};

  #[test]
  fn handles_the_error() {
    let handled = RefCell::new(None);
    let mut values = vec![];
    let mut subject = Subject::<i32, String>::new();
    subject
      .clone()
      .on_error(|e| *handled.borrow_mut() = Some(e))
      .subscribe(|v| values.push(v));

    subject.next(1);
    subject.clone().error("lost connection".to_string());
    drop(subject);
    assert_eq!(values, vec![1]);
    assert_eq!(handled.borrow().as_deref(), Some("lost connection"));
  }

  #[test]
  fn completion_passes_through() {
    let completed = Cell::new(false);
    let handled = Cell::new(false);
    observable::from_iter(0..3)
      .on_error(|_| handled.set(true))
      .on_complete(|| completed.set(true))
      .subscribe(|_| {});
    assert!(completed.get());
    assert!(!handled.get());
  }
}
