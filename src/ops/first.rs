use crate::prelude::*;

#[derive(Clone)]
pub struct FirstOp<S> {
  pub(crate) source: S,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for FirstOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FirstObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(FirstObserver { observer: Some(observer) })
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for FirstOp<S> where S: ObservableExt<Item, Err> {}

/// Forwards one value and completes. Afterwards it reports finished, so the
/// upstream releases it.
pub struct FirstObserver<O> {
  observer: Option<O>,
}

impl<Item, Err, O> Observer<Item, Err> for FirstObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(mut observer) = self.observer.take() {
      observer.next(value);
      observer.complete();
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
