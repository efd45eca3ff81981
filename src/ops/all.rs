use crate::prelude::*;
use std::marker::PhantomData;

#[derive(Clone)]
pub struct AllOp<S, F, Item> {
  source: S,
  predicate: F,
  _m: PhantomData<fn(&Item)>,
}

impl<S, F, Item> AllOp<S, F, Item> {
  #[inline]
  pub(crate) fn new(source: S, predicate: F) -> Self { AllOp { source, predicate, _m: PhantomData } }
}

impl<Item, Err, O, S, F> Observable<bool, Err, O> for AllOp<S, F, Item>
where
  O: Observer<bool, Err>,
  S: Observable<Item, Err, AllObserver<O, F>>,
  F: FnMut(&Item) -> bool,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(AllObserver { observer: Some(observer), predicate: self.predicate })
  }
}

impl<Item, Err, S, F> ObservableExt<bool, Err> for AllOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> bool,
{
}

pub struct AllObserver<O, F> {
  observer: Option<O>,
  predicate: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for AllObserver<O, F>
where
  O: Observer<bool, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_some() && !(self.predicate)(&value) {
      if let Some(mut observer) = self.observer.take() {
        observer.next(false);
        observer.complete();
      }
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    if let Some(mut observer) = self.observer {
      observer.next(true);
      observer.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
