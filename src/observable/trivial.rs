use crate::prelude::*;
use std::{convert::Infallible, marker::PhantomData};

/// Emits `v` once, then completes.
pub fn of<Item>(v: Item) -> ObservableOf<Item> { ObservableOf(v) }

#[derive(Clone)]
pub struct ObservableOf<Item>(Item);

impl<Item, O> Observable<Item, Infallible, O> for ObservableOf<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    observer.next(self.0);
    observer.complete();
  }
}

impl<Item> ObservableExt<Item, Infallible> for ObservableOf<Item> {}

/// Creates an observable that produces no values and completes immediately.
pub fn empty<Item>() -> ObservableEmpty<Item> { ObservableEmpty(PhantomData) }

#[derive(Clone)]
pub struct ObservableEmpty<Item>(PhantomData<Item>);

impl<Item, O> Observable<Item, Infallible, O> for ObservableEmpty<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  #[inline]
  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete(); }
}

impl<Item> ObservableExt<Item, Infallible> for ObservableEmpty<Item> {}

/// Creates an observable that emits no items and terminates with `e`.
pub fn throw_err<Item, Err>(e: Err) -> ObservableThrow<Item, Err> { ObservableThrow(e, PhantomData) }

#[derive(Clone)]
pub struct ObservableThrow<Item, Err>(Err, PhantomData<Item>);

impl<Item, Err, O> Observable<Item, Err, O> for ObservableThrow<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  #[inline]
  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.0); }
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableThrow<Item, Err> {}
