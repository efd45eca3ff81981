//! The `Observable` trait and the source factories.
//!
//! An observable is a recipe: nothing happens until `actual_subscribe` hands
//! it an observer. Operators are provided by [`ObservableExt`] and build a
//! new observable around the previous one.

use crate::{
  error::OperatorError,
  observer::{BoxedObserver, Observer, ObserverAll, ObserverN},
  ops::{
    all::AllOp,
    box_it::BoxOp,
    combine_latest::{CombineLatestAllOp, CombineLatestOp},
    contains::ContainsOp,
    filter::FilterOp,
    first::FirstOp,
    map::MapOp,
    merge::{MergeAllOp, MergeOp},
    on_complete::OnCompleteOp,
    on_error::OnErrorOp,
    throttle_time::{ThrottleEdge, ThrottleOp},
    zip::{ZipAllOp, ZipOp},
  },
  subscription::{Subscription, SubscriptionWrapper},
};
use std::time::Duration;

mod from_iter;
pub use from_iter::*;
mod trivial;
pub use trivial::*;
mod from_target;
pub use from_target::*;

/// A stream of `Item` values ending with either completion or an `Err`.
pub trait Observable<Item, Err, O: Observer<Item, Err>> {
  /// A type implementing [`Subscription`]
  type Unsub: Subscription;

  /// Connects `observer` to this stream.
  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// Operators and subscribe helpers shared by every observable.
pub trait ObservableExt<Item, Err>: Sized {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Emit only the values for which `filter` returns `true`.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp { source: self, filter }
  }

  /// Interleave the values of `self` and `other` in arrival order. Completes
  /// once both have completed; the first error ends the merged stream.
  #[inline]
  fn merge<S>(self, other: S) -> MergeOp<Self, S>
  where
    S: ObservableExt<Item, Err>,
  {
    MergeOp { source1: self, source2: other }
  }

  /// Pair the n-th value of `self` with the n-th value of `other`.
  #[inline]
  fn zip<S, B>(self, other: S) -> ZipOp<Self, S>
  where
    S: ObservableExt<B, Err>,
  {
    ZipOp { source_a: self, source_b: other }
  }

  /// Emit the latest value of both streams every time either one emits,
  /// starting once both have emitted.
  #[inline]
  fn combine_latest<S, B>(self, other: S) -> CombineLatestOp<Self, S>
  where
    S: ObservableExt<B, Err>,
  {
    CombineLatestOp { a: self, b: other }
  }

  /// Emit a value, then ignore subsequent values for `duration`. `edge`
  /// selects whether the value opening a window and/or the latest value seen
  /// inside it are emitted.
  #[inline]
  fn throttle_time<SD>(self, duration: Duration, edge: ThrottleEdge, scheduler: SD) -> ThrottleOp<Self, SD> {
    ThrottleOp { source: self, duration, edge, scheduler }
  }

  /// Emit a value, then suppress values for `duration`. With `emit_latest`
  /// the most recent suppressed value is emitted when the window ends,
  /// otherwise it is dropped.
  #[inline]
  fn throttle<SD>(self, duration: Duration, emit_latest: bool, scheduler: SD) -> ThrottleOp<Self, SD> {
    let edge = if emit_latest { ThrottleEdge::all() } else { ThrottleEdge::leading() };
    self.throttle_time(duration, edge, scheduler)
  }

  /// emit only the first item emitted by an Observable
  #[inline]
  fn first(self) -> FirstOp<Self> { FirstOp { source: self } }

  /// Emit `true` and complete as soon as `target` is seen, or `false` when
  /// the source completes without it.
  #[inline]
  fn contains(self, target: Item) -> ContainsOp<Self, Item>
  where
    Item: PartialEq,
  {
    ContainsOp { source: self, target }
  }

  /// Emit whether every value satisfies `predicate`. Emits `false` as soon
  /// as a value fails it, `true` when the source completes.
  #[inline]
  fn all<F>(self, predicate: F) -> AllOp<Self, F, Item>
  where
    F: FnMut(&Item) -> bool,
  {
    AllOp::new(self, predicate)
  }

  /// Run `func` when the source completes, then forward the completion.
  #[inline]
  fn on_complete<F>(self, func: F) -> OnCompleteOp<Self, F>
  where
    F: FnOnce(),
  {
    OnCompleteOp { source: self, func }
  }

  /// Handle the source's error with `func`; the resulting stream can no
  /// longer fail.
  #[inline]
  fn on_error<F>(self, func: F) -> OnErrorOp<Self, F, Err>
  where
    F: FnOnce(Err),
  {
    OnErrorOp::new(self, func)
  }

  /// Erase the concrete operator chain behind a box.
  #[inline]
  fn box_it<'a>(self) -> BoxOp<'a, Item, Err>
  where
    Self: Observable<Item, Err, BoxedObserver<'a, Item, Err>> + 'a,
    <Self as Observable<Item, Err, BoxedObserver<'a, Item, Err>>>::Unsub: 'a,
    Item: 'a,
    Err: 'a,
  {
    BoxOp::new(self)
  }

  /// Invokes an execution of an Observable and registers a handler for the
  /// values it will emit. Completion is ignored and an error is logged.
  fn subscribe<N>(self, next: N) -> SubscriptionWrapper<<Self as Observable<Item, Err, ObserverN<N>>>::Unsub>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, ObserverN<N>>,
  {
    SubscriptionWrapper(self.actual_subscribe(ObserverN(next)))
  }

  /// Like `subscribe`, with handlers for all three kinds of events.
  fn subscribe_all<N, E, C>(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionWrapper<<Self as Observable<Item, Err, ObserverAll<N, E, C>>>::Unsub>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, ObserverAll<N, E, C>>,
  {
    SubscriptionWrapper(self.actual_subscribe(ObserverAll::new(next, error, complete)))
  }
}

/// Merge any number of observables of the same type. Completes immediately
/// when `sources` is empty.
pub fn merge_all<S, I>(sources: I) -> MergeAllOp<S>
where
  I: IntoIterator<Item = S>,
{
  MergeAllOp { sources: sources.into_iter().collect() }
}

/// Zip any number of observables of the same type into `Vec`s.
pub fn zip_all<S, I>(sources: I) -> Result<ZipAllOp<S>, OperatorError>
where
  I: IntoIterator<Item = S>,
{
  let sources: Vec<S> = sources.into_iter().collect();
  if sources.is_empty() {
    return Err(OperatorError::NoUpstream { operator: "zip_all" });
  }
  Ok(ZipAllOp { sources })
}

/// Combine the latest values of any number of observables of the same type
/// into `Vec`s.
pub fn combine_latest_all<S, I>(sources: I) -> Result<CombineLatestAllOp<S>, OperatorError>
where
  I: IntoIterator<Item = S>,
{
  let sources: Vec<S> = sources.into_iter().collect();
  if sources.is_empty() {
    return Err(OperatorError::NoUpstream { operator: "combine_latest_all" });
  }
  Ok(CombineLatestAllOp { sources })
}
