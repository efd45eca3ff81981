use super::downstream::Downstream;
use crate::{
  prelude::*,
  rc::{MutRc, RcDerefMut},
  subscription::MultiSubscription,
};

/// combine two Observables into one by merging their emissions
///
/// # Example
///
/// ```
/// # use rxstream::prelude::*;
/// let numbers = Subject::<i32, ()>::new();
/// // an even stream
/// let even = numbers.clone().filter(|v| *v % 2 == 0);
/// // an odd stream
/// let odd = numbers.clone().filter(|v| *v % 2 != 0);
///
/// // merge odd and even stream again
/// let merged = even.merge(odd);
///
/// // attach observers
/// merged.subscribe(|v| println!("{} ", v));
/// ```
#[derive(Clone)]
pub struct MergeOp<S1, S2> {
  pub(crate) source1: S1,
  pub(crate) source2: S2,
}

impl<Item, Err, O, S1, S2> Observable<Item, Err, O> for MergeOp<S1, S2>
where
  O: Observer<Item, Err>,
  S1: Observable<Item, Err, MergeObserver<O, Item, Err>>,
  S2: Observable<Item, Err, MergeObserver<O, Item, Err>>,
{
  type Unsub = ZipSubscription<ZipSubscription<S1::Unsub, S2::Unsub>, Downstream<O, Item, Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = Downstream::new(observer);
    let remaining = MutRc::own(2);
    let a = self
      .source1
      .actual_subscribe(MergeObserver { downstream: downstream.clone(), remaining: remaining.clone() });
    let b = self
      .source2
      .actual_subscribe(MergeObserver { downstream: downstream.clone(), remaining });
    ZipSubscription::new(ZipSubscription::new(a, b), downstream)
  }
}

impl<Item, Err, S1, S2> ObservableExt<Item, Err> for MergeOp<S1, S2>
where
  S1: ObservableExt<Item, Err>,
  S2: ObservableExt<Item, Err>,
{
}

/// Any number of observables merged into one, see
/// [`merge_all`](crate::observable::merge_all).
#[derive(Clone)]
pub struct MergeAllOp<S> {
  pub(crate) sources: Vec<S>,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for MergeAllOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, MergeObserver<O, Item, Err>>,
{
  type Unsub = ZipSubscription<MultiSubscription<S::Unsub>, Downstream<O, Item, Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = Downstream::new(observer);
    if self.sources.is_empty() {
      downstream.complete();
      return ZipSubscription::new(MultiSubscription::from_iter(None), downstream);
    }
    let remaining = MutRc::own(self.sources.len());
    let upstreams = self
      .sources
      .into_iter()
      .map(|s| s.actual_subscribe(MergeObserver { downstream: downstream.clone(), remaining: remaining.clone() }))
      .collect();
    ZipSubscription::new(upstreams, downstream)
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for MergeAllOp<S> where S: ObservableExt<Item, Err> {}

/// One upstream's view of the merged output. Values are forwarded as they
/// arrive, the first error ends the output, and completion waits for the
/// last upstream.
pub struct MergeObserver<O, Item, Err> {
  downstream: Downstream<O, Item, Err>,
  remaining: MutRc<usize>,
}

impl<Item, Err, O> Observer<Item, Err> for MergeObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.downstream.next(value) }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let last = {
      let mut remaining = self.remaining.rc_deref_mut();
      *remaining -= 1;
      *remaining == 0
    };
    if last {
      self.downstream.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn odd_even_merge() {
    // three collection to store streams emissions
    let odd_store = Rc::new(RefCell::new(vec![]));
    let even_store = Rc::new(RefCell::new(vec![]));
    let numbers_store = Rc::new(RefCell::new(vec![]));

    let mut numbers = Subject::<i32, ()>::new();
    // enabling multiple observers for even stream;
    let even = numbers.clone().filter(|v| *v % 2 == 0);
    // enabling multiple observers for odd stream;
    let odd = numbers.clone().filter(|v| *v % 2 != 0);

    let (c_even, c_odd, c_numbers) = (even_store.clone(), odd_store.clone(), numbers_store.clone());
    // merge odd and even stream again
    even.clone().merge(odd.clone()).subscribe(move |v| c_numbers.borrow_mut().push(v));

    //  attach observers
    even.subscribe(move |v| c_even.borrow_mut().push(v));
    odd.subscribe(move |v| c_odd.borrow_mut().push(v));

    (0..10).for_each(|v| numbers.next(v));

    assert_eq!(*even_store.borrow(), vec![0, 2, 4, 6, 8]);
    assert_eq!(*odd_store.borrow(), vec![1, 3, 5, 7, 9]);
    assert_eq!(*numbers_store.borrow(), (0..10).collect::<Vec<_>>());
  }

  #[test]
  fn merge_unsubscribe_work() {
    let mut numbers = Subject::<i32, ()>::new();
    // enabling multiple observers for even stream;
    let even = numbers.clone().filter(|v| *v % 2 == 0);
    // enabling multiple observers for odd stream;
    let odd = numbers.clone().filter(|v| *v % 2 != 0);

    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    even
      .merge(odd)
      .subscribe(move |v| s.borrow_mut().push(v))
      .unsubscribe();

    (0..10).for_each(|v| numbers.next(v));
    assert!(seen.borrow().is_empty());
  }

  #[test]
  fn completed_test() {
    let completed = Cell::new(false);
    let mut even = Subject::<i32, ()>::new();
    let mut odd = Subject::<i32, ()>::new();

    even
      .clone()
      .merge(odd.clone())
      .on_complete(|| completed.set(true))
      .subscribe(|_: i32| {});

    even.next(1);
    even.clone().complete();
    assert!(!completed.get());
    odd.next(2);
    odd.clone().complete();
    assert!(completed.get());
  }

  #[test]
  fn error_test() {
    let completed = Cell::new(0);
    let error = Cell::new(0);
    let mut even = Subject::<i32, &str>::new();
    let odd = Subject::<i32, &str>::new();

    even.clone().merge(odd.clone()).subscribe_all(
      |_: i32| {},
      |_| error.set(error.get() + 1),
      || completed.set(completed.get() + 1),
    );

    odd.clone().error("");
    even.clone().error("");
    even.next(1);

    assert_eq!(completed.get(), 0);
    assert_eq!(error.get(), 1);
  }

  #[test]
  fn merge_all_interleaves_synchronous_sources() {
    let mut values = vec![];
    let completed = Cell::new(false);
    observable::merge_all(vec![observable::from_iter(vec![1, 2, 3]), observable::from_iter(vec![4, 5, 6])])
      .on_complete(|| completed.set(true))
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    assert!(completed.get());
  }

  #[test]
  fn merge_all_of_nothing_completes() {
    let completed = Cell::new(false);
    let none: Vec<Subject<i32, ()>> = vec![];
    observable::merge_all(none)
      .on_complete(|| completed.set(true))
      .subscribe(|_| {});
    assert!(completed.get());
  }

  #[test]
  fn downstream_may_push_into_the_other_upstream() {
    let mut a = Subject::<i32, ()>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let (mut b, s) = (Subject::<i32, ()>::new(), seen.clone());
    let mut feedback = b.clone();
    a.clone().merge(b.clone()).subscribe(move |v| {
      s.borrow_mut().push(v);
      if v == 1 {
        feedback.next(2);
        s.borrow_mut().push(-1);
      }
    });

    a.next(1);
    b.next(3);
    assert_eq!(*seen.borrow(), vec![1, -1, 2, 3]);
  }
}
