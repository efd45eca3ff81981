use super::downstream::Downstream;
use crate::{
  prelude::*,
  rc::{MutRc, RcDerefMut},
  subscription::MultiSubscription,
};

#[derive(Clone)]
pub struct CombineLatestOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<ItemA, ItemB, Err, O, A, B> Observable<(ItemA, ItemB), Err, O> for CombineLatestOp<A, B>
where
  O: Observer<(ItemA, ItemB), Err>,
  A: Observable<ItemA, Err, AObserver<O, ItemA, ItemB, Err>>,
  B: Observable<ItemB, Err, BObserver<O, ItemA, ItemB, Err>>,
  ItemA: Clone,
  ItemB: Clone,
{
  type Unsub = ZipSubscription<ZipSubscription<A::Unsub, B::Unsub>, Downstream<O, (ItemA, ItemB), Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let state = MutRc::own(CombineLatestState { a: None, b: None, completed: 0 });
    let downstream = Downstream::new(observer);
    let a = self.a.actual_subscribe(AObserver { state: state.clone(), downstream: downstream.clone() });
    let b = self.b.actual_subscribe(BObserver { state, downstream: downstream.clone() });
    ZipSubscription::new(ZipSubscription::new(a, b), downstream)
  }
}

impl<ItemA, ItemB, Err, A, B> ObservableExt<(ItemA, ItemB), Err> for CombineLatestOp<A, B>
where
  A: ObservableExt<ItemA, Err>,
  B: ObservableExt<ItemB, Err>,
{
}

enum CombineItem<A, B> {
  ItemA(A),
  ItemB(B),
}

pub struct CombineLatestState<A, B> {
  a: Option<A>,
  b: Option<B>,
  completed: usize,
}

impl<A: Clone, B: Clone> CombineLatestState<A, B> {
  /// Records `value` and returns the pair to emit, once both sides have one.
  fn update(&mut self, value: CombineItem<A, B>) -> Option<(A, B)> {
    match value {
      CombineItem::ItemA(v) => self.a = Some(v),
      CombineItem::ItemB(v) => self.b = Some(v),
    }
    match (&self.a, &self.b) {
      (Some(a), Some(b)) => Some((a.clone(), b.clone())),
      _ => None,
    }
  }
}

pub struct AObserver<O, A, B, Err> {
  state: MutRc<CombineLatestState<A, B>>,
  downstream: Downstream<O, (A, B), Err>,
}

pub struct BObserver<O, A, B, Err> {
  state: MutRc<CombineLatestState<A, B>>,
  downstream: Downstream<O, (A, B), Err>,
}

macro_rules! impl_combine_side_observer {
  ($side:ident, $item:ident, $variant:ident) => {
    impl<O, A, B, Err> Observer<$item, Err> for $side<O, A, B, Err>
    where
      O: Observer<(A, B), Err>,
      A: Clone,
      B: Clone,
    {
      fn next(&mut self, value: $item) {
        let pair = self.state.rc_deref_mut().update(CombineItem::$variant(value));
        if let Some(pair) = pair {
          self.downstream.next(pair);
        }
      }

      #[inline]
      fn error(self, err: Err) { self.downstream.error(err) }

      fn complete(self) {
        let all_done = {
          let mut state = self.state.rc_deref_mut();
          state.completed += 1;
          state.completed == 2
        };
        if all_done {
          self.downstream.complete();
        }
      }

      #[inline]
      fn is_finished(&self) -> bool { self.downstream.is_finished() }
    }
  };
}

impl_combine_side_observer!(AObserver, A, ItemA);
impl_combine_side_observer!(BObserver, B, ItemB);

/// Latest values of any number of observables, see
/// [`combine_latest_all`](crate::observable::combine_latest_all).
#[derive(Clone)]
pub struct CombineLatestAllOp<S> {
  pub(crate) sources: Vec<S>,
}

impl<Item, Err, O, S> Observable<Vec<Item>, Err, O> for CombineLatestAllOp<S>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, CombineLatestAllObserver<O, Item, Err>>,
  Item: Clone,
{
  type Unsub = ZipSubscription<MultiSubscription<S::Unsub>, Downstream<O, Vec<Item>, Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let n = self.sources.len();
    let state = MutRc::own(CombineLatestAllState { latest: (0..n).map(|_| None).collect(), remaining: n });
    let downstream = Downstream::new(observer);
    let upstreams = self
      .sources
      .into_iter()
      .enumerate()
      .map(|(index, s)| {
        s.actual_subscribe(CombineLatestAllObserver { state: state.clone(), downstream: downstream.clone(), index })
      })
      .collect();
    ZipSubscription::new(upstreams, downstream)
  }
}

impl<Item, Err, S> ObservableExt<Vec<Item>, Err> for CombineLatestAllOp<S>
where
  S: ObservableExt<Item, Err>,
  Item: Clone,
{
}

pub struct CombineLatestAllState<Item> {
  latest: Vec<Option<Item>>,
  remaining: usize,
}

pub struct CombineLatestAllObserver<O, Item, Err> {
  state: MutRc<CombineLatestAllState<Item>>,
  downstream: Downstream<O, Vec<Item>, Err>,
  index: usize,
}

impl<O, Item, Err> Observer<Item, Err> for CombineLatestAllObserver<O, Item, Err>
where
  O: Observer<Vec<Item>, Err>,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let row: Option<Vec<Item>> = {
      let mut state = self.state.rc_deref_mut();
      state.latest[self.index] = Some(value);
      state.latest.iter().cloned().collect()
    };
    if let Some(row) = row {
      self.downstream.next(row);
    }
  }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let all_done = {
      let mut state = self.state.rc_deref_mut();
      state.remaining -= 1;
      state.remaining == 0
    };
    if all_done {
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
  fn waits_for_both_then_tracks_latest() {
    let mut out = vec![];
    let mut a = Subject::<i32, ()>::new();
    let mut b = Subject::<&str, ()>::new();
    a.clone().combine_latest(b.clone()).subscribe(|v| out.push(v));

    a.next(1);
    a.next(2);
    b.next("x");
    a.next(3);
    b.next("y");
    drop((a, b));
    assert_eq!(out, vec![(2, "x"), (3, "x"), (3, "y")]);
  }

  #[test]
  fn completes_when_all_upstreams_complete() {
    let completed = Cell::new(false);
    let a = Subject::<i32, ()>::new();
    let b = Subject::<i32, ()>::new();
    a.clone()
      .combine_latest(b.clone())
      .on_complete(|| completed.set(true))
      .subscribe(|_| {});
    a.clone().complete();
    assert!(!completed.get());
    b.clone().complete();
    assert!(completed.get());
  }

  #[test]
  fn error_from_either_side_ends_output() {
    let err = Cell::new("");
    let a = Subject::<i32, &str>::new();
    let b = Subject::<i32, &str>::new();
    a.clone()
      .combine_latest(b.clone())
      .subscribe_all(|_| {}, |e| err.set(e), || {});
    b.clone().error("b failed");
    a.clone().error("a failed");
    assert_eq!(err.get(), "b failed");
  }

  #[test]
  fn combine_latest_all_rows() {
    let mut rows = vec![];
    let mut subjects: Vec<Subject<i32, ()>> = (0..3).map(|_| Subject::new()).collect();
    observable::combine_latest_all(subjects.clone())
      .unwrap()
      .subscribe(|row| rows.push(row));

    subjects[0].next(1);
    subjects[1].next(2);
    subjects[2].next(3);
    subjects[1].next(20);
    drop(subjects);
    assert_eq!(rows, vec![vec![1, 2, 3], vec![1, 20, 3]]);
  }

  #[test]
  fn output_handler_may_push_into_either_side() {
    let mut a = Subject::<i32, ()>::new();
    let mut b = Subject::<i32, ()>::new();
    let out = Rc::new(RefCell::new(vec![]));
    let (mut feedback, o) = (b.clone(), out.clone());
    a.clone().combine_latest(b.clone()).subscribe(move |(x, y)| {
      o.borrow_mut().push((x, y));
      if y == 0 {
        feedback.next(x * 10);
      }
    });

    b.next(0);
    a.next(1);
    assert_eq!(*out.borrow(), vec![(1, 0), (1, 10)]);
  }

  #[test]
  fn row_handler_may_push_into_a_source() {
    let subjects: Vec<Subject<i32, ()>> = (0..2).map(|_| Subject::new()).collect();
    let rows = Rc::new(RefCell::new(vec![]));
    let (mut feedback, r) = (subjects[1].clone(), rows.clone());
    observable::combine_latest_all(subjects.clone())
      .unwrap()
      .subscribe(move |row: Vec<i32>| {
        if row[1] == 0 {
          feedback.next(5);
        }
        r.borrow_mut().push(row);
      });

    subjects[1].clone().next(0);
    subjects[0].clone().next(1);
    assert_eq!(*rows.borrow(), vec![vec![1, 0], vec![1, 5]]);
  }
}
