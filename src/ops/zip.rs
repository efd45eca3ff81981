use super::downstream::Downstream;
use crate::{
  prelude::*,
  rc::{MutRc, RcDerefMut},
  subscription::MultiSubscription,
};
use std::collections::VecDeque;

/// Pairs up the values of two observables by index, see
/// [`ObservableExt::zip`].
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) source_a: A,
  pub(crate) source_b: B,
}

impl<ItemA, ItemB, Err, O, A, B> Observable<(ItemA, ItemB), Err, O> for ZipOp<A, B>
where
  O: Observer<(ItemA, ItemB), Err>,
  A: Observable<ItemA, Err, ZipAObserver<O, ItemA, ItemB, Err>>,
  B: Observable<ItemB, Err, ZipBObserver<O, ItemA, ItemB, Err>>,
{
  type Unsub = ZipSubscription<ZipSubscription<A::Unsub, B::Unsub>, Downstream<O, (ItemA, ItemB), Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let state = MutRc::own(ZipState::default());
    let downstream = Downstream::new(observer);
    let a = self
      .source_a
      .actual_subscribe(ZipAObserver { state: state.clone(), downstream: downstream.clone() });
    let b = self.source_b.actual_subscribe(ZipBObserver { state, downstream: downstream.clone() });
    ZipSubscription::new(ZipSubscription::new(a, b), downstream)
  }
}

impl<ItemA, ItemB, Err, A, B> ObservableExt<(ItemA, ItemB), Err> for ZipOp<A, B>
where
  A: ObservableExt<ItemA, Err>,
  B: ObservableExt<ItemB, Err>,
{
}

/// Values of each side still waiting for a partner.
pub struct ZipState<ItemA, ItemB> {
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
}

impl<ItemA, ItemB> Default for ZipState<ItemA, ItemB> {
  fn default() -> Self {
    Self { buffer_a: VecDeque::new(), buffer_b: VecDeque::new(), completed_a: false, completed_b: false }
  }
}

impl<ItemA, ItemB> ZipState<ItemA, ItemB> {
  /// No further pair can be formed: a side has completed and nothing of it
  /// is left waiting for a partner.
  fn exhausted(&self) -> bool {
    (self.completed_a && self.buffer_a.is_empty()) || (self.completed_b && self.buffer_b.is_empty())
  }
}

pub struct ZipAObserver<O, ItemA, ItemB, Err> {
  state: MutRc<ZipState<ItemA, ItemB>>,
  downstream: Downstream<O, (ItemA, ItemB), Err>,
}

pub struct ZipBObserver<O, ItemA, ItemB, Err> {
  state: MutRc<ZipState<ItemA, ItemB>>,
  downstream: Downstream<O, (ItemA, ItemB), Err>,
}

impl<O, ItemA, ItemB, Err> Observer<ItemA, Err> for ZipAObserver<O, ItemA, ItemB, Err>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemA) {
    if self.downstream.is_finished() {
      return;
    }
    let (pair, exhausted) = {
      let mut state = self.state.rc_deref_mut();
      let pair = match state.buffer_b.pop_front() {
        Some(b) => Some((value, b)),
        None => {
          state.buffer_a.push_back(value);
          None
        }
      };
      (pair, state.exhausted())
    };
    if let Some(pair) = pair {
      self.downstream.next(pair);
    }
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let exhausted = {
      let mut state = self.state.rc_deref_mut();
      state.completed_a = true;
      state.exhausted()
    };
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

impl<O, ItemA, ItemB, Err> Observer<ItemB, Err> for ZipBObserver<O, ItemA, ItemB, Err>
where
  O: Observer<(ItemA, ItemB), Err>,
{
  fn next(&mut self, value: ItemB) {
    if self.downstream.is_finished() {
      return;
    }
    let (pair, exhausted) = {
      let mut state = self.state.rc_deref_mut();
      let pair = match state.buffer_a.pop_front() {
        Some(a) => Some((a, value)),
        None => {
          state.buffer_b.push_back(value);
          None
        }
      };
      (pair, state.exhausted())
    };
    if let Some(pair) = pair {
      self.downstream.next(pair);
    }
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let exhausted = {
      let mut state = self.state.rc_deref_mut();
      state.completed_b = true;
      state.exhausted()
    };
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}

/// Zips any number of observables into `Vec`s, see
/// [`zip_all`](crate::observable::zip_all).
#[derive(Clone)]
pub struct ZipAllOp<S> {
  pub(crate) sources: Vec<S>,
}

impl<Item, Err, O, S> Observable<Vec<Item>, Err, O> for ZipAllOp<S>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, ZipAllObserver<O, Item, Err>>,
{
  type Unsub = ZipSubscription<MultiSubscription<S::Unsub>, Downstream<O, Vec<Item>, Err>>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let n = self.sources.len();
    let state = MutRc::own(ZipAllState {
      buffers: (0..n).map(|_| VecDeque::new()).collect(),
      completed: vec![false; n],
    });
    let downstream = Downstream::new(observer);
    let upstreams = self
      .sources
      .into_iter()
      .enumerate()
      .map(|(index, s)| {
        s.actual_subscribe(ZipAllObserver { state: state.clone(), downstream: downstream.clone(), index })
      })
      .collect();
    ZipSubscription::new(upstreams, downstream)
  }
}

impl<Item, Err, S> ObservableExt<Vec<Item>, Err> for ZipAllOp<S> where S: ObservableExt<Item, Err> {}

pub struct ZipAllState<Item> {
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
}

impl<Item> ZipAllState<Item> {
  fn exhausted(&self) -> bool {
    self
      .buffers
      .iter()
      .zip(&self.completed)
      .any(|(buffer, completed)| *completed && buffer.is_empty())
  }
}

pub struct ZipAllObserver<O, Item, Err> {
  state: MutRc<ZipAllState<Item>>,
  downstream: Downstream<O, Vec<Item>, Err>,
  index: usize,
}

impl<O, Item, Err> Observer<Item, Err> for ZipAllObserver<O, Item, Err>
where
  O: Observer<Vec<Item>, Err>,
{
  fn next(&mut self, value: Item) {
    if self.downstream.is_finished() {
      return;
    }
    let (row, exhausted) = {
      let mut state = self.state.rc_deref_mut();
      state.buffers[self.index].push_back(value);
      let row = if state.buffers.iter().all(|b| !b.is_empty()) {
        Some(state.buffers.iter_mut().filter_map(VecDeque::pop_front).collect::<Vec<_>>())
      } else {
        None
      };
      (row, state.exhausted())
    };
    if let Some(row) = row {
      self.downstream.next(row);
    }
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn error(self, err: Err) { self.downstream.error(err) }

  fn complete(self) {
    let exhausted = {
      let mut state = self.state.rc_deref_mut();
      state.completed[self.index] = true;
      state.exhausted()
    };
    if exhausted {
      self.downstream.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.downstream.is_finished() }
}
