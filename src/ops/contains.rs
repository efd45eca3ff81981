use crate::prelude::*;

#[derive(Clone)]
pub struct ContainsOp<S, Item> {
  pub(crate) source: S,
  pub(crate) target: Item,
}

impl<Item, Err, O, S> Observable<bool, Err, O> for ContainsOp<S, Item>
where
  O: Observer<bool, Err>,
  S: Observable<Item, Err, ContainsObserver<O, Item>>,
  Item: PartialEq,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(ContainsObserver { observer: Some(observer), target: self.target })
  }
}

impl<Item, Err, S> ObservableExt<bool, Err> for ContainsOp<S, Item>
where
  S: ObservableExt<Item, Err>,
  Item: PartialEq,
{
}

pub struct ContainsObserver<O, Item> {
  observer: Option<O>,
  target: Item,
}

impl<O, Item, Err> Observer<Item, Err> for ContainsObserver<O, Item>
where
  O: Observer<bool, Err>,
  Item: PartialEq,
{
  fn next(&mut self, value: Item) {
    if self.target == value {
      if let Some(mut observer) = self.observer.take() {
        observer.next(true);
        observer.complete();
      }
    }
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    if let Some(mut observer) = self.observer {
      observer.next(false);
      observer.complete();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn contains_smoke() {
    let mut results = vec![];
    observable::from_iter(0..10)
      .contains(4)
      .subscribe(|b| results.push(b));
    observable::from_iter(0..10)
      .contains(99)
      .subscribe(|b| results.push(b));
    observable::empty().contains(1).subscribe(|b| results.push(b));
    assert_eq!(results, vec![true, false, false]);
  }

  #[test]
  fn answers_as_soon_as_target_is_seen() {
    let mut results = vec![];
    let mut subject = Subject::<i32, ()>::new();
    subject.clone().contains(2).subscribe(|b| results.push(b));
    subject.next(1);
    subject.next(2);
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(2);
    drop(subject);
    assert_eq!(results, vec![true]);
  }

  #[test]
  fn bench() { do_bench(); }

  benchmark_group!(do_bench, bench_contains);

  fn bench_contains(b: &mut bencher::Bencher) { b.iter(contains_smoke); }
}
