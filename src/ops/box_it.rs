//! Type erasure for observables.
//!
//! `box_it` hides an operator chain behind [`BoxOp`], so streams built in
//! different ways can share one type, e.g. in a `Vec` or a struct field.

use crate::{
  observer::BoxedObserver,
  prelude::*,
  subscription::BoxSubscription,
};

type SubscribeFn<'a, Item, Err> = Box<dyn FnOnce(BoxedObserver<'a, Item, Err>) -> BoxSubscription<'a> + 'a>;

pub struct BoxOp<'a, Item, Err>(SubscribeFn<'a, Item, Err>);

impl<'a, Item: 'a, Err: 'a> BoxOp<'a, Item, Err> {
  pub(crate) fn new<S>(source: S) -> Self
  where
    S: Observable<Item, Err, BoxedObserver<'a, Item, Err>> + 'a,
    S::Unsub: 'a,
  {
    BoxOp(Box::new(move |observer| BoxSubscription::new(source.actual_subscribe(observer))))
  }
}

impl<'a, Item, Err, O> Observable<Item, Err, O> for BoxOp<'a, Item, Err>
where
  O: Observer<Item, Err> + 'a,
{
  type Unsub = BoxSubscription<'a>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub { (self.0)(Box::new(observer)) }
}

impl<'a, Item, Err> ObservableExt<Item, Err> for BoxOp<'a, Item, Err> {}
