use super::subject_core::{CurrentValue, SubjectCore};
use crate::rc::RcDeref;

/// A subject that holds a current value.
///
/// Every new subscriber immediately receives the current value, then
/// whatever is pushed afterwards. Once terminated, new subscribers only get
/// the terminal event.
pub struct BehaviorSubject<'a, Item, Err> {
  pub(super) core: SubjectCore<'a, Item, Err, CurrentValue<Item>>,
}

impl<'a, Item, Err> BehaviorSubject<'a, Item, Err> {
  pub fn new(value: Item) -> Self { BehaviorSubject { core: SubjectCore::new(CurrentValue(value)) } }

  /// The value most recently delivered to subscribers, or the initial one.
  pub fn value(&self) -> Item
  where
    Item: Clone,
  {
    self.core.state().rc_deref().replay.0.clone()
  }
}
