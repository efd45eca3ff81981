use super::subscribers::Slot;
use crate::subscription::Subscription;
use std::rc::Rc;

/// Handle returned when subscribing to a subject.
///
/// Unsubscribing stops delivery immediately, even from inside a callback of
/// the same subject. It is idempotent, and a no-op after the subject has
/// terminated.
pub struct SubjectSubscription<'a, Item, Err>(Rc<Slot<'a, Item, Err>>);

impl<'a, Item, Err> SubjectSubscription<'a, Item, Err> {
  #[inline]
  pub(crate) fn new(slot: Rc<Slot<'a, Item, Err>>) -> Self { SubjectSubscription(slot) }
}

impl<'a, Item, Err> Clone for SubjectSubscription<'a, Item, Err> {
  #[inline]
  fn clone(&self) -> Self { SubjectSubscription(self.0.clone()) }
}

impl<'a, Item, Err> Subscription for SubjectSubscription<'a, Item, Err> {
  fn unsubscribe(self) {
    if !self.0.is_closed() {
      log::trace!("observer unsubscribed from subject");
    }
    self.0.close();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}
