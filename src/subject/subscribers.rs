use crate::observer::{BoxedObserver, Observer};
use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

/// One registered observer.
///
/// The slot is shared between the subject's list and the subscription handle
/// returned to the caller. Closing it is possible at any time, including while
/// the observer inside is running; the observer is then dropped as soon as
/// its current callback returns.
pub struct Slot<'a, Item, Err> {
  closed: Cell<bool>,
  observer: RefCell<Option<BoxedObserver<'a, Item, Err>>>,
}

impl<'a, Item, Err> Slot<'a, Item, Err> {
  pub(crate) fn new(observer: BoxedObserver<'a, Item, Err>) -> Self {
    Slot { closed: Cell::new(false), observer: RefCell::new(Some(observer)) }
  }

  /// A slot is closed once it was unsubscribed, received a terminal event or
  /// holds an observer that accepts no more values.
  pub(crate) fn is_closed(&self) -> bool {
    if self.closed.get() {
      return true;
    }
    // Borrowed means the observer is running right now, so it is still open.
    self
      .observer
      .try_borrow()
      .map_or(false, |o| o.as_ref().map_or(true, |o| o.is_finished()))
  }

  pub(crate) fn close(&self) {
    self.closed.set(true);
    let observer = match self.observer.try_borrow_mut() {
      Ok(mut o) => o.take(),
      Err(_) => None,
    };
    drop(observer);
  }

  pub(crate) fn next(&self, value: Item) {
    if self.closed.get() {
      return;
    }
    let finished = match self.observer.try_borrow_mut() {
      Ok(mut o) => match o.as_mut() {
        Some(observer) => {
          observer.next(value);
          observer.is_finished()
        }
        None => true,
      },
      Err(_) => {
        log::error!("observer re-entered while handling a value, value dropped");
        return;
      }
    };
    if finished || self.closed.get() {
      self.close();
    }
  }

  pub(crate) fn error(&self, err: Err) {
    if let Some(observer) = self.take_for_terminal() {
      observer.error(err);
    }
  }

  pub(crate) fn complete(&self) {
    if let Some(observer) = self.take_for_terminal() {
      observer.complete();
    }
  }

  fn take_for_terminal(&self) -> Option<BoxedObserver<'a, Item, Err>> {
    if self.closed.replace(true) {
      return None;
    }
    match self.observer.try_borrow_mut() {
      Ok(mut o) => o.take(),
      Err(_) => None,
    }
  }
}

/// Observers of a subject, in subscription order.
pub(crate) struct Subscribers<'a, Item, Err> {
  slots: Vec<Rc<Slot<'a, Item, Err>>>,
}

impl<'a, Item, Err> Default for Subscribers<'a, Item, Err> {
  fn default() -> Self { Subscribers { slots: vec![] } }
}

impl<'a, Item, Err> Subscribers<'a, Item, Err> {
  #[inline]
  pub(crate) fn push(&mut self, slot: Rc<Slot<'a, Item, Err>>) { self.slots.push(slot); }

  /// Drops closed slots and returns a copy of the remaining ones, so the list
  /// itself is free to change while the copy is being notified.
  pub(crate) fn snapshot(&mut self) -> Vec<Rc<Slot<'a, Item, Err>>> {
    self.slots.retain(|s| !s.is_closed());
    self.slots.clone()
  }

  /// Takes every slot out of the list, leaving it empty.
  #[inline]
  pub(crate) fn drain(&mut self) -> Vec<Rc<Slot<'a, Item, Err>>> { std::mem::take(&mut self.slots) }

  pub(crate) fn len(&self) -> usize { self.slots.iter().filter(|s| !s.is_closed()).count() }
}

/// Hands `value` to every slot, cloning it for all but the last one.
pub(crate) fn broadcast_value<Item: Clone, Err>(slots: &[Rc<Slot<'_, Item, Err>>], value: Item) {
  let mut iter = slots.iter().peekable();
  while let Some(slot) = iter.next() {
    if iter.peek().is_some() {
      slot.next(value.clone());
    } else {
      slot.next(value);
      break;
    }
  }
}

pub(crate) fn broadcast_error<Item, Err: Clone>(slots: &[Rc<Slot<'_, Item, Err>>], err: Err) {
  let mut iter = slots.iter().peekable();
  while let Some(slot) = iter.next() {
    if iter.peek().is_some() {
      slot.error(err.clone());
    } else {
      slot.error(err);
      break;
    }
  }
}

pub(crate) fn broadcast_complete<Item, Err>(slots: &[Rc<Slot<'_, Item, Err>>]) {
  for slot in slots {
    slot.complete();
  }
}
