use crate::rc::{MutRc, RcDeref, RcDerefMut};
use smallvec::SmallVec;
use std::fmt::{Debug, Formatter};

/// Subscription returns from `Observable::actual_subscribe` to allow
/// unsubscribing.
pub trait Subscription {
  /// This allows deregistering an stream before it has finished receiving all
  /// events (i.e. before `complete` is called).
  fn unsubscribe(self);

  fn is_closed(&self) -> bool;
}

/// Synchronous sources have finished by the time `actual_subscribe` returns.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

/// A slot that may hold a subscription, shared between the owner and the
/// code that fills or cancels it.
impl<T: Subscription> Subscription for MutRc<Option<T>> {
  fn unsubscribe(self) {
    let inner = self.rc_deref_mut().take();
    if let Some(inner) = inner {
      inner.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.rc_deref().as_ref().map_or(true, Subscription::is_closed) }
}

/// Object-safe mirror of [`Subscription`].
pub trait DynSubscription {
  fn box_unsubscribe(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T: Subscription> DynSubscription for T {
  #[inline]
  fn box_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }
  #[inline]
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscription.
pub struct BoxSubscription<'a>(Box<dyn DynSubscription + 'a>);

impl<'a> BoxSubscription<'a> {
  #[inline]
  pub fn new(subscription: impl Subscription + 'a) -> Self { BoxSubscription(Box::new(subscription)) }
}

impl<'a> Subscription for BoxSubscription<'a> {
  #[inline]
  fn unsubscribe(self) { self.0.box_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.box_is_closed() }
}

impl<'a> Debug for BoxSubscription<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxSubscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// Two subscriptions treated as one.
pub struct ZipSubscription<A, B> {
  a: A,
  b: B,
}

impl<A, B> ZipSubscription<A, B> {
  #[inline]
  pub fn new(a: A, b: B) -> Self { ZipSubscription { a, b } }
}

impl<A: Subscription, B: Subscription> Subscription for ZipSubscription<A, B> {
  #[inline]
  fn unsubscribe(self) {
    self.a.unsubscribe();
    self.b.unsubscribe();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.a.is_closed() && self.b.is_closed() }
}

/// Any number of subscriptions of the same type treated as one.
pub struct MultiSubscription<U>(SmallVec<[U; 4]>);

impl<U> FromIterator<U> for MultiSubscription<U> {
  fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self { MultiSubscription(iter.into_iter().collect()) }
}

impl<U: Subscription> Subscription for MultiSubscription<U> {
  fn unsubscribe(self) {
    for u in self.0 {
      u.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.iter().all(Subscription::is_closed) }
}

/// Wrapper around a subscription which provides the
/// `unsubscribe_when_dropped()` and `store_in()` methods.
pub struct SubscriptionWrapper<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> { SubscriptionGuard(Some(self.0)) }

  /// Hands the subscription to `bag`, which unsubscribes it when the bag is
  /// disposed or dropped.
  pub fn store_in<'a>(self, bag: &mut SubscriptionBag<'a>)
  where
    T: 'a,
  {
    bag.store(self.0)
  }

  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: Subscription> Subscription for SubscriptionWrapper<T> {
  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
  #[inline]
  fn unsubscribe(self) { self.0.unsubscribe() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(Option<T>);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(Some(subscription)) }

  pub fn is_closed(&self) -> bool { self.0.as_ref().map_or(true, Subscription::is_closed) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) {
    if let Some(s) = self.0.take() {
      s.unsubscribe()
    }
  }
}

/// Owned collection of subscriptions scoped to the lifetime of its owner,
/// typically one screen or session.
///
/// Dropping the bag (or calling [`SubscriptionBag::dispose`]) unsubscribes
/// everything it holds, in insertion order.
#[derive(Default)]
pub struct SubscriptionBag<'a> {
  subscriptions: SmallVec<[BoxSubscription<'a>; 4]>,
}

impl<'a> SubscriptionBag<'a> {
  pub fn new() -> Self { Self::default() }

  pub fn store(&mut self, subscription: impl Subscription + 'a) {
    self.subscriptions.retain(|s| !s.is_closed());
    self.subscriptions.push(BoxSubscription::new(subscription));
  }

  /// Number of stored subscriptions that are still open.
  pub fn len(&self) -> usize { self.subscriptions.iter().filter(|s| !s.is_closed()).count() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Unsubscribes and forgets every stored subscription. The bag stays
  /// usable afterwards.
  pub fn dispose(&mut self) {
    for s in self.subscriptions.drain(..) {
      s.unsubscribe();
    }
  }
}

impl<'a> Drop for SubscriptionBag<'a> {
  fn drop(&mut self) { self.dispose() }
}

impl<'a> Debug for SubscriptionBag<'a> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionBag")
      .field("stored", &self.subscriptions.len())
      .field("open", &self.len())
      .finish()
  }
}
