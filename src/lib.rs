//! # rxstream: single-threaded reactive streams
//!
//! Push-based streams of values that end with either completion or an
//! error, plus the pieces to build and consume them.
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A stream recipe; operators live on [`ObservableExt`] |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subject`] / [`BehaviorSubject`] | Hot sources fed by hand, passthrough or current-value |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`SubscriptionBag`] | Cancels everything it holds when dropped |
//! | [`Scheduler`] | Runs the timers of `throttle` |
//!
//! Everything is local to one thread: shared state uses `Rc<RefCell<_>>`
//! and nothing is `Send`.
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `futures::executor::LocalSpawner` as a
//!   [`Scheduler`]
//! - **`timer`** (default): real delays for that scheduler via `futures-time`
//!
//! [`Observable`]: observable::Observable
//! [`ObservableExt`]: observable::ObservableExt
//! [`Observer`]: observer::Observer
//! [`Subject`]: subject::Subject
//! [`BehaviorSubject`]: subject::BehaviorSubject
//! [`Subscription`]: subscription::Subscription
//! [`SubscriptionBag`]: subscription::SubscriptionBag
//! [`Scheduler`]: scheduler::Scheduler
#[cfg(test)]
#[macro_use]
extern crate bencher;

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use prelude::*;
