//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::{OperatorError, SubjectError},
  observable,
  observable::{Observable, ObservableExt, TargetAction, TargetId, TargetRegistry},
  observer::{BoxedObserver, Observer},
  ops::{box_it::BoxOp, throttle_time::ThrottleEdge},
  scheduler::{Duration, OnceTask, Scheduler, TaskHandle, TestScheduler},
  subject::*,
  subscription::*,
};
