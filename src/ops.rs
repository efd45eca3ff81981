//! Operator implementations behind the [`ObservableExt`] methods.
//!
//! [`ObservableExt`]: crate::observable::ObservableExt
pub mod all;
pub mod box_it;
pub mod combine_latest;
pub mod contains;
pub mod downstream;
pub mod filter;
pub mod first;
pub mod map;
pub mod merge;
pub mod on_complete;
pub mod on_error;
pub mod throttle_time;
pub mod zip;
