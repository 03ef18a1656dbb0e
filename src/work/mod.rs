//! # Unit-of-work abstractions.
//!
//! This module provides the types a coordinator invokes:
//! - [`Work`] - trait for an async, cancel-aware operation taking an input
//! - [`WorkFn`] - closure-backed implementation
//! - [`WorkRef`] - shared reference to a unit of work (`Arc<dyn Work<..>>`)

mod work;
mod work_fn;

pub use work::{BoxWorkFuture, Work, WorkRef};
pub use work_fn::WorkFn;
