//! # Per-coordinator configuration.
//!
//! Provides [`Config`], the settings shared by both coordinators and the
//! [`Monitor`](crate::Monitor).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no timeout (treated as `None` by [`Config::invocation_timeout`])
//! - `bus_capacity = 0` → clamped to 1

use std::borrow::Cow;
use std::time::Duration;

/// Configuration for a coordinator instance.
///
/// ## Field semantics
/// - `name`: Label attached to every event the coordinator publishes
/// - `timeout`: Per-invocation timeout (`0s` = no timeout)
/// - `bus_capacity`: Ring buffer size of a coordinator-owned bus (min 1)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name reported in events (e.g. `"search"`, `"submit-form"`).
    pub name: Cow<'static, str>,

    /// Upper bound on a single invocation.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the invocation is cancelled and resolves
    ///   [`InvokeError::Timeout`](crate::InvokeError::Timeout) once exceeded
    pub timeout: Duration,

    /// Capacity of the event bus created when no shared bus is supplied.
    ///
    /// Ignored when the builder receives a bus via `with_bus`.
    pub bus_capacity: usize,
}

impl Config {
    /// Creates a default config with the given name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the per-invocation timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → applied to every invocation
    #[inline]
    pub fn invocation_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "coordinator"`
    /// - `timeout = 0s` (no timeout)
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("coordinator"),
            timeout: Duration::ZERO,
            bus_capacity: 256,
        }
    }
}
