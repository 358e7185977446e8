//! Computed-or-degraded results.
//!
//! Numerical failures inside the pipeline are recovered with a documented fallback value
//! rather than an error. `Outcome` keeps the fallback distinguishable from a real result so
//! callers (and tests) can tell the two apart.

use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Computed(T),
    /// `value` is the fallback; `cause` is the failure it replaced.
    Degraded { value: T, cause: Error },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, cause: Error) -> Self {
        Outcome::Degraded { value, cause }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Computed(v) => v,
            Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Computed(v) => v,
            Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn cause(&self) -> Option<&Error> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }

    /// The computed value, or `None` if this is a fallback.
    pub fn computed(self) -> Option<T> {
        match self {
            Outcome::Computed(v) => Some(v),
            Outcome::Degraded { .. } => None,
        }
    }

    /// Lift a `Result`, substituting `fallback` on error.
    pub fn from_result(result: crate::Result<T>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(v) => Outcome::Computed(v),
            Err(cause) => Outcome::Degraded {
                value: fallback(),
                cause,
            },
        }
    }
}
