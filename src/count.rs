// vim: tw=80
//! Call-count specifications for verification.

use std::fmt;
use std::time::Duration;

/// How many times a verified call is required to have happened: a closed
/// range `[lower, upper]`, optionally with a poll deadline for verifying
/// asynchronous production code.
///
/// Built with the free functions in this crate ([`times`], [`never`],
/// [`at_least_once`], [`at_least`], [`at_most`], [`between`], [`any_times`],
/// [`timeout`]); immutable once handed to `verify_count`.
///
/// ```
/// use mocklet::between;
///
/// let count = between(2, 4);
/// assert!(count.matches(3));
/// assert!(!count.matches(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallCount {
    lower: u64,
    upper: u64,
    timeout: Duration,
}

const UNBOUNDED: u64 = u64::MAX;

impl CallCount {
    fn new(lower: u64, upper: u64) -> Self {
        CallCount { lower, upper, timeout: Duration::ZERO }
    }

    /// Does an observed total satisfy this specification?
    pub fn matches(&self, total: u64) -> bool {
        total >= self.lower && total <= self.upper
    }

    /// How long verification may keep polling before giving up.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Requires exactly `n` calls, keeping any deadline.
    pub fn times(mut self, n: u64) -> Self {
        self.lower = n;
        self.upper = n;
        self
    }

    /// Requires at least `n` calls, keeping any deadline.
    pub fn at_least(mut self, n: u64) -> Self {
        self.lower = n;
        self.upper = UNBOUNDED;
        self
    }

    /// Requires at least one call, keeping any deadline.
    pub fn at_least_once(self) -> Self {
        self.at_least(1)
    }

    /// Requires between `lower` and `upper` calls, keeping any deadline.
    pub fn between(mut self, lower: u64, upper: u64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }
}

impl fmt::Display for CallCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "exactly {}{}", self.lower, plural(" call", self.lower))
        } else if self.upper == UNBOUNDED {
            if self.lower == 0 {
                write!(f, "any number of calls")
            } else {
                write!(
                    f,
                    "at least {}{}",
                    self.lower,
                    plural(" call", self.lower)
                )
            }
        } else {
            write!(
                f,
                "between {}{} and {}{}",
                self.lower,
                plural(" call", self.lower),
                self.upper,
                plural(" call", self.upper)
            )
        }
    }
}

fn plural(prefix: &str, count: u64) -> String {
    if count == 1 {
        prefix.to_string()
    } else {
        format!("{prefix}s")
    }
}

/// Matches exactly `n` calls.
pub fn times(n: u64) -> CallCount {
    CallCount::new(n, n)
}

/// Matches only if the method was never called.
pub fn never() -> CallCount {
    CallCount::new(0, 0)
}

/// Matches one or more calls.
pub fn at_least_once() -> CallCount {
    CallCount::new(1, UNBOUNDED)
}

/// Matches `n` or more calls.
pub fn at_least(n: u64) -> CallCount {
    CallCount::new(n, UNBOUNDED)
}

/// Matches up to `n` calls, including none at all.
pub fn at_most(n: u64) -> CallCount {
    CallCount::new(0, n)
}

/// Matches any total within `[lower, upper]`.
pub fn between(lower: u64, upper: u64) -> CallCount {
    CallCount::new(lower, upper)
}

/// Matches any number of calls, including none at all.
pub fn any_times() -> CallCount {
    CallCount::new(0, UNBOUNDED)
}

/// Matches exactly one call, polling for up to `millis` milliseconds before
/// failing.  Combine with the builder methods for other totals:
/// `timeout(50).at_least(2)`.
pub fn timeout(millis: u64) -> CallCount {
    CallCount { lower: 1, upper: 1, timeout: Duration::from_millis(millis) }
}
