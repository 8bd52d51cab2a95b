// vim: tw=80
//! The test session: explicit owner of the matcher stack and the
//! unfinished-statement bookkeeping.
//!
//! One `Session` is created at the start of a test and handed to every mock
//! constructor.  Only one fluent verify/stub statement may be in flight per
//! session at a time.  [`Session::teardown`] is the end-of-test hook; a
//! drop-time backstop catches forgotten teardowns in tests that pass
//! otherwise.

use std::sync::{Arc, Mutex};
use std::thread;

use crate::count::CallCount;
use crate::error::{fail_usage, UsageError};
use crate::matcher::ArgMatcher;

/// Shared handle to one test session.  Cheap to clone; every mock created
/// with it keeps a clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    /// Matchers registered since the last verify/stub interception.  Holds
    /// either zero entries or exactly one per argument of the next call.
    matchers: Mutex<Vec<ArgMatcher>>,
    /// Verifications begun but not yet consumed by a query call.
    unfinished_verifies: Mutex<Vec<CallCount>>,
    /// Stubbings begun but not yet consumed by a pattern call.
    unfinished_stubs: Mutex<usize>,
}

impl Session {
    pub fn new() -> Self {
        Session { inner: Arc::new(SessionInner::default()) }
    }

    /// End-of-test hook: fails if any stub/verify fluent statement or
    /// matcher was left unfinished, clearing the leftover state so a
    /// following test starts clean.
    pub fn teardown(&self) {
        self.check_no_matchers();
        {
            let mut verifies = self.inner.unfinished_verifies.lock().unwrap();
            if !verifies.is_empty() {
                verifies.clear();
                drop(verifies);
                fail_usage(UsageError::UnfinishedVerify);
            }
        }
        let mut stubs = self.inner.unfinished_stubs.lock().unwrap();
        if *stubs > 0 {
            *stubs = 0;
            drop(stubs);
            fail_usage(UsageError::UnfinishedStub);
        }
    }

    pub(crate) fn push_matcher(&self, matcher: ArgMatcher) {
        self.inner.matchers.lock().unwrap().push(matcher);
    }

    /// Takes the whole matcher stack for a call of the given arity.  The
    /// drained stack must hold either no matchers (a literal-argument call)
    /// or one matcher per argument.
    pub(crate) fn drain_matchers(&self, arity: usize) -> Vec<ArgMatcher> {
        let matchers: Vec<ArgMatcher> = {
            let mut stack = self.inner.matchers.lock().unwrap();
            stack.drain(..).collect()
        };
        if !matchers.is_empty() && matchers.len() != arity {
            fail_usage(UsageError::MixedMatchers {
                supplied: matchers.len(),
                arity,
            });
        }
        matchers
    }

    /// Fails if matchers are registered while no verify/stub call is
    /// pending.  Clears them so the error doesn't cascade.
    pub(crate) fn check_no_matchers(&self) {
        let mut stack = self.inner.matchers.lock().unwrap();
        if !stack.is_empty() {
            stack.clear();
            drop(stack);
            fail_usage(UsageError::OutstandingMatchers);
        }
    }

    pub(crate) fn add_outstanding_verify(&self, count: CallCount) {
        self.inner.unfinished_verifies.lock().unwrap().push(count);
    }

    pub(crate) fn remove_outstanding_verify(&self, count: &CallCount) {
        let mut verifies = self.inner.unfinished_verifies.lock().unwrap();
        if let Some(pos) = verifies.iter().position(|c| c == count) {
            verifies.remove(pos);
        }
    }

    pub(crate) fn add_outstanding_stub(&self) {
        *self.inner.unfinished_stubs.lock().unwrap() += 1;
    }

    pub(crate) fn finish_outstanding_stub(&self) {
        let mut stubs = self.inner.unfinished_stubs.lock().unwrap();
        *stubs = stubs.saturating_sub(1);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }
        let leftover_matchers =
            self.matchers.get_mut().map(|m| !m.is_empty()).unwrap_or(false);
        let leftover_verifies = self
            .unfinished_verifies
            .get_mut()
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        let leftover_stubs =
            self.unfinished_stubs.get_mut().map(|s| *s > 0).unwrap_or(false);
        if leftover_matchers || leftover_verifies || leftover_stubs {
            panic!(
                "session dropped with unfinished verify/stub statements or \
                 outstanding matchers; call Session::teardown() at the end \
                 of the test"
            );
        }
    }
}
