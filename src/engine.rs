// vim: tw=80
//! The dispatch engine: every forwarded mock call enters here.
//!
//! [`Mock::intercept`] branches on the facade's view.  Production calls are
//! recorded and answered from the stub table; a verifying facade's next call
//! is a query against the ledger; a stubbing facade's next call registers a
//! stub pattern.  The outcome travels back to the generated adapter as a
//! [`CallOutcome`], which renders it into the method's concrete return type.

use std::panic::panic_any;
use std::thread;
use std::time::{Duration, Instant};

use crate::call::{CallRecord, CallSite, MethodDesc};
use crate::count::CallCount;
use crate::error::{fail_usage, fail_verification, StubbedError, UsageError};
use crate::matcher::{format_matchers, matchers_accept, set_captures,
    ArgMatcher};
use crate::state::{Mock, MockState, Pattern, StubEntry, View};
use crate::stub::Action;
use crate::value::{args_equal, format_args, ArgValue};

/// What the engine decided a call produces.
pub enum CallOutcome {
    /// A stubbed value (cloned constant or computation result).
    Value(Box<dyn ArgValue>),
    /// A stubbed error, to be delivered through the method's error channel
    /// if it has one.
    Raised(Box<dyn ArgValue>),
    /// No stub matched (or the call was a verify/stub interception); the
    /// adapter renders the type-appropriate zero value.
    Zero,
}

impl CallOutcome {
    /// Renders the outcome as a plain return value.
    ///
    /// # Panics
    ///
    /// Panics with a [`StubbedError`] payload if the outcome is a raised
    /// error (there is no error channel to deliver it through), and with a
    /// type mismatch diagnostic if a computed stub produced a value of the
    /// wrong type.
    pub fn into_value<O>(self, method: &'static str) -> O
    where
        O: ArgValue + Clone + Default,
    {
        match self {
            CallOutcome::Value(value) => match value.downcast_ref::<O>() {
                Ok(v) => v.clone(),
                Err(_) => wrong_type::<O>(method, value.as_ref()),
            },
            CallOutcome::Raised(error) => panic_any(StubbedError(error)),
            CallOutcome::Zero => O::default(),
        }
    }

    /// Renders the outcome for a method returning `Result<T, E>`: raised
    /// errors that are an `E` become `Err`, and the zero value is
    /// `Ok(T::default())`.
    pub fn into_result<T, E>(self, method: &'static str) -> Result<T, E>
    where
        T: Default + 'static,
        E: ArgValue + Clone,
        Result<T, E>: ArgValue + Clone,
    {
        match self {
            CallOutcome::Value(value) => {
                match value.downcast_ref::<Result<T, E>>() {
                    Ok(v) => v.clone(),
                    Err(_) => {
                        wrong_type::<Result<T, E>>(method, value.as_ref())
                    }
                }
            }
            CallOutcome::Raised(error) => {
                match error.downcast_ref::<E>() {
                    Ok(e) => Err(e.clone()),
                    // Not this method's error type; fall back to the
                    // payload panic so the exact value still propagates.
                    Err(_) => panic_any(StubbedError(error)),
                }
            }
            CallOutcome::Zero => Ok(T::default()),
        }
    }
}

fn wrong_type<O>(method: &str, value: &dyn ArgValue) -> ! {
    panic!(
        "stub for `{method}` produced {value:?}, which is not a `{}`",
        std::any::type_name::<O>()
    );
}

impl Mock {
    /// Entry point for every call forwarded by a generated adapter.
    #[track_caller]
    pub fn intercept(
        &self,
        method: MethodDesc,
        args: Vec<Box<dyn ArgValue>>,
    ) -> CallOutcome {
        let site = CallSite::here();
        match self.view {
            View::Production => {
                self.state.dispatch_production(method, args, site)
            }
            View::Verifying => self.state.dispatch_verify(method, args, site),
            View::Stubbing => self.state.dispatch_stub(method, args, site),
        }
    }

    /// Fails unless this mock's ledger is completely empty.
    pub(crate) fn check_zero_interactions(&self) {
        self.session().check_no_matchers();
        let calls = self.state.calls.lock().unwrap().clone();
        if !calls.is_empty() {
            let mut report = format!(
                "\nMock {} expected zero interactions, had:",
                self.state.field_name()
            );
            for call in &calls {
                report.push_str(&call.describe());
            }
            report.push('\n');
            fail_verification(report);
        }
    }

    /// Fails unless every ledger entry has been verified.
    pub(crate) fn check_no_more_interactions(&self, site: CallSite) {
        self.session().check_no_matchers();
        let calls = self.state.calls.lock().unwrap().clone();
        let unverified: Vec<_> =
            calls.iter().filter(|c| !c.is_verified()).collect();
        if !unverified.is_empty() {
            let mut report =
                String::from("\nWe found these unverified calls:");
            for call in &unverified {
                report.push_str(&call.describe());
            }
            report.push_str(&format!(
                "\n\nAfter final interaction was verified:\n  at {site}\n"
            ));
            fail_verification(report);
        }
    }
}

impl MockState {
    /// Default-mode dispatch: record the call, then answer it from the
    /// first matching stub, most recent first.
    fn dispatch_production(
        &self,
        method: MethodDesc,
        args: Vec<Box<dyn ArgValue>>,
        site: CallSite,
    ) -> CallOutcome {
        let record =
            std::sync::Arc::new(CallRecord::new(method.id, args, site));
        self.calls.lock().unwrap().push(record.clone());
        let stubs = self.stubs.lock().unwrap().clone();
        for stub in &stubs {
            if stub.method == record.method
                && stub.pattern.matches(&record.args)
            {
                stub.pattern.capture(&record.args);
                return stub.action.run();
            }
        }
        CallOutcome::Zero
    }

    /// Verifying-mode dispatch: the call is a query, not production
    /// behaviour.  Counts matching ledger entries, polling until the
    /// deadline if the call count carries one, and disarms the mode no
    /// matter the outcome.
    fn dispatch_verify(
        &self,
        method: MethodDesc,
        args: Vec<Box<dyn ArgValue>>,
        site: CallSite,
    ) -> CallOutcome {
        self.check_thread();
        let count = self
            .pending_count
            .lock()
            .unwrap()
            .take()
            .expect("verifying facade armed without a call count");
        self.session.remove_outstanding_verify(&count);
        let matchers = self.session.drain_matchers(args.len());
        self.check_identity_method(method.id, "verify");

        let query = CallRecord::new(method.id, args, site);
        let mut total = self.count_matching(&query, &matchers);
        let timeout = count.timeout();
        if timeout > Duration::ZERO {
            let deadline = Instant::now() + timeout;
            while !count.matches(total) {
                thread::sleep(Duration::from_millis(1));
                if Instant::now() > deadline {
                    fail_verification(self.format_failed_verify(
                        &query, &matchers, total, &count,
                    ));
                }
                total = self.count_matching(&query, &matchers);
            }
        } else if !count.matches(total) {
            fail_verification(
                self.format_failed_verify(&query, &matchers, total, &count),
            );
        }
        CallOutcome::Zero
    }

    /// Stubbing-mode dispatch: the call is the pattern to stub.  Registers
    /// a new entry at the head of the table and disarms the mode.
    fn dispatch_stub(
        &self,
        method: MethodDesc,
        args: Vec<Box<dyn ArgValue>>,
        site: CallSite,
    ) -> CallOutcome {
        self.check_thread();
        let action = self
            .pending_action
            .lock()
            .unwrap()
            .take()
            .expect("stubbing facade armed without an action");
        self.session.finish_outstanding_stub();
        let matchers = self.session.drain_matchers(args.len());
        self.check_identity_method(method.id, "stub");
        self.check_action_type(&method, &action);

        let pattern = if matchers.is_empty() {
            Pattern::Literal(args)
        } else {
            Pattern::Matchers(matchers)
        };
        self.stubs.lock().unwrap().insert(
            0,
            std::sync::Arc::new(StubEntry {
                method: method.id,
                pattern,
                action,
            }),
        );
        CallOutcome::Zero
    }

    /// Counts ledger entries matching a verification query and flips their
    /// verified flags.  Matching is cumulative and idempotent: entries
    /// counted by an earlier verify are counted (and re-captured) again.
    fn count_matching(
        &self,
        query: &CallRecord,
        matchers: &[ArgMatcher],
    ) -> u64 {
        let calls = self.calls.lock().unwrap().clone();
        let mut total = 0;
        for call in &calls {
            if call.method != query.method {
                continue;
            }
            if (!matchers.is_empty() && matchers_accept(matchers, &call.args))
                || args_equal(&call.args, &query.args)
            {
                set_captures(matchers, &call.args);
                total += 1;
                call.mark_verified();
            }
        }
        total
    }

    /// Stub-time type compatibility: a known action result type must equal
    /// the method's declared return type.  Unknown result types (computed
    /// and raising actions) defer the check to delivery.
    fn check_action_type(&self, method: &MethodDesc, action: &Action) {
        if let Some(result_type) = action.result_type() {
            if result_type.id != method.ret.id {
                fail_usage(UsageError::ReturnTypeMismatch {
                    action: result_type.name,
                    declared: method.ret.name,
                    method: method.id.to_string(),
                });
            }
        }
    }

    fn format_failed_verify(
        &self,
        query: &CallRecord,
        matchers: &[ArgMatcher],
        total: u64,
        count: &CallCount,
    ) -> String {
        let args = if matchers.is_empty() {
            format_args(&query.args)
        } else {
            format_matchers(matchers)
        };
        let mut report = format!("\nExpected {count}");
        let timeout = count.timeout();
        if timeout > Duration::ZERO {
            report.push_str(&format!(" within {}ms", timeout.as_millis()));
        }
        report.push_str(&format!(
            " to:\n  {}{}\n  at {}\nbut observed {}.\n\n",
            query.method, args, query.site, total
        ));
        let calls = self.calls.lock().unwrap().clone();
        if calls.is_empty() {
            report.push_str("No method calls happened on this mock");
        } else {
            report.push_str("Method calls that did happen:");
            for call in &calls {
                report.push_str(&call.describe());
            }
        }
        report.push('\n');
        report
    }
}
