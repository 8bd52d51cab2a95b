// vim: tw=80
//! Per-mock state and the facade handle.
//!
//! One [`MockState`] exists per mock, shared by every facade of that mock.
//! A [`Mock`] is a lightweight handle: shared state plus the view tag that
//! selects the dispatch branch (production, verifying or stubbing).  The
//! verifying and stubbing facades of spec fame are just handles with a
//! different tag, not separate proxy objects.

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use crate::call::{field_label, CallRecord, MethodId};
use crate::count::CallCount;
use crate::error::{fail_usage, UsageError};
use crate::matcher::{matchers_accept, set_captures, ArgMatcher};
use crate::session::Session;
use crate::stub::Action;
use crate::value::{args_equal, ArgValue};

/// Which dispatch branch a facade drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum View {
    Production,
    Verifying,
    Stubbing,
}

/// A stubbed call pattern and its behaviour.
pub(crate) struct StubEntry {
    pub(crate) method: MethodId,
    pub(crate) pattern: Pattern,
    pub(crate) action: Action,
}

/// What a stub or query call supplied for its arguments: literal values, or
/// one matcher per argument.
pub(crate) enum Pattern {
    Literal(Vec<Box<dyn ArgValue>>),
    Matchers(Vec<ArgMatcher>),
}

impl Pattern {
    pub(crate) fn matches(&self, args: &[Box<dyn ArgValue>]) -> bool {
        match self {
            Pattern::Literal(expected) => args_equal(expected, args),
            Pattern::Matchers(matchers) => matchers_accept(matchers, args),
        }
    }

    /// Feeds `args` to any captors in the pattern.
    pub(crate) fn capture(&self, args: &[Box<dyn ArgValue>]) {
        if let Pattern::Matchers(matchers) = self {
            set_captures(matchers, args);
        }
    }
}

pub(crate) struct MockState {
    pub(crate) type_name: &'static str,
    pub(crate) session: Session,
    /// The call ledger.  Appended by production threads, snapshot-iterated
    /// by verification; records are shared so the verified flag can flip
    /// while appends continue.
    pub(crate) calls: Mutex<Vec<Arc<CallRecord>>>,
    /// Stub table, most-recent-first; the first matching entry wins and
    /// shadows anything behind it.
    pub(crate) stubs: Mutex<Vec<Arc<StubEntry>>>,
    /// Armed call count while a verify statement is in flight.
    pub(crate) pending_count: Mutex<Option<CallCount>>,
    /// Armed action while a stubbing statement is in flight.
    pub(crate) pending_action: Mutex<Option<Action>>,
    /// The one thread allowed to stub and verify this mock, latched on
    /// first use.  Production calls are exempt.
    owner: Mutex<Option<ThreadId>>,
}

impl MockState {
    /// Latches the current thread as owner, or fails if another thread
    /// already holds the latch.
    pub(crate) fn check_thread(&self) {
        let caller = thread::current().id();
        let mut owner = self.owner.lock().unwrap();
        match *owner {
            None => *owner = Some(caller),
            Some(o) if o == caller => {}
            Some(o) => {
                drop(owner);
                fail_usage(UsageError::CrossThread { owner: o, caller });
            }
        }
    }

    pub(crate) fn check_identity_method(
        &self,
        method: MethodId,
        operation: &'static str,
    ) {
        if matches!(method.name, "eq" | "hash" | "to_string") {
            fail_usage(UsageError::IdentityMethod {
                operation,
                method: method.to_string(),
            });
        }
    }

    pub(crate) fn field_name(&self) -> String {
        field_label(self.type_name)
    }

    fn reset(&self) {
        self.calls.lock().unwrap().clear();
        self.stubs.lock().unwrap().clear();
        if let Some(count) = self.pending_count.lock().unwrap().take() {
            self.session.remove_outstanding_verify(&count);
        }
        if self.pending_action.lock().unwrap().take().is_some() {
            self.session.finish_outstanding_stub();
        }
    }
}

/// Handle to one mock: shared state plus the view this facade drives.
///
/// Generated adapters own one of these and forward every trait method to
/// [`intercept`](Mock::intercept).
#[derive(Clone)]
pub struct Mock {
    pub(crate) state: Arc<MockState>,
    pub(crate) view: View,
}

impl Mock {
    /// Creates the state for a new mock of the named type, registered with
    /// `session`, and returns its production handle.
    pub fn new(session: &Session, type_name: &'static str) -> Mock {
        Mock {
            state: Arc::new(MockState {
                type_name,
                session: session.clone(),
                calls: Mutex::new(Vec::new()),
                stubs: Mutex::new(Vec::new()),
                pending_count: Mutex::new(None),
                pending_action: Mutex::new(None),
                owner: Mutex::new(None),
            }),
            view: View::Production,
        }
    }

    /// A production handle to the same mock.  Facade `Clone` impls use this
    /// so cloning a verifying or stubbing facade can't leak its mode.
    pub fn share(&self) -> Mock {
        Mock { state: self.state.clone(), view: View::Production }
    }

    pub(crate) fn verifying_view(&self) -> Mock {
        Mock { state: self.state.clone(), view: View::Verifying }
    }

    pub(crate) fn stubbing_view(&self) -> Mock {
        Mock { state: self.state.clone(), view: View::Stubbing }
    }

    /// Arms this mock for one verification query.
    pub(crate) fn begin_verify(&self, count: CallCount) {
        let state = &self.state;
        state.check_thread();
        if state.pending_count.lock().unwrap().is_some() {
            fail_usage(UsageError::UnfinishedVerify);
        }
        if state.pending_action.lock().unwrap().is_some() {
            fail_usage(UsageError::UnfinishedStub);
        }
        state.session.check_no_matchers();
        state.session.add_outstanding_verify(count.clone());
        *state.pending_count.lock().unwrap() = Some(count);
    }

    /// Arms this mock for one stub registration.
    pub(crate) fn begin_stub(&self, action: Action) {
        let state = &self.state;
        state.check_thread();
        if state.pending_count.lock().unwrap().is_some() {
            fail_usage(UsageError::UnfinishedVerify);
        }
        if state.pending_action.lock().unwrap().is_some() {
            fail_usage(UsageError::UnfinishedStub);
        }
        state.session.add_outstanding_stub();
        *state.pending_action.lock().unwrap() = Some(action);
    }

    /// Guards the identity operations (`eq`, `hash`, `to_string`) of a
    /// facade: they are answered structurally in production view and are a
    /// usage error on a verifying or stubbing facade.
    pub fn identity_guard(&self, method_name: &'static str) {
        let operation = match self.view {
            View::Production => return,
            View::Verifying => "verify",
            View::Stubbing => "stub",
        };
        // Disarm first so the failure doesn't cascade into
        // unfinished-statement errors at teardown.
        if let Some(count) = self.state.pending_count.lock().unwrap().take() {
            self.state.session.remove_outstanding_verify(&count);
        }
        if self.state.pending_action.lock().unwrap().take().is_some() {
            self.state.session.finish_outstanding_stub();
        }
        fail_usage(UsageError::IdentityMethod {
            operation,
            method: format!("{}.{}", self.state.field_name(), method_name),
        });
    }

    /// Do two handles share one mock?
    pub fn same_state(&self, other: &Mock) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Identity hash of the underlying mock state.
    pub fn state_id(&self) -> usize {
        Arc::as_ptr(&self.state) as usize
    }

    /// Clears recorded calls and stubs, keeping the mock's identity.
    pub(crate) fn reset(&self) {
        self.state.reset();
    }

    pub(crate) fn session(&self) -> &Session {
        &self.state.session
    }
}
