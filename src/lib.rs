// vim: tw=80
//! A small mock object library for Rust.
//!
//! Mocklet builds substitute implementations of traits whose calls are
//! intercepted instead of running real logic.  There is no record/replay
//! mode: stub what you care about, exercise the code under test, then verify
//! the interactions you want to assert — in that order, and only the ones
//! you actually care about.
//!
//! # Usage
//!
//! Create a [`Session`] at the start of the test, generate a mock with
//! [`mock!`], stub with [`return_const`]/[`returning`]/[`fail_with`] bound
//! via [`Stub::when`], and verify with [`verify`]/[`verify_count`]:
//!
//! ```
//! use mocklet::{mock, return_const, times, verify, verify_count, never,
//!     Session};
//!
//! trait Greeter {
//!     fn greet(&self, name: String) -> String;
//!     fn shutdown(&self);
//! }
//!
//! mock! {
//!     pub MockGreeter for Greeter {
//!         fn greet(&self, name: String) -> String;
//!         fn shutdown(&self);
//!     }
//! }
//!
//! let s = Session::new();
//! let greeter = MockGreeter::new(&s);
//!
//! // Stub: any argument returns "hello".
//! return_const("hello".to_string()).when(&greeter).greet(s.any());
//!
//! // Exercise.
//! assert_eq!("hello", greeter.greet("world".to_string()));
//!
//! // Verify afterwards, in the natural place.
//! verify(&greeter).greet(s.eq("world".to_string()));
//! verify_count(&greeter, never()).shutdown();
//! verify_count(&greeter, times(1)).greet(s.any());
//!
//! s.teardown();
//! ```
//!
//! Unstubbed calls return the type-appropriate zero value
//! (`Default::default()`, or `Ok(Default::default())` for `Result`
//! methods) and are still recorded for later verification.
//!
//! # Matching arguments
//!
//! Matcher helpers live on the [`Session`]: [`any`](Session::any),
//! [`eq`](Session::eq), [`is_a`](Session::is_a), and
//! [`matching`](Session::matching), which accepts any [`Predicate`].  A
//! [`Captor`] additionally records every argument value it sees.  A single
//! call must use either literal values or one matcher per argument, never a
//! mixture.
//!
//! # Call counts and timeouts
//!
//! [`verify_count`] takes a [`CallCount`]: [`times`], [`never`],
//! [`at_least_once`], [`at_least`], [`at_most`], [`between`], [`any_times`],
//! or [`timeout`], which keeps re-counting until satisfied or the deadline
//! passes — handy when production code calls the mock from another thread.
//!
//! # Threading
//!
//! Stub and verify a given mock from one thread only (the first one to do
//! so is latched as its owner).  Production code under test may call the
//! mock from any number of threads concurrently.
//!
//! # Failures
//!
//! Every misuse or failed assertion is immediately fatal to the test: a
//! panic carrying one descriptive message.  See [`UsageError`],
//! [`VerificationFailure`] and [`StubbedError`] for the taxonomy.

mod adapter;
mod call;
mod count;
mod engine;
mod error;
mod matcher;
mod session;
mod state;
mod stub;
mod value;

pub use predicates::prelude::{predicate, Predicate};

pub use adapter::Mocked;
pub use call::{CallRecord, CallSite, MethodDesc, MethodId, StaticType};
pub use count::{
    any_times, at_least, at_least_once, at_most, between, never, timeout,
    times, CallCount,
};
pub use engine::CallOutcome;
pub use error::{StubbedError, UsageError, VerificationFailure};
pub use matcher::{ArgMatcher, Captor};
pub use session::Session;
pub use state::Mock;
pub use stub::{
    do_nothing, fail_with, return_const, returning, returning_st, Stub,
};
pub use value::ArgValue;

/// Begins verification of exactly one matching call: the next method call
/// on the returned facade is the query, not production behaviour.
pub fn verify<M: Mocked>(mock: &M) -> M {
    verify_count(mock, times(1))
}

/// Begins verification with an explicit [`CallCount`].
pub fn verify_count<M: Mocked>(mock: &M, count: CallCount) -> M {
    mock.mock().begin_verify(count);
    M::from_mock(mock.mock().verifying_view())
}

/// Clears the call ledger and stub table of each mock, keeping identity.
pub fn reset(mocks: &[&dyn Mocked]) {
    for mock in mocks {
        mock.mock().reset();
    }
}

/// Asserts that no method calls at all happened on these mocks.
pub fn verify_zero_interactions(mocks: &[&dyn Mocked]) {
    for mock in mocks {
        mock.mock().check_zero_interactions();
    }
}

/// Asserts that every recorded call on these mocks has been verified.
#[track_caller]
pub fn verify_no_more_interactions(mocks: &[&dyn Mocked]) {
    let site = CallSite::here();
    for mock in mocks {
        mock.mock().check_no_more_interactions(site);
    }
}
