// vim: tw=80
//! Error taxonomy.
//!
//! Every violation is immediately fatal to the current test, so all of these
//! surface as panics at the public boundary.  They are still defined as typed
//! errors so the failure kinds stay distinguishable and the messages live in
//! one place.

use std::thread::ThreadId;

use thiserror::Error;

use crate::value::ArgValue;

/// A programming error in how the mocking API itself was used.
#[derive(Debug, Error)]
pub enum UsageError {
    /// A verification was begun but its query call never happened.
    #[error("unfinished verify() statements")]
    UnfinishedVerify,

    /// A stubbing was begun but its pattern call never happened.
    #[error("unfinished stubbing statements")]
    UnfinishedStub,

    /// Matchers were registered but never consumed by a verify/stub call.
    #[error("you have outstanding matchers, this must be a programming error")]
    OutstandingMatchers,

    /// The matcher stack held neither zero entries nor one per argument.
    #[error(
        "you can't mix matchers and literal values: \
         {supplied} matcher(s) supplied for a {arity}-argument call"
    )]
    MixedMatchers { supplied: usize, arity: usize },

    /// Equality, hashing and display of the mock itself are not mockable.
    #[error("cannot {operation} a call to {method}")]
    IdentityMethod { operation: &'static str, method: String },

    /// Stubbing and verifying must stay on the thread that first did either.
    #[error(
        "must always stub and verify from one thread only; \
         this mock is owned by {owner:?} but was driven from {caller:?}"
    )]
    CrossThread { owner: ThreadId, caller: ThreadId },

    /// The stubbed action's result type cannot satisfy the method signature.
    #[error("can't return {action} from stub for {method} returning {declared}")]
    ReturnTypeMismatch {
        action: &'static str,
        declared: &'static str,
        method: String,
    },
}

/// A failed interaction assertion, carrying the full formatted report of
/// expected vs. observed calls.
#[derive(Debug, Error)]
#[error("{report}")]
pub struct VerificationFailure {
    pub report: String,
}

/// The payload used to propagate a stubbed error out of a method that has no
/// error channel of its own.  The boxed value is exactly the value handed to
/// [`fail_with`](crate::fail_with), untranslated.
#[derive(Debug, Error)]
#[error("stubbed error raised: {0:?}")]
pub struct StubbedError(pub Box<dyn ArgValue>);

pub(crate) fn fail_usage(err: UsageError) -> ! {
    panic!("{err}")
}

pub(crate) fn fail_verification(report: String) -> ! {
    panic!("{}", VerificationFailure { report })
}
