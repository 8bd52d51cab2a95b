// vim: tw=80
//! Stub behaviours: the actions bound to stubbed calls and the fluent
//! builder that installs them.

use std::fmt;
use std::sync::Mutex;

use fragile::Fragile;

use crate::adapter::Mocked;
use crate::call::StaticType;
use crate::engine::CallOutcome;
use crate::value::ArgValue;

/// The behaviour bound to a stub entry.
pub(crate) struct Action {
    kind: ActionKind,
    /// The action's statically known result type, if any; `None` defers the
    /// compatibility check to the moment the result is delivered.
    result_type: Option<StaticType>,
}

enum ActionKind {
    /// Return a clone of a constant.
    Return(Box<dyn ArgValue>),
    /// Run a computation.  Guarded by a Mutex so a shared stub entry can
    /// drive an `FnMut` closure.
    Compute(Mutex<Box<dyn FnMut() -> Box<dyn ArgValue> + Send>>),
    /// Raise an error value, propagated exactly as supplied.
    Raise(Box<dyn ArgValue>),
}

impl Action {
    pub(crate) fn run(&self) -> CallOutcome {
        match &self.kind {
            ActionKind::Return(value) => {
                CallOutcome::Value(value.clone_value())
            }
            ActionKind::Compute(f) => {
                CallOutcome::Value((f.lock().unwrap())())
            }
            ActionKind::Raise(error) => {
                CallOutcome::Raised(error.clone_value())
            }
        }
    }

    pub(crate) fn result_type(&self) -> Option<StaticType> {
        self.result_type
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ActionKind::Return(value) => write!(f, "Return({value:?})"),
            ActionKind::Compute(_) => write!(f, "Compute(..)"),
            ActionKind::Raise(error) => write!(f, "Raise({error:?})"),
        }
    }
}

/// A behaviour waiting to be bound to a call pattern.
///
/// Produced by [`return_const`], [`returning`], [`returning_st`],
/// [`fail_with`] or [`do_nothing`]; bound with [`when`](Stub::when):
///
/// ```text
/// return_const(5).when(&mock).compute(s.any());
/// ```
#[must_use = "a Stub does nothing until bound with .when(&mock)"]
pub struct Stub {
    action: Action,
}

impl Stub {
    /// Arms `mock` for stubbing and returns the stubbing facade; the next
    /// call made through that facade is the pattern to stub, not a
    /// production call.
    pub fn when<M: Mocked>(self, mock: &M) -> M {
        mock.mock().begin_stub(self.action);
        M::from_mock(mock.mock().stubbing_view())
    }
}

/// A stub that returns a clone of `value` on every matching call.
pub fn return_const<T: ArgValue>(value: T) -> Stub {
    Stub {
        action: Action {
            kind: ActionKind::Return(Box::new(value)),
            result_type: Some(StaticType::of::<T>()),
        },
    }
}

/// A stub for void methods that does nothing at all.
pub fn do_nothing() -> Stub {
    return_const(())
}

/// A stub that runs `f` on every matching call and returns its result.
///
/// The result type is treated as unknown at stub time, so compatibility with
/// the method's return type only surfaces when a call actually executes the
/// closure and delivers its result.
pub fn returning<F, T>(f: F) -> Stub
where
    F: FnMut() -> T + Send + 'static,
    T: ArgValue,
{
    let mut f = f;
    Stub {
        action: Action {
            kind: ActionKind::Compute(Mutex::new(Box::new(move || {
                Box::new(f()) as Box<dyn ArgValue>
            }))),
            result_type: None,
        },
    }
}

/// Single-threaded version of [`returning`], for closures that aren't
/// `Send`.  It is a runtime error for the stubbed method to be invoked from
/// a thread other than the one that created the stub.
pub fn returning_st<F, T>(f: F) -> Stub
where
    F: FnMut() -> T + 'static,
    T: ArgValue,
{
    let mut fragile = Fragile::new(f);
    returning(move || (fragile.get_mut())())
}

/// A stub that raises `error` on every matching call.
///
/// For methods returning `Result<_, E>` the value is delivered as `Err`; for
/// any other method it propagates as a
/// [`StubbedError`](crate::StubbedError) panic payload.  Either way the
/// value reaching the caller is exactly the one supplied here.
pub fn fail_with<E: ArgValue>(error: E) -> Stub {
    Stub {
        action: Action {
            kind: ActionKind::Raise(Box::new(error)),
            result_type: None,
        },
    }
}
