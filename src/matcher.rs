// vim: tw=80
//! Argument matchers and the helpers that register them.
//!
//! Matcher helpers live on [`Session`] because registering a matcher is a
//! side effect on the session's matcher stack: the helper pushes one
//! [`ArgMatcher`] and returns a placeholder of the argument's static type so
//! the surrounding call still type-checks.  The next verify/stub call on any
//! of the session's mocks drains the stack.

use std::fmt;
use std::sync::{Arc, Mutex};

use predicates::prelude::{predicate, Predicate};

use crate::session::Session;
use crate::value::ArgValue;

/// A predicate over one erased argument position.
pub struct ArgMatcher {
    desc: String,
    kind: MatcherKind,
}

enum MatcherKind {
    Pred(Box<dyn Fn(&dyn ArgValue) -> bool + Send + Sync>),
    Captor(Arc<dyn CaptureSink>),
}

impl ArgMatcher {
    fn pred<F>(desc: String, f: F) -> Self
    where
        F: Fn(&dyn ArgValue) -> bool + Send + Sync + 'static,
    {
        ArgMatcher { desc, kind: MatcherKind::Pred(Box::new(f)) }
    }

    pub(crate) fn matches(&self, value: &dyn ArgValue) -> bool {
        match &self.kind {
            MatcherKind::Pred(f) => f(value),
            // A captor matches any argument, so that
            // verify(&mock).method(captor.capture(&s)) matches all calls to
            // the method and captures every one of their argument values.
            MatcherKind::Captor(_) => true,
        }
    }

    /// Feeds `value` to the captor, if this matcher is one.
    pub(crate) fn capture(&self, value: &dyn ArgValue) {
        if let MatcherKind::Captor(sink) = &self.kind {
            sink.accept(value);
        }
    }
}

impl fmt::Display for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.desc)
    }
}

impl fmt::Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgMatcher({})", self.desc)
    }
}

pub(crate) fn matchers_accept(
    matchers: &[ArgMatcher],
    args: &[Box<dyn ArgValue>],
) -> bool {
    matchers.len() == args.len()
        && matchers.iter().zip(args).all(|(m, a)| m.matches(a.as_ref()))
}

pub(crate) fn set_captures(
    matchers: &[ArgMatcher],
    args: &[Box<dyn ArgValue>],
) {
    for (m, a) in matchers.iter().zip(args) {
        m.capture(a.as_ref());
    }
}

pub(crate) fn format_matchers(matchers: &[ArgMatcher]) -> String {
    let rendered: Vec<String> =
        matchers.iter().map(|m| m.to_string()).collect();
    format!("({})", rendered.join(", "))
}

impl Session {
    /// Matches any argument value.  Don't mix with literal arguments in the
    /// same call.
    pub fn any<T>(&self) -> T
    where
        T: ArgValue + Default,
    {
        self.push_matcher(ArgMatcher::pred("any()".to_string(), |_| true));
        T::default()
    }

    /// Matches arguments equal to `expected` (value equality, evaluated with
    /// the same predicate stack as [`matching`](Session::matching)).
    pub fn eq<T>(&self, expected: T) -> T
    where
        T: PartialEq + Clone + Send + Sync + fmt::Debug + 'static,
    {
        let desc = format!("eq({expected:?})");
        let pred = predicate::eq(expected.clone());
        self.push_matcher(ArgMatcher::pred(desc, move |value| {
            value.downcast_ref::<T>().map(|v| pred.eval(v)).unwrap_or(false)
        }));
        expected
    }

    /// Matches any value of concrete type `T`.
    pub fn is_a<T>(&self) -> T
    where
        T: ArgValue + Default,
    {
        let desc = format!("is_a::<{}>()", std::any::type_name::<T>());
        self.push_matcher(ArgMatcher::pred(desc, |value| {
            value.downcast_ref::<T>().is_ok()
        }));
        T::default()
    }

    /// Matches arguments accepted by an arbitrary [`Predicate`], e.g.
    /// `session.matching(predicate::gt(4))`.
    pub fn matching<T, P>(&self, pred: P) -> T
    where
        T: ArgValue + Default,
        P: Predicate<T> + Send + Sync + 'static,
    {
        let desc = format!("matching({pred})");
        self.push_matcher(ArgMatcher::pred(desc, move |value| {
            value.downcast_ref::<T>().map(|v| pred.eval(v)).unwrap_or(false)
        }));
        T::default()
    }
}

/// Records every argument value a capture matcher sees.
///
/// A captor's matcher always matches; its job is the side channel.  All
/// captured values are kept in call order and the most recent one is
/// available through [`value`](Captor::value).  Verification replays
/// captures: every verify pass appends the values of the calls it matched.
pub struct Captor<T> {
    inner: Arc<CaptorInner<T>>,
}

struct CaptorInner<T> {
    values: Mutex<Vec<T>>,
}

pub(crate) trait CaptureSink: Send + Sync {
    fn accept(&self, value: &dyn ArgValue);
}

impl<T> CaptureSink for CaptorInner<T>
where
    T: ArgValue + Clone,
{
    fn accept(&self, value: &dyn ArgValue) {
        if let Ok(v) = value.downcast_ref::<T>() {
            self.values.lock().unwrap().push(v.clone());
        }
    }
}

impl<T> Captor<T> {
    pub fn new() -> Self {
        Captor { inner: Arc::new(CaptorInner { values: Mutex::new(Vec::new()) }) }
    }
}

impl<T> Default for Captor<T> {
    fn default() -> Self {
        Captor::new()
    }
}

impl<T> Clone for Captor<T> {
    fn clone(&self) -> Self {
        Captor { inner: self.inner.clone() }
    }
}

impl<T> Captor<T>
where
    T: ArgValue + Clone,
{
    /// Registers a capture matcher on `session` and returns a placeholder.
    pub fn capture(&self, session: &Session) -> T
    where
        T: Default,
    {
        session.push_matcher(ArgMatcher {
            desc: "capture()".to_string(),
            kind: MatcherKind::Captor(self.inner.clone()),
        });
        T::default()
    }

    /// The most recently captured value.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been captured yet.
    pub fn value(&self) -> T {
        self.inner
            .values
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no value has been captured")
    }

    /// Every captured value, in call order.
    pub fn all_values(&self) -> Vec<T> {
        self.inner.values.lock().unwrap().clone()
    }
}
