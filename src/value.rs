// vim: tw=80
//! Type-erased argument and return values.
//!
//! Mock calls cross the forwarding boundary as sequences of boxed
//! [`ArgValue`]s so that one dispatch engine can serve every method shape.
//! The ledger compares and replays recorded values, which is why erased
//! values still know how to test equality and clone themselves.

use core::fmt;

use downcast::{downcast, Any};

/// An erased argument or return value.
///
/// Implemented automatically for every `'static` type that is
/// `PartialEq + Clone + Send + Sync + Debug`, which is what the engine needs
/// to store a value in the call ledger, match it against later calls, feed it
/// to captors and print it in diagnostics.
pub trait ArgValue: Any + Send + Sync + fmt::Debug {
    /// Value equality against another erased value.  Values of different
    /// concrete types are never equal.
    fn eq_value(&self, other: &dyn ArgValue) -> bool;

    fn clone_value(&self) -> Box<dyn ArgValue>;
}

downcast!(dyn ArgValue);

impl<T> ArgValue for T
where
    T: PartialEq + Clone + Send + Sync + fmt::Debug + 'static,
{
    fn eq_value(&self, other: &dyn ArgValue) -> bool {
        other.downcast_ref::<T>().map(|o| self == o).unwrap_or(false)
    }

    fn clone_value(&self) -> Box<dyn ArgValue> {
        Box::new(self.clone())
    }
}

/// Element-wise value equality of two argument lists.
pub(crate) fn args_equal(
    a: &[Box<dyn ArgValue>],
    b: &[Box<dyn ArgValue>],
) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| x.eq_value(y.as_ref()))
}

/// Renders an argument list the way it appears in diagnostics:
/// `(5, "hello")`.
pub(crate) fn format_args(args: &[Box<dyn ArgValue>]) -> String {
    let rendered: Vec<String> =
        args.iter().map(|a| format!("{a:?}")).collect();
    format!("({})", rendered.join(", "))
}
