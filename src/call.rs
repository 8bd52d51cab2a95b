// vim: tw=80
//! Method identities, call sites and the call ledger's records.

use std::any::TypeId;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::value::{format_args, ArgValue};

/// Identifies one method of one mocked trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub type_name: &'static str,
    pub name: &'static str,
}

impl MethodId {
    pub fn new(type_name: &'static str, name: &'static str) -> Self {
        MethodId { type_name, name }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", field_label(self.type_name), self.name)
    }
}

/// A statically known type, carried for the stub-time compatibility check.
#[derive(Clone, Copy, Debug)]
pub struct StaticType {
    pub id: TypeId,
    pub name: &'static str,
}

impl StaticType {
    pub fn of<T: 'static>() -> Self {
        StaticType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// Everything the adapter knows about the method being forwarded: its
/// identity plus its declared return type.
#[derive(Clone, Copy, Debug)]
pub struct MethodDesc {
    pub id: MethodId,
    pub ret: StaticType,
}

impl MethodDesc {
    pub fn new<O: 'static>(
        type_name: &'static str,
        name: &'static str,
    ) -> Self {
        MethodDesc {
            id: MethodId::new(type_name, name),
            ret: StaticType::of::<O>(),
        }
    }
}

/// The test line that produced a call, captured via `#[track_caller]`.
#[derive(Clone, Copy, Debug)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    #[track_caller]
    pub fn here() -> Self {
        let loc = Location::caller();
        CallSite { file: loc.file(), line: loc.line() }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One call as it happened: method, actual arguments, call site.
///
/// Immutable except for the `verified` flag, which verification flips.  The
/// ledger hands out `Arc<CallRecord>` snapshots, so the flag is atomic to
/// stay flippable while production threads still hold the record.
#[derive(Debug)]
pub struct CallRecord {
    pub(crate) method: MethodId,
    pub(crate) args: Vec<Box<dyn ArgValue>>,
    pub(crate) site: CallSite,
    verified: AtomicBool,
}

impl CallRecord {
    pub(crate) fn new(
        method: MethodId,
        args: Vec<Box<dyn ArgValue>>,
        site: CallSite,
    ) -> Self {
        CallRecord { method, args, site, verified: AtomicBool::new(false) }
    }

    pub(crate) fn is_verified(&self) -> bool {
        self.verified.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_verified(&self) {
        self.verified.store(true, Ordering::Relaxed);
    }

    /// Diagnostic form: `  greeter.greet("bob")\n  at tests/t.rs:17`.
    pub(crate) fn describe(&self) -> String {
        format!(
            "\n  {}{}\n  at {}",
            self.method,
            format_args(&self.args),
            self.site
        )
    }
}

/// `Greeter` becomes `greeter` in diagnostics.
pub(crate) fn field_label(type_name: &str) -> String {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
