// vim: tw=80
//! The interception substrate: a declarative macro that generates a
//! forwarding adapter for a trait.
//!
//! The engine only depends on the forwarding contract — every call arrives
//! at [`Mock::intercept`](crate::Mock::intercept) as a method identity plus
//! erased argument values — so anything honoring that contract can serve as
//! a mock.  [`mock!`](crate::mock) writes the boilerplate: a facade struct
//! holding a [`Mock`](crate::Mock) handle, identity impls, and a trait impl
//! whose every method forwards to the engine and renders the outcome.
//!
//! Supported method shapes: `&self` or `&mut self` receivers, owned
//! `'static` arguments, and owned, `Result<T, E>`, or unit return types.
//! Argument and return types must be `'static + Send + Sync + Clone +
//! PartialEq + Debug`, and return types `Default` as well, so the engine can
//! store, compare, replay and zero them.

use crate::state::Mock;

/// Implemented by generated mock facades; the glue between the fluent API
/// and the per-mock engine handle.
pub trait Mocked {
    /// This facade's engine handle.
    fn mock(&self) -> &Mock;

    /// Wraps a handle in a new facade of the same concrete type.  Used by
    /// `verify`/`when` to hand back same-typed verifying and stubbing
    /// facades.
    fn from_mock(mock: Mock) -> Self
    where
        Self: Sized;
}

/// Generates a mock: a struct implementing the given trait by forwarding
/// every method to the dispatch engine.
///
/// ```
/// use mocklet::{mock, return_const, verify, Session};
///
/// trait Greeter {
///     fn greet(&self, name: String) -> String;
/// }
///
/// mock! {
///     pub MockGreeter for Greeter {
///         fn greet(&self, name: String) -> String;
///     }
/// }
///
/// let s = Session::new();
/// let greeter = MockGreeter::new(&s);
/// return_const("hi".to_string()).when(&greeter).greet(s.any());
/// assert_eq!("hi", greeter.greet("bob".to_string()));
/// verify(&greeter).greet(s.eq("bob".to_string()));
/// s.teardown();
/// ```
///
/// The generated type also implements `Clone` (a clone aliases the same
/// mock), `Display` and `Debug` (as `Mock<TraitName>`), and identity-based
/// `PartialEq` and `Hash`; the `eq`/`hash`/`to_string` identity operations
/// cannot be stubbed or verified.
#[macro_export]
macro_rules! mock {
    ($vis:vis $mock:ident for $trt:ident { $($methods:tt)* }) => {
        $vis struct $mock {
            mock: $crate::Mock,
        }

        impl $mock {
            /// Creates a new mock of this trait, registered with `session`.
            $vis fn new(session: &$crate::Session) -> Self {
                Self {
                    mock: $crate::Mock::new(session, stringify!($trt)),
                }
            }
        }

        impl $crate::Mocked for $mock {
            fn mock(&self) -> &$crate::Mock {
                &self.mock
            }

            fn from_mock(mock: $crate::Mock) -> Self {
                Self { mock }
            }
        }

        impl ::std::clone::Clone for $mock {
            fn clone(&self) -> Self {
                Self { mock: self.mock.share() }
            }
        }

        impl ::std::fmt::Display for $mock {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::fmt::Result {
                self.mock.identity_guard("to_string");
                write!(f, "Mock<{}>", stringify!($trt))
            }
        }

        impl ::std::fmt::Debug for $mock {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::fmt::Result {
                write!(f, "Mock<{}>", stringify!($trt))
            }
        }

        impl ::std::cmp::PartialEq for $mock {
            fn eq(&self, other: &Self) -> bool {
                self.mock.identity_guard("eq");
                self.mock.same_state(&other.mock)
            }
        }

        impl ::std::cmp::Eq for $mock {}

        impl ::std::hash::Hash for $mock {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                self.mock.identity_guard("hash");
                ::std::hash::Hash::hash(&self.mock.state_id(), state);
            }
        }

        impl $trt for $mock {
            $crate::mock_methods!{ $trt; $($methods)* }
        }
    };
}

/// Expands one forwarding method per signature.  Six arms: two receivers
/// crossed with `Result`, plain, and unit return types; `Result` must come
/// first so it isn't swallowed by the plain-type arm.
#[doc(hidden)]
#[macro_export]
macro_rules! mock_methods {
    ($trt:ident; ) => {};

    ($trt:ident;
     fn $name:ident(&self $(, $arg:ident : $aty:ty)* $(,)?)
        -> Result<$ok:ty, $err:ty>;
     $($rest:tt)*) => {
        fn $name(&self $(, $arg: $aty)*) -> Result<$ok, $err> {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<Result<$ok, $err>>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_result::<$ok, $err>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };

    ($trt:ident;
     fn $name:ident(&self $(, $arg:ident : $aty:ty)* $(,)?) -> $ret:ty;
     $($rest:tt)*) => {
        fn $name(&self $(, $arg: $aty)*) -> $ret {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<$ret>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_value::<$ret>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };

    ($trt:ident;
     fn $name:ident(&self $(, $arg:ident : $aty:ty)* $(,)?);
     $($rest:tt)*) => {
        fn $name(&self $(, $arg: $aty)*) {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<()>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_value::<()>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };

    ($trt:ident;
     fn $name:ident(&mut self $(, $arg:ident : $aty:ty)* $(,)?)
        -> Result<$ok:ty, $err:ty>;
     $($rest:tt)*) => {
        fn $name(&mut self $(, $arg: $aty)*) -> Result<$ok, $err> {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<Result<$ok, $err>>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_result::<$ok, $err>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };

    ($trt:ident;
     fn $name:ident(&mut self $(, $arg:ident : $aty:ty)* $(,)?) -> $ret:ty;
     $($rest:tt)*) => {
        fn $name(&mut self $(, $arg: $aty)*) -> $ret {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<$ret>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_value::<$ret>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };

    ($trt:ident;
     fn $name:ident(&mut self $(, $arg:ident : $aty:ty)* $(,)?);
     $($rest:tt)*) => {
        fn $name(&mut self $(, $arg: $aty)*) {
            $crate::Mocked::mock(self).intercept(
                $crate::MethodDesc::new::<()>(
                    stringify!($trt), stringify!($name)),
                vec![$(Box::new($arg) as Box<dyn $crate::ArgValue>),*],
            ).into_value::<()>(stringify!($name))
        }
        $crate::mock_methods!{ $trt; $($rest)* }
    };
}
