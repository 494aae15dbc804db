//! Atomic matchers
//!
//! A [`Match`] is an immutable predicate over one value that can also explain
//! itself: [`Match::expected`] renders what it is looking for and
//! [`Match::describe`] renders how a given value looks from its point of view.
//! Mismatches are data, never errors.

mod annotations;
mod modifiers;
mod names;
mod types;

pub use annotations::Annotations;
pub use modifiers::Modifiers;
pub use names::{Names, PatternError};
pub use types::{TypeMatches, Types};

use std::fmt;
use std::sync::Arc;

/// A predicate over one value, with expectation and mismatch text
///
/// `test(v)` holds exactly when `mismatch(v)` is `None`. Implementors that
/// override `mismatch` must keep that equivalence.
pub trait Match<T: ?Sized>: Send + Sync + fmt::Debug {
    fn test(&self, value: &T) -> bool;

    /// What this matcher expects
    fn expected(&self) -> String;

    /// How `value` looks to this matcher
    fn describe(&self, value: &T) -> String;

    /// `None` on success, otherwise a description of the value
    fn mismatch(&self, value: &T) -> Option<String> {
        if self.test(value) {
            None
        } else {
            Some(self.describe(value))
        }
    }
}

impl<T: ?Sized, M: Match<T> + ?Sized> Match<T> for Box<M> {
    fn test(&self, value: &T) -> bool {
        (**self).test(value)
    }

    fn expected(&self) -> String {
        (**self).expected()
    }

    fn describe(&self, value: &T) -> String {
        (**self).describe(value)
    }

    fn mismatch(&self, value: &T) -> Option<String> {
        (**self).mismatch(value)
    }
}

impl<T: ?Sized, M: Match<T> + ?Sized> Match<T> for Arc<M> {
    fn test(&self, value: &T) -> bool {
        (**self).test(value)
    }

    fn expected(&self) -> String {
        (**self).expected()
    }

    fn describe(&self, value: &T) -> String {
        (**self).describe(value)
    }

    fn mismatch(&self, value: &T) -> Option<String> {
        (**self).mismatch(value)
    }
}

/// Combinators available on every matcher
pub trait MatchExt<T: ?Sized>: Match<T> + Sized {
    /// Both must match; reports the first failing side
    fn and<M: Match<T>>(self, other: M) -> And<Self, M> {
        And(self, other)
    }

    /// Either must match; reports both sides when neither does
    fn or<M: Match<T>>(self, other: M) -> Or<Self, M> {
        Or(self, other)
    }

    fn boxed(self) -> Box<dyn Match<T>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: ?Sized, M: Match<T>> MatchExt<T> for M {}

/// Conjunction of two matchers, short-circuiting left to right
#[derive(Debug, Clone)]
pub struct And<A, B>(A, B);

impl<T: ?Sized, A: Match<T>, B: Match<T>> Match<T> for And<A, B> {
    fn test(&self, value: &T) -> bool {
        self.0.test(value) && self.1.test(value)
    }

    fn expected(&self) -> String {
        format!("{} and {}", self.0.expected(), self.1.expected())
    }

    fn describe(&self, value: &T) -> String {
        if self.0.test(value) {
            self.1.describe(value)
        } else {
            self.0.describe(value)
        }
    }

    fn mismatch(&self, value: &T) -> Option<String> {
        self.0.mismatch(value).or_else(|| self.1.mismatch(value))
    }
}

/// Disjunction of two matchers, short-circuiting left to right
#[derive(Debug, Clone)]
pub struct Or<A, B>(A, B);

impl<T: ?Sized, A: Match<T>, B: Match<T>> Match<T> for Or<A, B> {
    fn test(&self, value: &T) -> bool {
        self.0.test(value) || self.1.test(value)
    }

    fn expected(&self) -> String {
        format!("{} or {}", self.0.expected(), self.1.expected())
    }

    fn describe(&self, value: &T) -> String {
        match (self.0.test(value), self.1.test(value)) {
            (true, _) => self.0.describe(value),
            (false, true) => self.1.describe(value),
            (false, false) => format!("{} or {}", self.0.describe(value), self.1.describe(value)),
        }
    }

    fn mismatch(&self, value: &T) -> Option<String> {
        let left = self.0.mismatch(value)?;
        let right = self.1.mismatch(value)?;
        Some(format!("{} or {}", left, right))
    }
}

/// Matches every value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anything;

/// Shared "any value matches" singleton
pub const ANYTHING: Anything = Anything;

impl<T: fmt::Display + ?Sized> Match<T> for Anything {
    fn test(&self, _value: &T) -> bool {
        true
    }

    fn expected(&self) -> String {
        "anything".to_string()
    }

    fn describe(&self, value: &T) -> String {
        value.to_string()
    }
}

/// Matcher built from a closure and a fixed expectation text
pub struct Predicate<F> {
    expected: String,
    f: F,
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// Build a matcher from a closure
pub fn predicate<T, F>(expected: &str, f: F) -> Predicate<F>
where
    T: fmt::Display + ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    Predicate {
        expected: expected.to_string(),
        f,
    }
}

impl<T, F> Match<T> for Predicate<F>
where
    T: fmt::Display + ?Sized,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn test(&self, value: &T) -> bool {
        (self.f)(value)
    }

    fn expected(&self) -> String {
        self.expected.clone()
    }

    fn describe(&self, value: &T) -> String {
        value.to_string()
    }
}
