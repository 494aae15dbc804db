//! Quantified matchers
//!
//! A [`Times`] pairs one matcher with a [`Quantity`]. It does not count by
//! itself: the running total lives in a [`Count`] owned by the caller, which
//! keeps the quantifier shareable and makes every piece of mutable state
//! visible at the call site.
//!
//! ```
//! use shapecheck::{exactly, predicate, Count};
//!
//! let vowels = exactly(2, predicate("vowel", |c: &char| "aeiou".contains(*c)));
//! let mut count = Count::new();
//! for c in ['a', 'b', 'e'] {
//!     vowels.add(&c, &mut count);
//! }
//! assert!(vowels.verify(&count));
//! assert_eq!(vowels.describe(&mut count), "2 matches of [exactly 2 vowel]");
//! assert_eq!(count.get(), 0);
//! ```

use crate::matcher::Match;
use std::fmt;

/// How many values a quantifier expects to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
    AtMost(usize),
    None,
}

impl Quantity {
    /// Whether `count` satisfies this quantity
    pub fn admits(self, count: usize) -> bool {
        match self {
            Quantity::Exactly(n) => count == n,
            Quantity::Between(min, max) => (min..=max).contains(&count),
            Quantity::AtLeast(n) => count >= n,
            Quantity::AtMost(n) => count <= n,
            Quantity::None => count == 0,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Exactly(n) => write!(f, "exactly {}", n),
            Quantity::Between(min, max) => write!(f, "between {} and {}", min, max),
            Quantity::AtLeast(n) => write!(f, "at least {}", n),
            Quantity::AtMost(n) => write!(f, "at most {}", n),
            Quantity::None => write!(f, "no"),
        }
    }
}

/// Running match count for one [`Times`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count(usize);

impl Count {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// A matcher with a quantity attached
pub struct Times<T: ?Sized> {
    matcher: Box<dyn Match<T>>,
    quantity: Quantity,
}

impl<T: ?Sized> fmt::Debug for Times<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Times")
            .field("matcher", &self.matcher)
            .field("quantity", &self.quantity)
            .finish()
    }
}

impl<T: ?Sized> Times<T> {
    pub fn new<M: Match<T> + 'static>(quantity: Quantity, matcher: M) -> Self {
        if let Quantity::Between(min, max) = quantity {
            if min > max {
                log::warn!(
                    "quantity between {} and {} can never be satisfied ({})",
                    min,
                    max,
                    matcher.expected()
                );
            }
        }
        Self {
            matcher: Box::new(matcher),
            quantity,
        }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Evaluate one candidate; counts it and returns true if it matches
    pub fn add(&self, value: &T, count: &mut Count) -> bool {
        let hit = self.matcher.test(value);
        if hit {
            count.0 += 1;
        }
        hit
    }

    /// Whether the accumulated count satisfies the quantity
    pub fn verify(&self, count: &Count) -> bool {
        self.quantity.admits(count.0)
    }

    /// Render "`<n>` matches of [`<condition>`]" and reset the count
    ///
    /// Call at most once per pass, after [`Times::verify`].
    pub fn describe(&self, count: &mut Count) -> String {
        let text = format!("{} matches of [{}]", count.0, self.expected());
        count.reset();
        text
    }

    pub fn reset(&self, count: &mut Count) {
        count.reset();
    }

    pub fn expected(&self) -> String {
        format!("{} {}", self.quantity, self.matcher.expected())
    }
}

pub fn exactly<T: ?Sized, M: Match<T> + 'static>(n: usize, matcher: M) -> Times<T> {
    Times::new(Quantity::Exactly(n), matcher)
}

pub fn between<T: ?Sized, M: Match<T> + 'static>(min: usize, max: usize, matcher: M) -> Times<T> {
    Times::new(Quantity::Between(min, max), matcher)
}

pub fn min<T: ?Sized, M: Match<T> + 'static>(n: usize, matcher: M) -> Times<T> {
    Times::new(Quantity::AtLeast(n), matcher)
}

pub fn max<T: ?Sized, M: Match<T> + 'static>(n: usize, matcher: M) -> Times<T> {
    Times::new(Quantity::AtMost(n), matcher)
}

pub fn no<T: ?Sized, M: Match<T> + 'static>(matcher: M) -> Times<T> {
    Times::new(Quantity::None, matcher)
}
