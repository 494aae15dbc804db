//! Sequence combinators
//!
//! A [`Sequence`] evaluates matchers or quantifiers across an ordered
//! collection (parameters, thrown types). Quantifier counts go into a
//! caller-supplied [`Tally`], which [`Sequence::test`] resets before every
//! evaluation and [`Sequence::describe`] drains afterwards.

use crate::matcher::Match;
use crate::times::{Count, Times};
use std::fmt;

/// Per-evaluation state of a sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<Count>,
    uncovered: usize,
    evaluated: bool,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// One count per quantifier of the last evaluation
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    /// Values that matched no quantifier in the last coverage evaluation
    pub fn uncovered(&self) -> usize {
        self.uncovered
    }

    /// Whether a test pass has run since the last describe
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn reset(&mut self, slots: usize) {
        self.counts.clear();
        self.counts.resize(slots, Count::new());
        self.uncovered = 0;
        self.evaluated = false;
    }
}

/// Combinator over a collection of values
pub enum Sequence<T> {
    /// Matches every collection
    Any,
    /// Positional: same length, each value matches the matcher at its index
    Exact(Vec<Box<dyn Match<T>>>),
    /// Every value matches
    Each(Box<dyn Match<T>>),
    /// Every quantifier holds over the whole collection, independently
    Contains(Vec<Times<T>>),
    /// Like `Contains`, and every value matches at least one quantifier
    Cover(Vec<Times<T>>),
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Sequence::Any
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Any => f.write_str("Any"),
            Sequence::Exact(matchers) => f.debug_tuple("Exact").field(matchers).finish(),
            Sequence::Each(matcher) => f.debug_tuple("Each").field(matcher).finish(),
            Sequence::Contains(times) => f.debug_tuple("Contains").field(times).finish(),
            Sequence::Cover(times) => f.debug_tuple("Cover").field(times).finish(),
        }
    }
}

impl<T> Sequence<T> {
    fn slots(&self) -> usize {
        match self {
            Sequence::Contains(times) | Sequence::Cover(times) => times.len(),
            Sequence::Any | Sequence::Exact(_) | Sequence::Each(_) => 0,
        }
    }

    /// Evaluate `values`, resetting `tally` first
    pub fn test(&self, values: &[T], tally: &mut Tally) -> bool {
        tally.reset(self.slots());
        let passed = match self {
            Sequence::Any => true,
            Sequence::Exact(matchers) => {
                values.len() == matchers.len()
                    && matchers.iter().zip(values).all(|(m, v)| m.test(v))
            }
            Sequence::Each(matcher) => values.iter().all(|v| matcher.test(v)),
            Sequence::Contains(times) => {
                for value in values {
                    for (t, count) in times.iter().zip(tally.counts.iter_mut()) {
                        t.add(value, count);
                    }
                }
                Self::verify(times, &tally.counts)
            }
            Sequence::Cover(times) => {
                for value in values {
                    let mut hit = false;
                    for (t, count) in times.iter().zip(tally.counts.iter_mut()) {
                        // no short-circuit: a value counts toward every quantifier it matches
                        hit |= t.add(value, count);
                    }
                    if !hit {
                        tally.uncovered += 1;
                    }
                }
                tally.uncovered == 0 && Self::verify(times, &tally.counts)
            }
        };
        tally.evaluated = true;
        passed
    }

    fn verify(times: &[Times<T>], counts: &[Count]) -> bool {
        times.iter().zip(counts).all(|(t, c)| t.verify(c))
    }

    /// What this sequence expects
    pub fn expected(&self) -> String {
        match self {
            Sequence::Any => "...".to_string(),
            Sequence::Exact(matchers) => {
                let parts: Vec<String> = matchers.iter().map(|m| m.expected()).collect();
                parts.join(", ")
            }
            Sequence::Each(matcher) => format!("each {}", matcher.expected()),
            Sequence::Contains(times) => {
                let parts: Vec<String> = times.iter().map(|t| t.expected()).collect();
                parts.join(", ")
            }
            Sequence::Cover(times) => {
                let parts: Vec<String> = times.iter().map(|t| t.expected()).collect();
                format!("{}, nothing else", parts.join(", "))
            }
        }
    }
}

impl<T: fmt::Display> Sequence<T> {
    /// Describe `values` as seen by the last [`Sequence::test`] pass
    ///
    /// Quantifier counts are consumed: describing twice, or before testing,
    /// is a caller bug.
    ///
    /// # Panics
    ///
    /// Panics if this is a `Contains` or `Cover` sequence and `tally` holds no
    /// evaluation of it.
    pub fn describe(&self, values: &[T], tally: &mut Tally) -> String {
        match self {
            Sequence::Any => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                parts.join(", ")
            }
            Sequence::Exact(matchers) => {
                if values.len() != matchers.len() {
                    format!("{} values", values.len())
                } else {
                    let parts: Vec<String> = matchers
                        .iter()
                        .zip(values)
                        .map(|(m, v)| m.describe(v))
                        .collect();
                    parts.join(", ")
                }
            }
            Sequence::Each(matcher) => {
                let parts: Vec<String> = values.iter().map(|v| matcher.describe(v)).collect();
                parts.join(", ")
            }
            Sequence::Contains(times) | Sequence::Cover(times) => {
                assert!(
                    tally.evaluated && tally.counts.len() == times.len(),
                    "quantified sequence described without a preceding test"
                );
                let text = if times.is_empty() && !values.is_empty() {
                    format!("{} values", values.len())
                } else {
                    let mut parts: Vec<String> = times
                        .iter()
                        .zip(tally.counts.iter_mut())
                        .map(|(t, count)| t.describe(count))
                        .collect();
                    if tally.uncovered > 0 {
                        parts.push(format!("{} unmatched values", tally.uncovered));
                    }
                    parts.join(", ")
                };
                tally.uncovered = 0;
                tally.evaluated = false;
                text
            }
        }
    }
}

/// Wildcard sequence
pub fn any<T>() -> Sequence<T> {
    Sequence::Any
}

/// Positional sequence
pub fn exact<T>(matchers: Vec<Box<dyn Match<T>>>) -> Sequence<T> {
    Sequence::Exact(matchers)
}

/// Universal sequence
pub fn each<T, M: Match<T> + 'static>(matcher: M) -> Sequence<T> {
    Sequence::Each(Box::new(matcher))
}

/// Independent quantifiers
pub fn contains<T>(times: Vec<Times<T>>) -> Sequence<T> {
    Sequence::Contains(times)
}

/// Quantifiers that must also cover every value
pub fn cover<T>(times: Vec<Times<T>>) -> Sequence<T> {
    Sequence::Cover(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Modifier, ModifierSet};
    use crate::matcher::{predicate, Modifiers, ANYTHING};
    use crate::times::{between, exactly, no};
    use pretty_assertions::assert_eq;

    fn is_x() -> impl Match<String> {
        predicate("x", |v: &String| v == "a" || v == "c")
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn mods(m: Modifier) -> ModifierSet {
        [m].into_iter().collect()
    }

    fn x_then_anything() -> Sequence<String> {
        let matchers: Vec<Box<dyn Match<String>>> = vec![Box::new(is_x()), Box::new(ANYTHING)];
        exact(matchers)
    }

    fn visibility() -> Sequence<ModifierSet> {
        cover(vec![
            between(1, 2, Modifiers::any_of([Modifier::Public])),
            between(1, 1, Modifiers::any_of([Modifier::Private])),
        ])
    }

    #[test]
    fn test_any_matches_every_collection() {
        let seq: Sequence<String> = any();
        let mut tally = Tally::new();
        assert!(seq.test(&[], &mut tally));
        assert!(seq.test(&strings(&["a", "b"]), &mut tally));
    }

    #[test]
    fn test_exact_requires_equal_length() {
        let seq = x_then_anything();
        let mut tally = Tally::new();
        assert!(seq.test(&strings(&["a", "b"]), &mut tally));
        assert!(!seq.test(&strings(&["a"]), &mut tally));
        assert!(!seq.test(&strings(&["a", "b", "c"]), &mut tally));
        assert!(!seq.test(&strings(&["b", "a"]), &mut tally));
    }

    #[test]
    fn test_exact_describe() {
        let seq = x_then_anything();
        let mut tally = Tally::new();
        assert_eq!(seq.describe(&strings(&["a", "b"]), &mut tally), "a, b");
        assert_eq!(seq.describe(&strings(&["a"]), &mut tally), "1 values");
    }

    #[test]
    fn test_exact_describe_with_no_matchers() {
        let seq: Sequence<String> = exact(Vec::new());
        let mut tally = Tally::new();
        assert_eq!(seq.describe(&strings(&["a", "b", "c"]), &mut tally), "3 values");
        assert_eq!(seq.describe(&[], &mut tally), "");
    }

    #[test]
    fn test_any_describe_lists_values() {
        let seq: Sequence<String> = any();
        let mut tally = Tally::new();
        assert_eq!(seq.describe(&strings(&["a", "b"]), &mut tally), "a, b");
        assert_eq!(seq.describe(&[], &mut tally), "");
    }

    #[test]
    fn test_each_describe_uses_the_matcher() {
        let seq: Sequence<ModifierSet> = each(Modifiers::except([Modifier::Private]));
        let values = [mods(Modifier::Public), mods(Modifier::Private)];
        let mut tally = Tally::new();
        assert!(!seq.test(&values, &mut tally));
        assert_eq!(seq.describe(&values, &mut tally), "public, private");
        assert_eq!(seq.describe(&[], &mut tally), "");
    }

    #[test]
    fn test_each_is_conjunction() {
        let seq = each(is_x());
        let mut tally = Tally::new();
        assert!(seq.test(&[], &mut tally));
        assert!(seq.test(&strings(&["a", "c"]), &mut tally));
        assert!(!seq.test(&strings(&["a", "b"]), &mut tally));
    }

    #[test]
    fn test_contains_exact_count() {
        let values = strings(&["a", "b", "c"]);
        let mut tally = Tally::new();
        assert!(contains(vec![exactly(2, is_x())]).test(&values, &mut tally));
        assert!(!contains(vec![exactly(3, is_x())]).test(&values, &mut tally));
    }

    #[test]
    fn test_contains_ignores_unmatched_values() {
        let values = strings(&["a", "b", "z"]);
        let mut tally = Tally::new();
        let seq = contains(vec![exactly(1, is_x()), no(predicate("y", |v: &String| v == "y"))]);
        assert!(seq.test(&values, &mut tally));
        assert_eq!(tally.uncovered(), 0);
    }

    #[test]
    fn test_cover_requires_every_value_matched() {
        let seq = visibility();
        let mut tally = Tally::new();
        let ok = [mods(Modifier::Public), mods(Modifier::Public), mods(Modifier::Private)];
        assert!(seq.test(&ok, &mut tally));

        let missing_private = [mods(Modifier::Public), mods(Modifier::Public), mods(Modifier::Public)];
        assert!(!seq.test(&missing_private, &mut tally));

        let stray = [mods(Modifier::Public), mods(Modifier::Private), mods(Modifier::Static)];
        assert!(!seq.test(&stray, &mut tally));
        assert_eq!(tally.uncovered(), 1);
    }

    #[test]
    fn test_contains_and_cover_differ_on_stray_values() {
        let times = || -> Vec<Times<ModifierSet>> {
            vec![
                between(1, 2, Modifiers::any_of([Modifier::Public])),
                between(1, 1, Modifiers::any_of([Modifier::Private])),
            ]
        };
        let values = [mods(Modifier::Public), mods(Modifier::Private), mods(Modifier::Static)];
        let mut tally = Tally::new();
        assert!(contains(times()).test(&values, &mut tally));
        assert!(!cover(times()).test(&values, &mut tally));
    }

    #[test]
    fn test_cover_counts_values_toward_every_quantifier() {
        let seq: Sequence<ModifierSet> = cover(vec![
            exactly(2, Modifiers::any_of([Modifier::Public])),
            exactly(1, Modifiers::any_of([Modifier::Static])),
        ]);
        let values: Vec<ModifierSet> = vec![
            [Modifier::Public, Modifier::Static].into_iter().collect(),
            mods(Modifier::Public),
        ];
        let mut tally = Tally::new();
        assert!(seq.test(&values, &mut tally));
    }

    #[test]
    fn test_retained_tally_only_reflects_latest_input() {
        let seq = contains(vec![exactly(2, is_x())]);
        let mut tally = Tally::new();
        assert!(seq.test(&strings(&["a", "c"]), &mut tally));
        assert!(!seq.test(&strings(&["a"]), &mut tally));
        assert!(seq.test(&strings(&["c", "b", "a"]), &mut tally));
        assert_eq!(tally.counts()[0].get(), 2);
    }

    #[test]
    fn test_contains_describe() {
        let seq = contains(vec![exactly(3, is_x())]);
        let values = strings(&["a", "b", "c"]);
        let mut tally = Tally::new();
        assert!(!seq.test(&values, &mut tally));
        assert_eq!(seq.describe(&values, &mut tally), "2 matches of [exactly 3 x]");
        assert!(!tally.is_evaluated());
    }

    #[test]
    fn test_contains_describe_with_no_quantifiers() {
        let seq: Sequence<String> = contains(Vec::new());
        let values = strings(&["a", "b"]);
        let mut tally = Tally::new();
        assert!(seq.test(&values, &mut tally));
        assert_eq!(seq.describe(&values, &mut tally), "2 values");
    }

    #[test]
    fn test_cover_describe_mentions_unmatched_values() {
        let seq = visibility();
        let values = [mods(Modifier::Public), mods(Modifier::Static)];
        let mut tally = Tally::new();
        assert!(!seq.test(&values, &mut tally));
        assert_eq!(
            seq.describe(&values, &mut tally),
            "1 matches of [between 1 and 2 any of (public)], \
             0 matches of [between 1 and 1 any of (private)], \
             1 unmatched values"
        );
    }

    #[test]
    #[should_panic(expected = "described without a preceding test")]
    fn test_describe_before_test_panics() {
        let seq = contains(vec![exactly(1, is_x())]);
        let mut tally = Tally::new();
        seq.describe(&strings(&["a"]), &mut tally);
    }

    #[test]
    #[should_panic(expected = "described without a preceding test")]
    fn test_describe_twice_panics() {
        let seq = contains(vec![exactly(1, is_x())]);
        let values = strings(&["a"]);
        let mut tally = Tally::new();
        seq.test(&values, &mut tally);
        seq.describe(&values, &mut tally);
        seq.describe(&values, &mut tally);
    }

    #[test]
    fn test_expected_texts() {
        let seq = x_then_anything();
        assert_eq!(seq.expected(), "x, anything");
        assert_eq!(each(is_x()).expected(), "each x");
        assert_eq!(
            visibility().expected(),
            "between 1 and 2 any of (public), between 1 and 1 any of (private), nothing else"
        );
    }
}
