//! Shapecheck - structural assertions over program elements
//!
//! Describes the expected shape of methods and fields (annotations,
//! modifiers, types, parameter and thrown-type lists) with composable
//! matchers, and explains every mismatch in plain text.
//!
//! # Architecture
//!
//! ```text
//! Match<T> -> Times<T> -> Sequence<T> -> Assertion -> Checker -> Diagnostic
//! ```
//!
//! Matchers are immutable and shareable across threads. Everything an
//! evaluation accumulates (quantifier counts, sequence tallies) lives in
//! context values the caller owns: [`Count`], [`Tally`] and [`ShapeContext`].
//!
//! # Example
//!
//! ```
//! use shapecheck::{method, Assertion, ElementDescriptor, Modifier, Modifiers, TypeDescriptor};
//!
//! let shape = method()
//!     .modifiers(Modifiers::only([Modifier::Public]))
//!     .with_condition("a public method", "public methods");
//!
//! let onjoin = ElementDescriptor::method("onJoin", TypeDescriptor::void())
//!     .with_modifiers([Modifier::Private]);
//!
//! assert_eq!(shape.check(&onjoin).as_deref(), Some("private [void] method()"));
//! ```

pub mod assertion;
pub mod checker;
pub mod config;
pub mod descriptor;
pub mod diagnostic;
pub mod matcher;
pub mod oracle;
pub mod sequence;
pub mod times;

// Re-export main types
pub use assertion::{method, variable, Assertion, MethodAssertion, ShapeContext, VariableAssertion};
pub use checker::{CheckResult, Checker, ShapeRule};
pub use config::{CheckerConfig, ConfigError, RulesConfig};
pub use descriptor::{
    AnnotationDescriptor, DescriptorError, ElementDescriptor, ElementKind, Modifier, ModifierSet,
    PrimitiveKind, TypeDescriptor, TypeKind,
};
pub use diagnostic::{Diagnostic, Severity};
pub use matcher::{
    predicate, And, Annotations, Anything, Match, MatchExt, Modifiers, Names, Or, PatternError,
    Predicate, TypeMatches, Types, ANYTHING,
};
pub use oracle::{NominalOracle, TypeOracle};
pub use sequence::{any, contains, cover, each, exact, Sequence, Tally};
pub use times::{between, exactly, max, min, no, Count, Quantity, Times};
