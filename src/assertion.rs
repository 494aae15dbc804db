//! Composite shape assertions
//!
//! An assertion bundles the matchers for one kind of element: annotations,
//! modifiers, declared type and, for methods, the parameter and thrown-type
//! sequences. Every part defaults to "any".
//!
//! ```
//! use shapecheck::{exact, method, Assertion, ElementDescriptor, Match, Modifier, Modifiers,
//!     NominalOracle, PrimitiveKind, ShapeContext, TypeDescriptor, TypeMatches};
//!
//! let types = TypeMatches::new(NominalOracle::new());
//! let string = TypeDescriptor::declared("java.lang.String");
//! let int = TypeDescriptor::primitive(PrimitiveKind::Int);
//!
//! let params: Vec<Box<dyn Match<ElementDescriptor>>> =
//!     vec![Box::new(types.is(string.clone())), Box::new(types.is(int.clone()))];
//! let shape = method()
//!     .modifiers(Modifiers::only([Modifier::Public]))
//!     .parameters(exact(params));
//!
//! let foo = ElementDescriptor::method("foo", TypeDescriptor::void())
//!     .with_modifiers([Modifier::Public])
//!     .with_parameter(ElementDescriptor::parameter("name", string))
//!     .with_parameter(ElementDescriptor::parameter("count", int));
//!
//! let mut cx = ShapeContext::new();
//! assert!(shape.test(&foo, &mut cx));
//! ```

use crate::descriptor::{
    AnnotationDescriptor, ElementDescriptor, ElementKind, ModifierSet, TypeDescriptor,
};
use crate::matcher::Match;
use crate::sequence::{Sequence, Tally};
use std::fmt;

/// Evaluation state for one assertion run
///
/// Holds the tallies of the parameter and thrown-type sequences between
/// [`Assertion::test`] and [`Assertion::describe`]. Use one context per
/// concurrent evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeContext {
    pub parameters: Tally,
    pub exceptions: Tally,
}

impl ShapeContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A named structural check over one kind of element
pub trait Assertion: Send + Sync + fmt::Debug {
    /// Kind of element this assertion accepts
    fn kind(&self) -> ElementKind;

    /// Evaluate every part against `element`
    ///
    /// Elements of another kind fail without evaluating any part.
    fn test(&self, element: &ElementDescriptor, cx: &mut ShapeContext) -> bool;

    /// Describe `element` as seen by the preceding [`Assertion::test`]
    fn describe(&self, element: &ElementDescriptor, cx: &mut ShapeContext) -> String;

    /// Condition text, singular ("a public method")
    fn condition(&self) -> String;

    /// Condition text, plural ("public methods")
    fn conditions(&self) -> String;

    /// Test with a fresh context; describe only on failure
    fn check(&self, element: &ElementDescriptor) -> Option<String> {
        let mut cx = ShapeContext::new();
        if self.test(element, &mut cx) {
            None
        } else {
            Some(self.describe(element, &mut cx))
        }
    }
}

/// Parts shared by method and variable assertions
#[derive(Debug, Default)]
struct Shape {
    annotations: Option<Box<dyn Match<[AnnotationDescriptor]>>>,
    modifiers: Option<Box<dyn Match<ModifierSet>>>,
    ty: Option<Box<dyn Match<TypeDescriptor>>>,
    condition: Option<(String, String)>,
}

impl Shape {
    /// Evaluates all three parts without short-circuiting
    fn test(&self, element: &ElementDescriptor) -> bool {
        let annotations = self
            .annotations
            .as_ref()
            .map_or(true, |m| m.test(&element.annotations));
        let modifiers = self
            .modifiers
            .as_ref()
            .map_or(true, |m| m.test(&element.modifiers));
        let ty = self.ty.as_ref().map_or(true, |m| m.test(&element.ty));
        annotations & modifiers & ty
    }

    /// Annotation line (when annotations are constrained) and the modifier/type prefix
    fn describe_prefix(&self, element: &ElementDescriptor) -> String {
        let mut text = String::new();
        if let Some(m) = &self.annotations {
            let annotations = m.describe(&element.annotations);
            if !annotations.is_empty() {
                text.push_str(&annotations);
                text.push('\n');
            }
        }

        let modifiers = match &self.modifiers {
            Some(m) => m.describe(&element.modifiers),
            None => element.modifiers.to_string(),
        };
        if !modifiers.is_empty() {
            text.push_str(&modifiers);
            text.push(' ');
        }

        let ty = match &self.ty {
            Some(m) => m.describe(&element.ty),
            None => element.ty.to_string(),
        };
        text.push_str(&format!("[{}]", ty));
        text
    }

    fn expected_prefix(&self) -> Vec<String> {
        let mut words = Vec::new();
        if let Some(m) = &self.annotations {
            words.push(m.expected());
        }
        if let Some(m) = &self.modifiers {
            words.push(m.expected());
        }
        let ty = self
            .ty
            .as_ref()
            .map_or_else(|| "any type".to_string(), |m| m.expected());
        words.push(format!("[{}]", ty));
        words
    }
}

/// Shape of a method
#[derive(Debug, Default)]
pub struct MethodAssertion {
    shape: Shape,
    parameters: Sequence<ElementDescriptor>,
    exceptions: Sequence<TypeDescriptor>,
}

/// Start a method assertion; every part matches anything until set
pub fn method() -> MethodAssertion {
    MethodAssertion::default()
}

impl MethodAssertion {
    pub fn annotations<M: Match<[AnnotationDescriptor]> + 'static>(mut self, matcher: M) -> Self {
        self.shape.annotations = Some(Box::new(matcher));
        self
    }

    pub fn modifiers<M: Match<ModifierSet> + 'static>(mut self, matcher: M) -> Self {
        self.shape.modifiers = Some(Box::new(matcher));
        self
    }

    /// Constrain the return type
    pub fn returns<M: Match<TypeDescriptor> + 'static>(mut self, matcher: M) -> Self {
        self.shape.ty = Some(Box::new(matcher));
        self
    }

    pub fn parameters(mut self, sequence: Sequence<ElementDescriptor>) -> Self {
        self.parameters = sequence;
        self
    }

    pub fn throws(mut self, sequence: Sequence<TypeDescriptor>) -> Self {
        self.exceptions = sequence;
        self
    }

    /// Set the singular and plural condition texts used in diagnostics
    pub fn with_condition(mut self, singular: &str, plural: &str) -> Self {
        self.shape.condition = Some((singular.to_string(), plural.to_string()));
        self
    }

    fn expected(&self) -> String {
        let mut words = self.shape.expected_prefix();
        words.push(format!("method({})", self.parameters.expected()));
        if !matches!(self.exceptions, Sequence::Any) {
            words.push(format!("throws {}", self.exceptions.expected()));
        }
        words.join(" ")
    }
}

impl Assertion for MethodAssertion {
    fn kind(&self) -> ElementKind {
        ElementKind::Method
    }

    fn test(&self, element: &ElementDescriptor, cx: &mut ShapeContext) -> bool {
        if element.kind != ElementKind::Method {
            return false;
        }

        // every part runs: describe() reads the tallies the sequences leave behind
        let shape = self.shape.test(element);
        let parameters = self.parameters.test(&element.parameters, &mut cx.parameters);
        let exceptions = self.exceptions.test(&element.thrown, &mut cx.exceptions);
        shape & parameters & exceptions
    }

    fn describe(&self, element: &ElementDescriptor, cx: &mut ShapeContext) -> String {
        if element.kind != ElementKind::Method {
            return element.kind.to_string();
        }

        let mut text = self.shape.describe_prefix(element);
        let parameters = self.parameters.describe(&element.parameters, &mut cx.parameters);
        text.push_str(&format!(" method({})", parameters));

        let exceptions = self.exceptions.describe(&element.thrown, &mut cx.exceptions);
        if !exceptions.is_empty() {
            text.push_str(&format!(" throws {}", exceptions));
        }
        text
    }

    fn condition(&self) -> String {
        match &self.shape.condition {
            Some((singular, _)) => singular.clone(),
            None => self.expected(),
        }
    }

    fn conditions(&self) -> String {
        match &self.shape.condition {
            Some((_, plural)) => plural.clone(),
            None => self.expected(),
        }
    }
}

/// Shape of a field
#[derive(Debug, Default)]
pub struct VariableAssertion {
    shape: Shape,
}

/// Start a field assertion; every part matches anything until set
pub fn variable() -> VariableAssertion {
    VariableAssertion::default()
}

impl VariableAssertion {
    pub fn annotations<M: Match<[AnnotationDescriptor]> + 'static>(mut self, matcher: M) -> Self {
        self.shape.annotations = Some(Box::new(matcher));
        self
    }

    pub fn modifiers<M: Match<ModifierSet> + 'static>(mut self, matcher: M) -> Self {
        self.shape.modifiers = Some(Box::new(matcher));
        self
    }

    pub fn of_type<M: Match<TypeDescriptor> + 'static>(mut self, matcher: M) -> Self {
        self.shape.ty = Some(Box::new(matcher));
        self
    }

    pub fn with_condition(mut self, singular: &str, plural: &str) -> Self {
        self.shape.condition = Some((singular.to_string(), plural.to_string()));
        self
    }

    fn expected(&self) -> String {
        let mut words = self.shape.expected_prefix();
        words.push("field".to_string());
        words.join(" ")
    }
}

impl Assertion for VariableAssertion {
    fn kind(&self) -> ElementKind {
        ElementKind::Field
    }

    fn test(&self, element: &ElementDescriptor, _cx: &mut ShapeContext) -> bool {
        element.kind == ElementKind::Field && self.shape.test(element)
    }

    fn describe(&self, element: &ElementDescriptor, _cx: &mut ShapeContext) -> String {
        if element.kind != ElementKind::Field {
            return element.kind.to_string();
        }
        format!("{} {}", self.shape.describe_prefix(element), element.name)
    }

    fn condition(&self) -> String {
        match &self.shape.condition {
            Some((singular, _)) => singular.clone(),
            None => self.expected(),
        }
    }

    fn conditions(&self) -> String {
        match &self.shape.condition {
            Some((_, plural)) => plural.clone(),
            None => self.expected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Modifier, PrimitiveKind};
    use crate::matcher::{Annotations, Modifiers, TypeMatches};
    use crate::oracle::NominalOracle;
    use crate::sequence::{contains, exact};
    use crate::times::{exactly, no};
    use pretty_assertions::assert_eq;

    const COMMAND: &str = "com.example.Command";

    fn types() -> TypeMatches {
        TypeMatches::new(
            NominalOracle::new().with_supertype("java.io.IOException", "java.lang.Exception"),
        )
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::declared("java.lang.String")
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::primitive(PrimitiveKind::Int)
    }

    fn public_string_int() -> MethodAssertion {
        let types = types();
        let params: Vec<Box<dyn Match<ElementDescriptor>>> =
            vec![Box::new(types.is(string())), Box::new(types.is(int()))];
        method()
            .modifiers(Modifiers::only([Modifier::Public]))
            .parameters(exact(params))
    }

    fn foo(modifiers: &[Modifier], params: &[TypeDescriptor]) -> ElementDescriptor {
        params.iter().enumerate().fold(
            ElementDescriptor::method("foo", TypeDescriptor::void())
                .with_modifiers(modifiers.iter().copied()),
            |m, (i, ty)| m.with_parameter(ElementDescriptor::parameter(&format!("p{}", i), ty.clone())),
        )
    }

    #[test]
    fn test_method_shape_passes() {
        let shape = public_string_int();
        let element = foo(&[Modifier::Public], &[string(), int()]);
        let mut cx = ShapeContext::new();
        assert!(shape.test(&element, &mut cx));
        assert_eq!(shape.check(&element), None);
    }

    #[test]
    fn test_method_shape_reports_every_failing_part() {
        let shape = public_string_int();
        let element = foo(&[Modifier::Private], &[string()]);
        let mut cx = ShapeContext::new();
        assert!(!shape.test(&element, &mut cx));

        let text = shape.describe(&element, &mut cx);
        assert_eq!(text, "private [void] method(1 values)");
        assert!(text.contains("private"));
        assert!(text.contains("1 values"));
    }

    #[test]
    fn test_method_assertion_rejects_fields() {
        let field = ElementDescriptor::field("foo", string()).with_modifiers([Modifier::Public]);
        let mut cx = ShapeContext::new();
        assert!(!method().test(&field, &mut cx));
        assert!(!public_string_int().test(&field, &mut cx));
        assert_eq!(method().describe(&field, &mut cx), "field");
        assert_eq!(cx, ShapeContext::new());
    }

    #[test]
    fn test_kind_fallback_uses_spaced_lowercase_name() {
        let constant = ElementDescriptor::new(ElementKind::EnumConstant, "RED", string());
        assert_eq!(method().check(&constant), Some("enum constant".to_string()));
        assert_eq!(variable().check(&constant), Some("enum constant".to_string()));
    }

    #[test]
    fn test_defaults_match_any_method() {
        let element = foo(&[Modifier::Private, Modifier::Static], &[int()])
            .with_thrown(TypeDescriptor::declared("java.io.IOException"));
        assert_eq!(method().check(&element), None);
    }

    #[test]
    fn test_all_parts_evaluated_after_a_failure() {
        let types = types();
        let shape = method()
            .modifiers(Modifiers::only([Modifier::Public]))
            .throws(contains(vec![no(types.subtype_of(TypeDescriptor::declared(
                "java.lang.Exception",
            )))]));
        let element = foo(&[Modifier::Private], &[])
            .with_thrown(TypeDescriptor::declared("java.io.IOException"));

        let mut cx = ShapeContext::new();
        assert!(!shape.test(&element, &mut cx));
        assert_eq!(cx.exceptions.counts()[0].get(), 1);
        assert_eq!(
            shape.describe(&element, &mut cx),
            "private [void] method() throws 1 matches of [no subtype of Exception]"
        );
    }

    #[test]
    fn test_annotation_line() {
        let shape = method()
            .annotations(Annotations::present(&[COMMAND]))
            .returns(types().is(TypeDescriptor::void()));
        let element = foo(&[Modifier::Public], &[string()])
            .with_annotation(AnnotationDescriptor::new("com.example.Alias"));

        let text = shape.check(&element).unwrap();
        assert_eq!(text, "@Alias\npublic [void] method(String p0)");
    }

    #[test]
    fn test_throws_quantifier() {
        let types = types();
        let shape = method().throws(contains(vec![exactly(
            1,
            types.is(TypeDescriptor::declared("java.io.IOException")),
        )]));
        let ok = foo(&[], &[]).with_thrown(TypeDescriptor::declared("java.io.IOException"));
        let missing = foo(&[], &[]);

        assert_eq!(shape.check(&ok), None);
        assert_eq!(
            shape.check(&missing),
            Some("[void] method() throws 0 matches of [exactly 1 IOException]".to_string())
        );
    }

    #[test]
    fn test_retained_context_is_reset_per_element() {
        let types = types();
        let shape = method().parameters(contains(vec![exactly(1, types.is(string()))]));
        let one = foo(&[], &[string()]);
        let two = foo(&[], &[string(), string()]);

        let mut cx = ShapeContext::new();
        assert!(shape.test(&one, &mut cx));
        assert!(!shape.test(&two, &mut cx));
        assert!(shape.test(&one, &mut cx));
    }

    #[test]
    fn test_variable_shape() {
        let types = types();
        let shape = variable()
            .modifiers(Modifiers::exact([Modifier::Private, Modifier::Final]))
            .of_type(types.is(string()));

        let good = ElementDescriptor::field("name", string())
            .with_modifiers([Modifier::Private, Modifier::Final]);
        let bad = ElementDescriptor::field("count", int()).with_modifiers([Modifier::Public]);

        assert_eq!(shape.check(&good), None);
        assert_eq!(shape.check(&bad), Some("public [int] count".to_string()));
    }

    #[test]
    fn test_variable_assertion_rejects_methods() {
        let element = foo(&[], &[]);
        assert_eq!(variable().check(&element), Some("method".to_string()));
    }

    #[test]
    fn test_conditions() {
        let generated = public_string_int();
        assert_eq!(
            generated.condition(),
            "only (public) [any type] method(String, int)"
        );
        assert_eq!(generated.conditions(), generated.condition());

        let named = public_string_int().with_condition("a public handler", "public handlers");
        assert_eq!(named.condition(), "a public handler");
        assert_eq!(named.conditions(), "public handlers");

        let field = variable().of_type(types().primitive(PrimitiveKind::Int));
        assert_eq!(field.condition(), "[int] field");
    }
}
