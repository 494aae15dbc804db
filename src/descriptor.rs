//! Descriptors of inspected program elements
//!
//! A front end (annotation processor, static-analysis driver) builds one
//! [`ElementDescriptor`] per inspected element and hands it to the matchers.
//! Descriptors are plain data: nothing in this crate mutates them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Error decoding descriptors supplied by a front end
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kind of a program element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Package,
    Module,
    Class,
    Interface,
    Enum,
    Record,
    AnnotationType,
    EnumConstant,
    Field,
    Parameter,
    LocalVariable,
    Method,
    Constructor,
    StaticInit,
    InstanceInit,
    TypeParameter,
    Other,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Package => "package",
            ElementKind::Module => "module",
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Record => "record",
            ElementKind::AnnotationType => "annotation type",
            ElementKind::EnumConstant => "enum constant",
            ElementKind::Field => "field",
            ElementKind::Parameter => "parameter",
            ElementKind::LocalVariable => "local variable",
            ElementKind::Method => "method",
            ElementKind::Constructor => "constructor",
            ElementKind::StaticInit => "static init",
            ElementKind::InstanceInit => "instance init",
            ElementKind::TypeParameter => "type parameter",
            ElementKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Declaration modifier
///
/// Variants are declared in canonical source order, so a sorted set renders
/// the way a declaration is conventionally written.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Sealed,
    NonSealed,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Sealed => "sealed",
            Modifier::NonSealed => "non-sealed",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Modifier::Public),
            "protected" => Ok(Modifier::Protected),
            "private" => Ok(Modifier::Private),
            "abstract" => Ok(Modifier::Abstract),
            "default" => Ok(Modifier::Default),
            "static" => Ok(Modifier::Static),
            "sealed" => Ok(Modifier::Sealed),
            "non-sealed" | "non_sealed" => Ok(Modifier::NonSealed),
            "final" => Ok(Modifier::Final),
            "transient" => Ok(Modifier::Transient),
            "volatile" => Ok(Modifier::Volatile),
            "synchronized" => Ok(Modifier::Synchronized),
            "native" => Ok(Modifier::Native),
            "strictfp" => Ok(Modifier::Strictfp),
            _ => Err(format!("Unknown modifier: {}", s)),
        }
    }
}

/// Set of modifiers on one element
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(BTreeSet<Modifier>);

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn insert(&mut self, modifier: Modifier) -> bool {
        self.0.insert(modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_subset(&self, other: &ModifierSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn is_disjoint(&self, other: &ModifierSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<String> = self.0.iter().map(|m| m.to_string()).collect();
        f.write_str(&words.join(" "))
    }
}

/// Primitive type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Qualified name of the boxed counterpart
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    /// Direct primitive supertypes (widening conversions)
    pub fn widens_to(self) -> &'static [PrimitiveKind] {
        match self {
            PrimitiveKind::Byte => &[PrimitiveKind::Short],
            PrimitiveKind::Short | PrimitiveKind::Char => &[PrimitiveKind::Int],
            PrimitiveKind::Int => &[PrimitiveKind::Long],
            PrimitiveKind::Long => &[PrimitiveKind::Float],
            PrimitiveKind::Float => &[PrimitiveKind::Double],
            PrimitiveKind::Boolean | PrimitiveKind::Double => &[],
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        };
        f.write_str(name)
    }
}

/// Kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    Primitive(PrimitiveKind),
    Declared,
    Array,
    Wildcard,
    TypeVariable,
}

/// A declared type as seen by the front end
///
/// `name` is the qualified name and may carry generic arguments, e.g.
/// `java.util.List<java.lang.String>`. The descriptor itself is what gets
/// handed to a [`TypeOracle`](crate::oracle::TypeOracle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    pub fn void() -> Self {
        Self {
            kind: TypeKind::Void,
            name: "void".to_string(),
            component: None,
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            name: kind.to_string(),
            component: None,
        }
    }

    pub fn declared(name: &str) -> Self {
        Self {
            kind: TypeKind::Declared,
            name: name.to_string(),
            component: None,
        }
    }

    pub fn array(component: TypeDescriptor) -> Self {
        Self {
            kind: TypeKind::Array,
            name: format!("{}[]", component.name),
            component: Some(Box::new(component)),
        }
    }

    pub fn type_variable(name: &str) -> Self {
        Self {
            kind: TypeKind::TypeVariable,
            name: name.to_string(),
            component: None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Primitive kind, if this is a primitive type
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Qualified name without generic arguments
    pub fn raw_name(&self) -> &str {
        match self.name.find('<') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        }
    }

    /// Unqualified name, generic arguments kept as written
    pub fn simple_name(&self) -> &str {
        let raw = self.raw_name();
        let start = raw.rfind('.').map_or(0, |idx| idx + 1);
        &self.name[start..]
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// One annotation occurrence on an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationDescriptor {
    /// Qualified annotation type name
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl AnnotationDescriptor {
    pub fn new(ty: &str) -> Self {
        Self {
            ty: ty.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn simple_name(&self) -> &str {
        self.ty.rsplit('.').next().unwrap_or(&self.ty)
    }
}

impl fmt::Display for AnnotationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.simple_name())?;
        if !self.attributes.is_empty() {
            let attrs: Vec<String> = self
                .attributes
                .iter()
                .map(|(k, v)| format!("{} = {}", k, v))
                .collect();
            write!(f, "({})", attrs.join(", "))?;
        }
        Ok(())
    }
}

/// One inspected program element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub kind: ElementKind,

    pub name: String,

    #[serde(default)]
    pub modifiers: ModifierSet,

    #[serde(default)]
    pub annotations: Vec<AnnotationDescriptor>,

    /// Declared type; the return type for methods
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,

    #[serde(default)]
    pub parameters: Vec<ElementDescriptor>,

    #[serde(default)]
    pub thrown: Vec<TypeDescriptor>,
}

impl ElementDescriptor {
    pub fn new(kind: ElementKind, name: &str, ty: TypeDescriptor) -> Self {
        Self {
            kind,
            name: name.to_string(),
            modifiers: ModifierSet::new(),
            annotations: Vec::new(),
            ty,
            parameters: Vec::new(),
            thrown: Vec::new(),
        }
    }

    pub fn method(name: &str, return_type: TypeDescriptor) -> Self {
        Self::new(ElementKind::Method, name, return_type)
    }

    pub fn field(name: &str, ty: TypeDescriptor) -> Self {
        Self::new(ElementKind::Field, name, ty)
    }

    pub fn parameter(name: &str, ty: TypeDescriptor) -> Self {
        Self::new(ElementKind::Parameter, name, ty)
    }

    pub fn with_modifiers<I: IntoIterator<Item = Modifier>>(mut self, modifiers: I) -> Self {
        for modifier in modifiers {
            self.modifiers.insert(modifier);
        }
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationDescriptor) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_parameter(mut self, parameter: ElementDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_thrown(mut self, ty: TypeDescriptor) -> Self {
        self.thrown.push(ty);
        self
    }

    /// Number of occurrences of an annotation type
    pub fn annotation_count(&self, ty: &str) -> usize {
        self.annotations.iter().filter(|a| a.ty == ty).count()
    }

    pub fn has_annotation(&self, ty: &str) -> bool {
        self.annotations.iter().any(|a| a.ty == ty)
    }

    /// Decode a batch of descriptors produced by a front end
    pub fn batch_from_json(json: &str) -> Result<Vec<Self>, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        if !self.modifiers.is_empty() {
            words.push(self.modifiers.to_string());
        }
        words.push(self.ty.to_string());
        if !self.name.is_empty() {
            words.push(self.name.clone());
        }
        f.write_str(&words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_display_is_lowercase_spaced() {
        assert_eq!(ElementKind::AnnotationType.to_string(), "annotation type");
        assert_eq!(ElementKind::EnumConstant.to_string(), "enum constant");
        assert_eq!(ElementKind::Field.to_string(), "field");
    }

    #[test]
    fn test_modifier_set_renders_in_source_order() {
        let set: ModifierSet = [Modifier::Final, Modifier::Static, Modifier::Public]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "public static final");
    }

    #[test]
    fn test_modifier_from_str() {
        assert_eq!("PUBLIC".parse::<Modifier>(), Ok(Modifier::Public));
        assert_eq!("non-sealed".parse::<Modifier>(), Ok(Modifier::NonSealed));
        assert!("bogus".parse::<Modifier>().is_err());
    }

    #[test]
    fn test_type_names() {
        let list = TypeDescriptor::declared("java.util.List<java.lang.String>");
        assert_eq!(list.raw_name(), "java.util.List");
        assert_eq!(list.simple_name(), "List<java.lang.String>");

        let array = TypeDescriptor::array(TypeDescriptor::primitive(PrimitiveKind::Int));
        assert_eq!(array.to_string(), "int[]");
        assert_eq!(TypeDescriptor::declared("java.lang.String").to_string(), "String");
    }

    #[test]
    fn test_annotation_display() {
        let plain = AnnotationDescriptor::new("com.example.Command");
        assert_eq!(plain.to_string(), "@Command");

        let with_attrs = AnnotationDescriptor::new("com.example.Command").with_attribute("name", "\"spawn\"");
        assert_eq!(with_attrs.to_string(), "@Command(name = \"spawn\")");
    }

    #[test]
    fn test_element_display() {
        let field = ElementDescriptor::field("count", TypeDescriptor::primitive(PrimitiveKind::Int))
            .with_modifiers([Modifier::Private, Modifier::Static]);
        assert_eq!(field.to_string(), "private static int count");
    }

    #[test]
    fn test_annotation_count() {
        let element = ElementDescriptor::method("run", TypeDescriptor::void())
            .with_annotation(AnnotationDescriptor::new("a.Tag"))
            .with_annotation(AnnotationDescriptor::new("a.Tag"))
            .with_annotation(AnnotationDescriptor::new("a.Other"));
        assert_eq!(element.annotation_count("a.Tag"), 2);
        assert!(element.has_annotation("a.Other"));
        assert!(!element.has_annotation("a.Missing"));
    }

    #[test]
    fn test_batch_from_json() {
        let json = r#"[
            {
                "kind": "method",
                "name": "spawn",
                "modifiers": ["public", "static"],
                "annotations": [{"type": "com.example.Command"}],
                "type": {"kind": "void", "name": "void"},
                "parameters": [
                    {"kind": "parameter", "name": "who", "type": {"kind": "declared", "name": "java.lang.String"}}
                ],
                "thrown": [{"kind": "declared", "name": "java.io.IOException"}]
            }
        ]"#;

        let elements = ElementDescriptor::batch_from_json(json).unwrap();
        assert_eq!(elements.len(), 1);
        let spawn = &elements[0];
        assert_eq!(spawn.kind, ElementKind::Method);
        assert!(spawn.modifiers.contains(Modifier::Static));
        assert_eq!(spawn.parameters[0].ty.to_string(), "String");
        assert_eq!(spawn.thrown[0].raw_name(), "java.io.IOException");
    }

    #[test]
    fn test_batch_from_json_rejects_garbage() {
        let err = ElementDescriptor::batch_from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
