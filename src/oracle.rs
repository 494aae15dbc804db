//! Type-relation oracle
//!
//! Type matchers never reason about subtyping themselves. Every identity,
//! subtype or assignability question is one call into a [`TypeOracle`]
//! supplied by the front end (usually backed by the compiler's own type
//! utilities). [`NominalOracle`] is a small table-driven implementation for
//! front ends without one, and for tests.

use crate::descriptor::{PrimitiveKind, TypeDescriptor, TypeKind};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

const OBJECT: &str = "java.lang.Object";

/// Answers type identity and subtype queries
pub trait TypeOracle: Send + Sync + fmt::Debug {
    /// Both descriptors denote the same type
    fn is_same_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool;

    /// `sub` is a (reflexive) subtype of `sup`
    fn is_subtype(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool;

    /// A value of type `from` can be assigned to a variable of type `to`
    fn is_assignable(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool;

    /// The erasure of `ty`
    fn erasure(&self, ty: &TypeDescriptor) -> TypeDescriptor;
}

/// Oracle driven by an explicit table of direct supertypes
///
/// Declared types are compared by erased name. Every declared and array type
/// is a subtype of `java.lang.Object`; primitives follow widening conversions
/// and assignability additionally allows boxing and unboxing.
#[derive(Debug, Clone, Default)]
pub struct NominalOracle {
    supertypes: HashMap<String, Vec<String>>,
}

impl NominalOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `sup` as a direct supertype of `sub` (erased names)
    pub fn with_supertype(mut self, sub: &str, sup: &str) -> Self {
        self.declare(sub, sup);
        self
    }

    pub fn declare(&mut self, sub: &str, sup: &str) {
        self.supertypes
            .entry(sub.to_string())
            .or_default()
            .push(sup.to_string());
    }

    fn declared_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == OBJECT {
            return true;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for parent in self.supertypes.get(current).into_iter().flatten() {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent.as_str());
            }
        }
        false
    }

    fn primitive_widens(from: PrimitiveKind, to: PrimitiveKind) -> bool {
        if from == to {
            return true;
        }
        from.widens_to()
            .iter()
            .any(|&next| Self::primitive_widens(next, to))
    }
}

impl TypeOracle for NominalOracle {
    fn is_same_type(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
        if a.kind != b.kind {
            return false;
        }
        match (&a.component, &b.component) {
            (Some(ca), Some(cb)) => self.is_same_type(ca, cb),
            (None, None) => a.name == b.name,
            _ => false,
        }
    }

    fn is_subtype(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        match (sub.kind, sup.kind) {
            (TypeKind::Primitive(from), TypeKind::Primitive(to)) => {
                Self::primitive_widens(from, to)
            }
            (TypeKind::Array, TypeKind::Array) => match (&sub.component, &sup.component) {
                (Some(cs), Some(cp)) if cs.is_primitive() || cp.is_primitive() => {
                    self.is_same_type(cs, cp)
                }
                (Some(cs), Some(cp)) => self.is_subtype(cs, cp),
                _ => false,
            },
            (TypeKind::Array, TypeKind::Declared) => sup.raw_name() == OBJECT,
            (TypeKind::Declared | TypeKind::TypeVariable, TypeKind::Declared) => {
                self.declared_subtype(sub.raw_name(), sup.raw_name())
            }
            (TypeKind::Void, TypeKind::Void) => true,
            _ => self.is_same_type(sub, sup),
        }
    }

    fn is_assignable(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> bool {
        if self.is_subtype(from, to) {
            return true;
        }
        match (from.kind, to.kind) {
            // boxing, then widening reference conversion
            (TypeKind::Primitive(kind), TypeKind::Declared) => {
                self.declared_subtype(kind.boxed_name(), to.raw_name())
            }
            // unboxing, then widening primitive conversion
            (TypeKind::Declared, TypeKind::Primitive(target)) => [
                PrimitiveKind::Boolean,
                PrimitiveKind::Byte,
                PrimitiveKind::Short,
                PrimitiveKind::Char,
                PrimitiveKind::Int,
                PrimitiveKind::Long,
                PrimitiveKind::Float,
                PrimitiveKind::Double,
            ]
            .into_iter()
            .find(|kind| kind.boxed_name() == from.raw_name())
            .is_some_and(|kind| Self::primitive_widens(kind, target)),
            _ => false,
        }
    }

    fn erasure(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        match ty.kind {
            TypeKind::Declared => TypeDescriptor::declared(ty.raw_name()),
            TypeKind::TypeVariable | TypeKind::Wildcard => TypeDescriptor::declared(OBJECT),
            TypeKind::Array => match &ty.component {
                Some(component) => TypeDescriptor::array(self.erasure(component)),
                None => ty.clone(),
            },
            TypeKind::Void | TypeKind::Primitive(_) => ty.clone(),
        }
    }
}
