//! Type-relation matchers
//!
//! Every relation except primitive-kind equality is one call into the
//! [`TypeOracle`] captured when the matcher was built.

use super::Match;
use crate::descriptor::{ElementDescriptor, PrimitiveKind, TypeDescriptor};
use crate::oracle::TypeOracle;
use std::sync::Arc;

/// Relation between a declared type and a reference type
#[derive(Debug, Clone, Default)]
pub enum Types {
    #[default]
    Any,
    Same(TypeDescriptor, Arc<dyn TypeOracle>),
    Subtype(TypeDescriptor, Arc<dyn TypeOracle>),
    Supertype(TypeDescriptor, Arc<dyn TypeOracle>),
    Assignable(TypeDescriptor, Arc<dyn TypeOracle>),
    Primitive(PrimitiveKind),
}

impl Types {
    pub const ANY: Types = Types::Any;
}

/// Builds type matchers bound to one oracle
#[derive(Debug, Clone)]
pub struct TypeMatches {
    oracle: Arc<dyn TypeOracle>,
}

impl TypeMatches {
    pub fn new<O: TypeOracle + 'static>(oracle: O) -> Self {
        Self {
            oracle: Arc::new(oracle),
        }
    }

    /// Exactly the given type
    pub fn is(&self, ty: TypeDescriptor) -> Types {
        Types::Same(ty, Arc::clone(&self.oracle))
    }

    /// The given type or one of its subtypes
    pub fn subtype_of(&self, ty: TypeDescriptor) -> Types {
        Types::Subtype(ty, Arc::clone(&self.oracle))
    }

    /// The given type or one of its supertypes
    pub fn supertype_of(&self, ty: TypeDescriptor) -> Types {
        Types::Supertype(ty, Arc::clone(&self.oracle))
    }

    pub fn assignable_to(&self, ty: TypeDescriptor) -> Types {
        Types::Assignable(ty, Arc::clone(&self.oracle))
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> Types {
        Types::Primitive(kind)
    }
}

impl Match<TypeDescriptor> for Types {
    fn test(&self, value: &TypeDescriptor) -> bool {
        match self {
            Types::Any => true,
            Types::Same(ty, oracle) => oracle.is_same_type(value, ty),
            Types::Subtype(ty, oracle) => oracle.is_subtype(value, ty),
            Types::Supertype(ty, oracle) => oracle.is_subtype(ty, value),
            Types::Assignable(ty, oracle) => oracle.is_assignable(value, ty),
            Types::Primitive(kind) => value.primitive_kind() == Some(*kind),
        }
    }

    fn expected(&self) -> String {
        match self {
            Types::Any => "any type".to_string(),
            Types::Same(ty, _) => ty.to_string(),
            Types::Subtype(ty, _) => format!("subtype of {}", ty),
            Types::Supertype(ty, _) => format!("supertype of {}", ty),
            Types::Assignable(ty, _) => format!("assignable to {}", ty),
            Types::Primitive(kind) => kind.to_string(),
        }
    }

    fn describe(&self, value: &TypeDescriptor) -> String {
        value.to_string()
    }
}

impl Match<ElementDescriptor> for Types {
    fn test(&self, value: &ElementDescriptor) -> bool {
        Match::<TypeDescriptor>::test(self, &value.ty)
    }

    fn expected(&self) -> String {
        Match::<TypeDescriptor>::expected(self)
    }

    fn describe(&self, value: &ElementDescriptor) -> String {
        Match::<TypeDescriptor>::describe(self, &value.ty)
    }
}
