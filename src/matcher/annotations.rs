//! Annotation-presence matchers

use super::Match;
use crate::descriptor::{AnnotationDescriptor, ElementDescriptor};
use std::collections::BTreeMap;

/// Annotation presence, by qualified annotation type name
///
/// Required types form a multiset: listing a type twice requires two
/// occurrences of that (repeatable) annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Annotations {
    #[default]
    Any,
    /// All listed annotation types are present
    Present(Vec<String>),
    /// None of the listed annotation types are present
    Absent(Vec<String>),
}

impl Annotations {
    pub const ANY: Annotations = Annotations::Any;

    pub fn present(types: &[&str]) -> Self {
        if types.is_empty() {
            log::debug!("annotation matcher built from an empty type list");
        }
        Annotations::Present(types.iter().map(|t| t.to_string()).collect())
    }

    pub fn absent(types: &[&str]) -> Self {
        if types.is_empty() {
            log::debug!("annotation matcher built from an empty type list");
        }
        Annotations::Absent(types.iter().map(|t| t.to_string()).collect())
    }

    fn required(types: &[String]) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for ty in types {
            *counts.entry(ty.as_str()).or_insert(0) += 1;
        }
        counts
    }

    fn simple(ty: &str) -> &str {
        ty.rsplit('.').next().unwrap_or(ty)
    }

    fn list(types: &[String]) -> String {
        let names: Vec<String> = types.iter().map(|t| format!("@{}", Self::simple(t))).collect();
        names.join(" ")
    }
}

impl Match<[AnnotationDescriptor]> for Annotations {
    fn test(&self, value: &[AnnotationDescriptor]) -> bool {
        match self {
            Annotations::Any => true,
            Annotations::Present(types) => Self::required(types).into_iter().all(|(ty, needed)| {
                value.iter().filter(|a| a.ty == ty).count() >= needed
            }),
            Annotations::Absent(types) => !value.iter().any(|a| types.contains(&a.ty)),
        }
    }

    fn expected(&self) -> String {
        match self {
            Annotations::Any => "any annotations".to_string(),
            Annotations::Present(types) => Self::list(types),
            Annotations::Absent(types) => format!("without {}", Self::list(types)),
        }
    }

    fn describe(&self, value: &[AnnotationDescriptor]) -> String {
        let rendered: Vec<String> = value.iter().map(|a| a.to_string()).collect();
        rendered.join(" ")
    }
}

impl Match<ElementDescriptor> for Annotations {
    fn test(&self, value: &ElementDescriptor) -> bool {
        Match::<[AnnotationDescriptor]>::test(self, &value.annotations)
    }

    fn expected(&self) -> String {
        Match::<[AnnotationDescriptor]>::expected(self)
    }

    fn describe(&self, value: &ElementDescriptor) -> String {
        Match::<[AnnotationDescriptor]>::describe(self, &value.annotations)
    }
}
