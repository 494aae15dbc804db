//! Modifier-set matchers

use super::Match;
use crate::descriptor::{ElementDescriptor, Modifier, ModifierSet};

/// Relation between an element's modifiers and a reference set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modifiers {
    /// Any modifiers at all
    #[default]
    Any,
    /// At least one of the reference modifiers (sets are not disjoint)
    AnyOf(ModifierSet),
    /// Exactly the reference modifiers
    Exact(ModifierSet),
    /// Nothing outside the reference modifiers (subset)
    Only(ModifierSet),
    /// None of the reference modifiers (sets are disjoint)
    Except(ModifierSet),
}

impl Modifiers {
    pub const ANY: Modifiers = Modifiers::Any;

    pub fn any_of<I: IntoIterator<Item = Modifier>>(modifiers: I) -> Self {
        Modifiers::AnyOf(Self::collect("any-of", modifiers))
    }

    pub fn exact<I: IntoIterator<Item = Modifier>>(modifiers: I) -> Self {
        Modifiers::Exact(Self::collect("exact", modifiers))
    }

    pub fn only<I: IntoIterator<Item = Modifier>>(modifiers: I) -> Self {
        Modifiers::Only(Self::collect("only", modifiers))
    }

    pub fn except<I: IntoIterator<Item = Modifier>>(modifiers: I) -> Self {
        Modifiers::Except(Self::collect("except", modifiers))
    }

    fn collect<I: IntoIterator<Item = Modifier>>(relation: &str, modifiers: I) -> ModifierSet {
        let set: ModifierSet = modifiers.into_iter().collect();
        if set.is_empty() {
            log::debug!("{} modifier matcher built from an empty set", relation);
        }
        set
    }

    fn list(set: &ModifierSet) -> String {
        let words: Vec<String> = set.iter().map(|m| m.to_string()).collect();
        words.join(", ")
    }
}

impl Match<ModifierSet> for Modifiers {
    fn test(&self, value: &ModifierSet) -> bool {
        match self {
            Modifiers::Any => true,
            Modifiers::AnyOf(set) => !set.is_disjoint(value),
            Modifiers::Exact(set) => set == value,
            Modifiers::Only(set) => value.is_subset(set),
            Modifiers::Except(set) => set.is_disjoint(value),
        }
    }

    fn expected(&self) -> String {
        match self {
            Modifiers::Any => "any modifiers".to_string(),
            Modifiers::AnyOf(set) => format!("any of ({})", Self::list(set)),
            Modifiers::Exact(set) if set.is_empty() => "no modifiers".to_string(),
            Modifiers::Exact(set) => set.to_string(),
            Modifiers::Only(set) => format!("only ({})", Self::list(set)),
            Modifiers::Except(set) => format!("not ({})", Self::list(set)),
        }
    }

    fn describe(&self, value: &ModifierSet) -> String {
        value.to_string()
    }
}

impl Match<ElementDescriptor> for Modifiers {
    fn test(&self, value: &ElementDescriptor) -> bool {
        Match::<ModifierSet>::test(self, &value.modifiers)
    }

    fn expected(&self) -> String {
        Match::<ModifierSet>::expected(self)
    }

    fn describe(&self, value: &ElementDescriptor) -> String {
        Match::<ModifierSet>::describe(self, &value.modifiers)
    }
}
