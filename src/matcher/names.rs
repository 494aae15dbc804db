//! Element-name matchers

use super::Match;
use crate::descriptor::ElementDescriptor;
use regex::Regex;
use thiserror::Error;

/// Error building a name pattern
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid name pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Simple-name matcher
#[derive(Debug, Clone, Default)]
pub enum Names {
    #[default]
    Any,
    Exactly(String),
    /// Whole-name regular expression
    Pattern(Regex),
}

impl Names {
    pub fn exactly(name: &str) -> Self {
        Names::Exactly(name.to_string())
    }

    /// Compile a pattern that must match the whole name
    pub fn pattern(pattern: &str) -> Result<Self, PatternError> {
        let anchored = format!("^(?:{})$", pattern);
        Regex::new(&anchored)
            .map(Names::Pattern)
            .map_err(|source| PatternError::Regex {
                pattern: pattern.to_string(),
                source,
            })
    }
}

impl Match<str> for Names {
    fn test(&self, value: &str) -> bool {
        match self {
            Names::Any => true,
            Names::Exactly(name) => name == value,
            Names::Pattern(regex) => regex.is_match(value),
        }
    }

    fn expected(&self) -> String {
        match self {
            Names::Any => "any name".to_string(),
            Names::Exactly(name) => format!("named {}", name),
            Names::Pattern(regex) => {
                let source = regex.as_str();
                let inner = source
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(source);
                format!("named like /{}/", inner)
            }
        }
    }

    fn describe(&self, value: &str) -> String {
        value.to_string()
    }
}

impl Match<ElementDescriptor> for Names {
    fn test(&self, value: &ElementDescriptor) -> bool {
        Match::<str>::test(self, &value.name)
    }

    fn expected(&self) -> String {
        Match::<str>::expected(self)
    }

    fn describe(&self, value: &ElementDescriptor) -> String {
        Match::<str>::describe(self, &value.name)
    }
}
