//! Shape checker
//!
//! Runs a set of [`ShapeRule`]s over a batch of element descriptors and
//! collects a [`Diagnostic`] for every failed rule.

use crate::assertion::{Assertion, ShapeContext};
use crate::config::CheckerConfig;
use crate::descriptor::ElementDescriptor;
use crate::diagnostic::{Diagnostic, Severity};
use crate::matcher::{Match, Names};
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// A shape assertion with the metadata needed to report it
#[derive(Debug)]
pub struct ShapeRule {
    /// Unique rule identifier (e.g., "SHAPE001")
    pub id: String,

    /// Default severity level
    pub severity: Severity,

    /// Detailed description, used as diagnostic help
    pub description: Option<String>,

    pub enabled: bool,

    /// Qualified annotation that selects elements for this rule
    pub trigger: Option<String>,

    /// Restricts the rule to elements with matching names
    pub target: Names,

    assertion: Box<dyn Assertion>,
}

impl ShapeRule {
    pub fn new<A: Assertion + 'static>(id: &str, assertion: A) -> Self {
        Self {
            id: id.to_string(),
            severity: Severity::Warning,
            description: None,
            enabled: true,
            trigger: None,
            target: Names::Any,
            assertion: Box::new(assertion),
        }
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Apply to every element carrying `annotation`, whatever its kind
    ///
    /// Without a trigger the rule applies to elements of the assertion's kind.
    pub fn with_trigger(mut self, annotation: &str) -> Self {
        self.trigger = Some(annotation.to_string());
        self
    }

    pub fn with_target(mut self, names: Names) -> Self {
        self.target = names;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn assertion(&self) -> &dyn Assertion {
        self.assertion.as_ref()
    }

    /// Whether this rule selects `element`
    pub fn applies_to(&self, element: &ElementDescriptor) -> bool {
        let selected = match &self.trigger {
            Some(annotation) => element.has_annotation(annotation),
            None => element.kind == self.assertion.kind(),
        };
        selected && Match::<str>::test(&self.target, &element.name)
    }

    fn help(&self) -> Option<String> {
        if let Some(description) = &self.description {
            return Some(description.clone());
        }
        self.trigger.as_ref().map(|annotation| {
            let simple = annotation.rsplit('.').next().unwrap_or(annotation);
            format!(
                "elements annotated with @{} must be {}",
                simple,
                self.assertion.conditions()
            )
        })
    }
}

/// Result of a check run
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    pub elements_checked: usize,

    /// Diagnostics dropped by `max_diagnostics`
    pub suppressed: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl CheckResult {
    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    fn count(&mut self) {
        self.error_count = 0;
        self.warning_count = 0;
        self.info_count = 0;
        for diag in &self.diagnostics {
            match diag.severity {
                Severity::Error => self.error_count += 1,
                Severity::Warning => self.warning_count += 1,
                Severity::Info => self.info_count += 1,
            }
        }
    }
}

/// Evaluates shape rules over element descriptors
#[derive(Debug, Default)]
pub struct Checker {
    config: CheckerConfig,
    rules: Vec<ShapeRule>,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: ShapeRule) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn add_rule(&mut self, rule: ShapeRule) {
        if self.rules.iter().any(|r| r.id == rule.id) {
            log::warn!("shape rule {} registered twice", rule.id);
        }
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ShapeRule] {
        &self.rules
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a batch of elements
    pub fn check(&self, elements: &[ElementDescriptor]) -> CheckResult {
        let start = Instant::now();
        self.warn_unknown_rules();

        let per_element: Vec<Vec<Diagnostic>> = if self.config.parallel {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    elements
                        .par_iter()
                        .map(|e| self.check_element(e))
                        .collect()
                }),
                Err(err) => {
                    log::warn!("could not build thread pool, checking sequentially: {}", err);
                    elements.iter().map(|e| self.check_element(e)).collect()
                }
            }
        } else {
            elements.iter().map(|e| self.check_element(e)).collect()
        };

        let mut result = CheckResult {
            diagnostics: per_element.into_iter().flatten().collect(),
            elements_checked: elements.len(),
            ..CheckResult::default()
        };

        let limit = self.config.max_diagnostics;
        if limit > 0 && result.diagnostics.len() > limit {
            result.suppressed = result.diagnostics.len() - limit;
            result.diagnostics.truncate(limit);
        }
        result.count();
        result.duration = start.elapsed();

        log::debug!(
            "checked {} elements against {} rules: {} errors, {} warnings, {} info ({} suppressed) in {:?}",
            result.elements_checked,
            self.rules.len(),
            result.error_count,
            result.warning_count,
            result.info_count,
            result.suppressed,
            result.duration
        );
        result
    }

    /// Check one element against every enabled rule that selects it
    pub fn check_element(&self, element: &ElementDescriptor) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if !rule.enabled || !self.config.is_rule_enabled(&rule.id) {
                continue;
            }
            if !rule.applies_to(element) {
                continue;
            }

            let assertion = rule.assertion();
            let mut cx = ShapeContext::new();
            if assertion.test(element, &mut cx) {
                log::trace!("{}: {} passed", rule.id, element.name);
                continue;
            }

            let found = assertion.describe(element, &mut cx);

            let severity = self
                .config
                .severity_override(&rule.id)
                .unwrap_or(rule.severity);
            let message = format!(
                "{}: expected {}, found {}",
                element,
                assertion.condition(),
                found
            );
            let mut diag = Diagnostic::new(&rule.id, severity, &element.name, &message);
            if let Some(help) = rule.help() {
                diag = diag.with_help(&help);
            }
            log::trace!("{}", diag);
            diagnostics.push(diag);
        }

        diagnostics
    }

    fn warn_unknown_rules(&self) {
        let known: HashSet<&str> = self.rules.iter().map(|r| r.id.as_str()).collect();
        for id in self.config.mentioned_rules() {
            if !known.contains(id) {
                log::warn!("configuration names unknown shape rule {}", id);
            }
        }
    }
}
