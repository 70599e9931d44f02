// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Classification of backend faults into permanent and transient ones.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// A structured error returned by the backend for a single mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Classification code, e.g. a `PostgreSQL` SQLSTATE such as `23505`.
    pub code: String,
    /// Human readable message.
    pub message: String,
}

impl Fault {
    /// Creates a new fault.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Whether retrying a faulted mutation can ever succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// Retrying will never succeed: bad data, constraint violation, access denied.
    Permanent,
    /// Retrying may succeed: network failure, temporary server error.
    Transient,
}

/// Codes treated as permanent out of the box, checked in this order.
///
/// - Class 22: data exception (type or format mismatch).
/// - Class 23: integrity constraint violation (not-null, foreign key, unique).
/// - 42501: insufficient privilege, which includes row-level security denials.
pub const DEFAULT_PERMANENT_CODES: &[&str] = &[r"^22...$", r"^23...$", r"^42501$"];

/// A pattern over fault codes and the class it assigns.
#[derive(Debug, Clone)]
pub struct FaultRule {
    pattern: Regex,
    class: FaultClass,
}

impl FaultRule {
    /// Creates a rule from a regular expression over fault codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn new(pattern: &str, class: FaultClass) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            class,
        })
    }

    /// The class assigned by this rule.
    pub fn class(&self) -> FaultClass {
        self.class
    }

    /// The pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the rule applies to the code.
    pub fn matches(&self, code: &str) -> bool {
        self.pattern.is_match(code)
    }
}

/// Ordered list of rules, evaluated top to bottom; the first match wins.
///
/// A code no rule matches is transient, so unknown failures never lose data.
#[derive(Debug, Clone)]
pub struct FaultClassifier {
    rules: Vec<FaultRule>,
}

impl FaultClassifier {
    /// Creates a classifier from an explicit rule list.
    pub fn new(rules: Vec<FaultRule>) -> Self {
        Self { rules }
    }

    /// Creates the default classifier with extra permanent patterns checked first.
    ///
    /// # Errors
    ///
    /// Returns an error if any extra pattern is not a valid regular expression.
    pub fn with_permanent_codes<S: AsRef<str>>(extra: &[S]) -> Result<Self, regex::Error> {
        let mut rules = extra
            .iter()
            .map(|p| FaultRule::new(p.as_ref(), FaultClass::Permanent))
            .collect::<Result<Vec<_>, _>>()?;
        rules.extend(default_rules().iter().cloned());
        Ok(Self { rules })
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[FaultRule] {
        &self.rules
    }

    /// Classifies a fault by its code.
    pub fn classify(&self, fault: &Fault) -> FaultClass {
        self.classify_code(&fault.code)
    }

    /// Classifies a bare fault code.
    pub fn classify_code(&self, code: &str) -> FaultClass {
        self.rules
            .iter()
            .find(|rule| rule.matches(code))
            .map_or(FaultClass::Transient, FaultRule::class)
    }
}

impl Default for FaultClassifier {
    fn default() -> Self {
        Self::new(default_rules().to_vec())
    }
}

fn default_rules() -> &'static [FaultRule] {
    static RULES: OnceLock<Vec<FaultRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        DEFAULT_PERMANENT_CODES
            .iter()
            .map(|p| FaultRule::new(p, FaultClass::Permanent).unwrap())
            .collect()
    })
}
