//! Validation Engine
//!
//! Composable, named predicates over string input. A [`RuleSet`] evaluates
//! its rules sequentially in either [`Mode::All`] or [`Mode::Any`] and
//! short-circuits as soon as the outcome is known.
//!
//! ## Examples
//! ```rust
//! use kernel::validation::{Mode, RuleSet, rules::LengthRule};
//!
//! let rules = RuleSet::new(Mode::All).with(LengthRule::new("username", 3, 35));
//! assert!(rules.is_valid("alice"));
//! assert!(rules.validate("al").is_err());
//! ```

pub mod rules;

use std::fmt;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a single rule, carrying its human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    rule: String,
    message: String,
}

impl ValidationError {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Name of the rule that produced this error
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Rule trait
// ============================================================================

/// A named, deterministic predicate over a string value
///
/// `check` must not have side effects: the same input always produces the
/// same outcome.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier used in error reports and logs
    fn name(&self) -> &str;

    /// Returns `Err` with a human-readable message when `value` violates the rule
    fn check(&self, value: &str) -> Result<(), ValidationError>;
}

/// Combination mode of a [`RuleSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every rule must pass; stops at the first failure
    #[default]
    All,
    /// At least one rule must pass; stops at the first success
    Any,
}

// ============================================================================
// RuleSet
// ============================================================================

/// Ordered collection of rules evaluated under a [`Mode`]
pub struct RuleSet {
    rules: Vec<Box<dyn ValidationRule>>,
    mode: Mode,
}

impl RuleSet {
    pub fn new(mode: Mode) -> Self {
        Self {
            rules: Vec::new(),
            mode,
        }
    }

    /// Append a rule (builder style)
    pub fn with(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Evaluate `value` against the rules.
    ///
    /// With `raise_on_failure` a failing outcome is returned as `Err`:
    /// in `All` mode it carries the first failing rule's message, in `Any` mode
    /// the message of the last rule attempted. Otherwise the outcome is
    /// reported as `Ok(bool)` only. An empty set always passes.
    pub fn evaluate(&self, value: &str, raise_on_failure: bool) -> Result<bool, ValidationError> {
        let mut last_failure = None;

        for rule in &self.rules {
            match (self.mode, rule.check(value)) {
                (Mode::All, Ok(())) => {}
                (Mode::All, Err(err)) => {
                    return if raise_on_failure { Err(err) } else { Ok(false) };
                }
                (Mode::Any, Ok(())) => return Ok(true),
                (Mode::Any, Err(err)) => last_failure = Some(err),
            }
        }

        match last_failure {
            Some(err) if raise_on_failure => Err(err),
            Some(_) => Ok(false),
            None => Ok(true),
        }
    }

    /// Raise on failure
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        self.evaluate(value, true).map(|_| ())
    }

    /// Boolean outcome, never raises
    pub fn is_valid(&self, value: &str) -> bool {
        self.evaluate(value, false).unwrap_or(false)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(Mode::All)
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("RuleSet")
            .field("mode", &self.mode)
            .field("rules", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Rule with a fixed outcome that counts its invocations
    struct Fixed {
        name: &'static str,
        pass: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(name: &'static str, pass: bool) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    pass,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl ValidationRule for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn check(&self, _value: &str) -> Result<(), ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.pass {
                Ok(())
            } else {
                Err(ValidationError::new(self.name, format!("{} failed", self.name)))
            }
        }
    }

    #[test]
    fn test_empty_set_passes_in_both_modes() {
        assert_eq!(RuleSet::new(Mode::All).evaluate("x", true), Ok(true));
        assert_eq!(RuleSet::new(Mode::Any).evaluate("x", true), Ok(true));
    }

    #[test]
    fn test_all_mode_stops_at_first_failure() {
        let (r1, c1) = Fixed::new("r1", false);
        let (r2, c2) = Fixed::new("r2", true);
        let set = RuleSet::new(Mode::All).with(r1).with(r2);

        assert_eq!(set.evaluate("x", false), Ok(false));
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_mode_reports_first_failing_message() {
        let (r1, _) = Fixed::new("r1", true);
        let (r2, _) = Fixed::new("r2", false);
        let (r3, c3) = Fixed::new("r3", false);
        let set = RuleSet::new(Mode::All).with(r1).with(r2).with(r3);

        let err = set.validate("x").unwrap_err();
        assert_eq!(err.rule(), "r2");
        assert_eq!(err.message(), "r2 failed");
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_any_mode_stops_at_first_success() {
        let (r1, c1) = Fixed::new("r1", false);
        let (r2, c2) = Fixed::new("r2", true);
        let (r3, c3) = Fixed::new("r3", false);
        let set = RuleSet::new(Mode::Any).with(r1).with(r2).with(r3);

        assert_eq!(set.evaluate("x", true), Ok(true));
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_any_mode_reports_last_attempted_message() {
        let (r1, _) = Fixed::new("r1", false);
        let (r2, _) = Fixed::new("r2", false);
        let set = RuleSet::new(Mode::Any).with(r1).with(r2);

        let err = set.validate("x").unwrap_err();
        assert_eq!(err.rule(), "r2");
        assert!(!set.is_valid("x"));
    }

    #[test]
    fn test_non_raising_never_errors() {
        let (r1, _) = Fixed::new("r1", false);
        let set = RuleSet::new(Mode::All).with(r1);
        assert_eq!(set.evaluate("x", false), Ok(false));
    }

    #[test]
    fn test_debug_lists_rule_names() {
        let (r1, _) = Fixed::new("length", true);
        let set = RuleSet::new(Mode::All).with(r1);
        assert!(format!("{:?}", set).contains("length"));
    }
}
