//! Built-in validation rules
//!
//! Every rule is parameterised by a `subject` ("username", "password") that
//! appears in its failure message.

use super::{ValidationError, ValidationRule};

/// `a-z`
pub const ASCII_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
/// `A-Z`
pub const ASCII_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// `0-9`
pub const DIGITS: &str = "0123456789";
/// ASCII punctuation characters
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
/// ASCII whitespace accepted in printable text
pub const WHITESPACE: &str = " \t\n\r\x0b\x0c";

/// Letters, digits, punctuation and whitespace
pub fn printable_ascii() -> String {
    [ASCII_LOWERCASE, ASCII_UPPERCASE, DIGITS, PUNCTUATION, WHITESPACE].concat()
}

fn capitalize(subject: &str) -> String {
    let mut chars = subject.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Length
// ============================================================================

/// Inclusive bounds on the number of characters (Unicode scalar values)
#[derive(Debug, Clone)]
pub struct LengthRule {
    subject: String,
    min: usize,
    max: usize,
}

impl LengthRule {
    pub const NAME: &'static str = "length";

    pub fn new(subject: impl Into<String>, min: usize, max: usize) -> Self {
        Self {
            subject: subject.into(),
            min,
            max,
        }
    }
}

impl ValidationRule for LengthRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len < self.min {
            return Err(ValidationError::new(
                Self::NAME,
                format!(
                    "Make sure that {} length is not less than {}.",
                    self.subject, self.min
                ),
            ));
        }
        if len > self.max {
            return Err(ValidationError::new(
                Self::NAME,
                format!(
                    "Make sure that {} length is not greater than {}.",
                    self.subject, self.max
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Character set
// ============================================================================

/// Every character of the value must belong to the allow-list
#[derive(Debug, Clone)]
pub struct CharacterSetRule {
    subject: String,
    allowed: String,
}

impl CharacterSetRule {
    pub const NAME: &'static str = "character_set";

    pub fn new(subject: impl Into<String>, allowed: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            allowed: allowed.into(),
        }
    }
}

impl ValidationRule for CharacterSetRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        let mut invalid: Vec<char> = Vec::new();
        for ch in value.chars() {
            if !self.allowed.contains(ch) && !invalid.contains(&ch) {
                invalid.push(ch);
            }
        }

        if invalid.is_empty() {
            return Ok(());
        }

        let listed: Vec<String> = invalid.iter().map(|c| c.escape_debug().to_string()).collect();
        Err(ValidationError::new(
            Self::NAME,
            format!("Invalid characters in {}: {}.", self.subject, listed.join(", ")),
        ))
    }
}

// ============================================================================
// Required groups
// ============================================================================

/// Named set of characters of which at least one must be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterGroup {
    pub name: String,
    pub characters: String,
    pub description: String,
}

impl CharacterGroup {
    pub fn new(
        name: impl Into<String>,
        characters: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            characters: characters.into(),
            description: description.into(),
        }
    }

    pub fn lowercase() -> Self {
        Self::new("lowercase", ASCII_LOWERCASE, "- Lowercase letters")
    }

    pub fn uppercase() -> Self {
        Self::new("uppercase", ASCII_UPPERCASE, "- Uppercase letters")
    }

    pub fn digits() -> Self {
        Self::new("digits", DIGITS, "- Digits")
    }
}

/// The value must contain at least one character from each group
#[derive(Debug, Clone)]
pub struct RequiredGroupsRule {
    subject: String,
    groups: Vec<CharacterGroup>,
}

impl RequiredGroupsRule {
    pub const NAME: &'static str = "required_groups";

    pub fn new(subject: impl Into<String>, groups: Vec<CharacterGroup>) -> Self {
        Self {
            subject: subject.into(),
            groups,
        }
    }
}

impl ValidationRule for RequiredGroupsRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check(&self, value: &str) -> Result<(), ValidationError> {
        let missing: Vec<&str> = self
            .groups
            .iter()
            .filter(|group| !value.chars().any(|ch| group.characters.contains(ch)))
            .map(|group| group.description.as_str())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(ValidationError::new(
            Self::NAME,
            format!(
                "{} must contain at least one character from each of the following groups:\n{}",
                capitalize(&self.subject),
                missing.join("\n")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Mode, RuleSet};

    #[test]
    fn test_length_bounds_are_inclusive() {
        let rule = LengthRule::new("username", 3, 5);
        assert!(rule.check("abc").is_ok());
        assert!(rule.check("abcde").is_ok());
        assert!(rule.check("ab").is_err());
        assert!(rule.check("abcdef").is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = LengthRule::new("username", 3, 3);
        assert!(rule.check("äöü").is_ok());
    }

    #[test]
    fn test_length_messages() {
        let rule = LengthRule::new("password", 8, 10);
        assert_eq!(
            rule.check("short").unwrap_err().message(),
            "Make sure that password length is not less than 8."
        );
        assert_eq!(
            rule.check("much too long").unwrap_err().message(),
            "Make sure that password length is not greater than 10."
        );
    }

    #[test]
    fn test_character_set_lists_distinct_invalid_in_order() {
        let rule = CharacterSetRule::new("username", ASCII_LOWERCASE);
        let err = rule.check("a!b?c!").unwrap_err();
        assert_eq!(err.message(), "Invalid characters in username: !, ?.");
        assert_eq!(err.rule(), CharacterSetRule::NAME);
    }

    #[test]
    fn test_character_set_accepts_allowed() {
        let rule = CharacterSetRule::new("password", printable_ascii());
        assert!(rule.check("Abc def!\t123").is_ok());
        assert!(rule.check("пароль").is_err());
    }

    #[test]
    fn test_required_groups_reports_all_missing() {
        let rule = RequiredGroupsRule::new(
            "password",
            vec![
                CharacterGroup::lowercase(),
                CharacterGroup::uppercase(),
                CharacterGroup::digits(),
            ],
        );
        let err = rule.check("abc").unwrap_err();
        assert_eq!(
            err.message(),
            "Password must contain at least one character from each of the following groups:\n- Uppercase letters\n- Digits"
        );
    }

    #[test]
    fn test_required_groups_single_missing() {
        let rule = RequiredGroupsRule::new(
            "password",
            vec![
                CharacterGroup::lowercase(),
                CharacterGroup::uppercase(),
                CharacterGroup::digits(),
            ],
        );
        assert!(rule.check("A1").is_err());
        assert!(rule.check("a1").is_err());
        assert!(rule.check("Aa").is_err());
        assert!(rule.check("Aa1").is_ok());
    }

    #[test]
    fn test_rule_set_with_builtins() {
        let set = RuleSet::new(Mode::All)
            .with(LengthRule::new("username", 3, 35))
            .with(CharacterSetRule::new(
                "username",
                [ASCII_LOWERCASE, ASCII_UPPERCASE, DIGITS, "_"].concat(),
            ));

        assert!(set.is_valid("Alice_01"));
        let err = set.validate("al").unwrap_err();
        assert_eq!(err.rule(), LengthRule::NAME);
        let err = set.validate("alice smith").unwrap_err();
        assert_eq!(err.message(), "Invalid characters in username:  .");
    }
}
