//! Credential Policy
//!
//! Rule sets applied to usernames and passwords before anything is persisted.

use kernel::validation::{
    Mode, RuleSet,
    rules::{
        ASCII_LOWERCASE, ASCII_UPPERCASE, CharacterGroup, CharacterSetRule, DIGITS, LengthRule,
        RequiredGroupsRule, printable_ascii,
    },
};

/// Length, then ASCII letters/digits plus `allowed_special`
pub fn username_rules(min: usize, max: usize, allowed_special: &str) -> RuleSet {
    let allowed = [ASCII_LOWERCASE, ASCII_UPPERCASE, DIGITS, allowed_special].concat();
    RuleSet::new(Mode::All)
        .with(LengthRule::new("username", min, max))
        .with(CharacterSetRule::new("username", allowed))
}

/// Length, printable ASCII, then one lowercase, one uppercase and one digit
pub fn password_rules(min: usize, max: usize) -> RuleSet {
    RuleSet::new(Mode::All)
        .with(LengthRule::new("password", min, max))
        .with(CharacterSetRule::new("password", printable_ascii()))
        .with(RequiredGroupsRule::new(
            "password",
            vec![
                CharacterGroup::lowercase(),
                CharacterGroup::uppercase(),
                CharacterGroup::digits(),
            ],
        ))
}

/// Both rule sets, built once at startup
#[derive(Debug)]
pub struct CredentialPolicy {
    pub username: RuleSet,
    pub password: RuleSet,
}

impl CredentialPolicy {
    pub fn new(username: RuleSet, password: RuleSet) -> Self {
        Self { username, password }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rules() {
        let rules = password_rules(8, 128);
        assert!(rules.is_valid("Secret123"));
        assert_eq!(
            rules.validate("Sec1").unwrap_err().message(),
            "Make sure that password length is not less than 8."
        );
        assert_eq!(
            rules.validate("секрет123Ab").unwrap_err().rule(),
            CharacterSetRule::NAME
        );
        assert_eq!(
            rules.validate("secret1234").unwrap_err().rule(),
            RequiredGroupsRule::NAME
        );
    }

    #[test]
    fn test_password_rule_order() {
        // Too short and missing groups: length is reported first
        let rules = password_rules(8, 128);
        assert_eq!(rules.validate("abc").unwrap_err().rule(), LengthRule::NAME);
    }

    #[test]
    fn test_username_rules() {
        let rules = username_rules(3, 35, "_");
        assert!(rules.is_valid("alice_01"));
        assert!(!rules.is_valid("alice-01"));
    }
}
