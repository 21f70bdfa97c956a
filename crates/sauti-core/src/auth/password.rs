//! Password policy for the change-password flow.

use crate::error::{Error, Result};

/// Characters a password may contain at all.
const ALLOWED_PUNCTUATION: &str = "!@#$%^&*()_+{}[]:;<>,.?/~-=|\\";

/// The special characters that satisfy the composite rule. Deliberately a
/// subset of [`ALLOWED_PUNCTUATION`].
const REQUIRED_SPECIALS: &str = "@$!%*?&";

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 16;

/// Validate a candidate new password.
///
/// The password must be 8-16 characters from the allowed symbol set, and the
/// composite rule additionally requires an upper-case letter, a lower-case
/// letter, a digit, and one of `@$!%*?&`, with every character drawn from
/// letters, digits, and that special set.
pub fn validate_new_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(Error::Validation(format!(
            "New password must be between {MIN_LEN} and {MAX_LEN} characters long."
        )));
    }

    if password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !ALLOWED_PUNCTUATION.contains(c))
    {
        return Err(Error::Validation(
            "New password contains characters that are not allowed.".to_string(),
        ));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;
    let mut composite_charset = true;

    for c in password.chars() {
        has_upper |= c.is_ascii_uppercase();
        has_lower |= c.is_ascii_lowercase();
        has_digit |= c.is_ascii_digit();
        has_special |= REQUIRED_SPECIALS.contains(c);
        composite_charset &= c.is_ascii_alphanumeric() || REQUIRED_SPECIALS.contains(c);
    }

    if !(has_upper && has_lower && has_digit && has_special && composite_charset) {
        return Err(Error::Validation(
            "New password must contain at least one uppercase letter, one lowercase letter, \
             one digit, and one special character."
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_compliant_password() {
        assert!(validate_new_password("Abc123!x").is_ok());
        assert!(validate_new_password("Zz9@zz9@zz9@zz9@").is_ok());
    }

    #[test]
    fn rejects_missing_special_character() {
        let err = validate_new_password("Abc12345").unwrap_err();
        assert!(err.to_string().contains("special character"));
    }

    #[test]
    fn rejects_missing_character_classes() {
        assert!(validate_new_password("abc123!x").is_err()); // no upper
        assert!(validate_new_password("ABC123!X").is_err()); // no lower
        assert!(validate_new_password("Abcdefg!").is_err()); // no digit
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(validate_new_password("Ab1!xyz").is_err()); // 7 chars
        assert!(validate_new_password("Ab1!Ab1!Ab1!Ab1!x").is_err()); // 17 chars
    }

    #[test]
    fn rejects_characters_outside_the_allowed_set() {
        let err = validate_new_password("Abc 123!").unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn allowed_punctuation_outside_the_special_set_fails_the_composite_rule() {
        // '#' passes the broad allowed set but falls outside the composite
        // character set.
        let err = validate_new_password("Abc123#x").unwrap_err();
        assert!(err.to_string().contains("special character"));
    }
}
