use std::sync::LazyLock;

use regex::Regex;

use crate::error::StreamkinError;

// 4-25 characters, alphanumeric plus underscore, no leading underscore.
static LOGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_]{3,24}$").unwrap());

/// Validate a channel login before any remote work happens.
///
/// Whitespace is stripped first so "Bob Ross" still resolves as a search for
/// "BobRoss". Returns the cleaned login, or a validation error describing the
/// allowed shape.
pub fn validate_login(raw: &str) -> Result<String, StreamkinError> {
    if raw.trim().is_empty() {
        return Err(StreamkinError::Validation(
            "provided channel name was empty".to_string(),
        ));
    }

    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if !LOGIN_RE.is_match(&cleaned) {
        return Err(StreamkinError::Validation(format!(
            "\"{cleaned}\" is not a valid login: logins are 4-25 alphanumeric \
             characters (underscore allowed, but not leading)"
        )));
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_logins() {
        assert_eq!(validate_login("emilybarkiss").unwrap(), "emilybarkiss");
        assert_eq!(validate_login("funfps").unwrap(), "funfps");
        assert_eq!(validate_login("user_42").unwrap(), "user_42");
    }

    #[test]
    fn strips_interior_whitespace() {
        assert_eq!(validate_login("Bob Ross").unwrap(), "BobRoss");
        assert_eq!(validate_login("  funfps\t").unwrap(), "funfps");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(validate_login("").is_err());
        assert!(validate_login("   ").is_err());
    }

    #[test]
    fn rejects_bad_shapes() {
        // too short
        assert!(validate_login("abc").is_err());
        // leading underscore
        assert!(validate_login("_user").is_err());
        // over 25 chars
        assert!(validate_login(&"a".repeat(26)).is_err());
        // disallowed characters
        assert!(validate_login("na//me!").is_err());
    }
}
