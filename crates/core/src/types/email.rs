//! Email address type used as the marketplace login handle.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing but whitespace was entered.
    #[error("email cannot be empty")]
    Empty,
    /// The input is longer than an SMTP path allows.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input has no `@` or more than one.
    #[error("email must contain exactly one @ symbol")]
    BadAtSymbol,
    /// Whitespace inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The mailbox part (before `@`) is empty.
    #[error("email mailbox cannot be empty")]
    EmptyMailbox,
    /// The domain part (after `@`) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
}

/// An email address, stored exactly as the shopper typed it (minus
/// surrounding whitespace).
///
/// The login screen performs no credential check, so the email doubles as the
/// display name on reviews and in the admin user table.
///
/// ```
/// use blife_core::Email;
///
/// assert!(Email::parse("  customer@example.com ").is_ok());
/// assert!(Email::parse("seller@@example.com").is_err());
/// assert!(Email::parse("no spaces@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from form input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first rule the input breaks.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (mailbox, domain) = s.split_once('@').ok_or(EmailError::BadAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::BadAtSymbol);
        }
        if mailbox.is_empty() {
            return Err(EmailError::EmptyMailbox);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The part before the `@`.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        self.0.split_once('@').map_or("", |(m, _)| m)
    }

    /// The part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, d)| d)
    }

    /// Case-insensitive substring match, used by the admin search boxes.
    #[must_use]
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marketplace_accounts() {
        assert!(Email::parse("seller.approved@example.com").is_ok());
        assert!(Email::parse("admin@example.com").is_ok());
        assert!(Email::parse("jane.doe+shop@example.co.th").is_ok());
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let email = Email::parse("  customer@example.com\n").unwrap();
        assert_eq!(email.as_str(), "customer@example.com");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        ));
    }

    #[test]
    fn test_parse_at_symbol_rules() {
        assert_eq!(Email::parse("nobody"), Err(EmailError::BadAtSymbol));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::BadAtSymbol));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyMailbox));
        assert_eq!(Email::parse("user@"), Err(EmailError::EmptyDomain));
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert_eq!(
            Email::parse("first last@example.com"),
            Err(EmailError::Whitespace)
        );
    }

    #[test]
    fn test_parts() {
        let email = Email::parse("seller@example.com").unwrap();
        assert_eq!(email.mailbox(), "seller");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_contains_ignore_case() {
        let email = Email::parse("Seller.Approved@Example.com").unwrap();
        assert!(email.contains_ignore_case("approved@"));
        assert!(!email.contains_ignore_case("pending"));
    }

    #[test]
    fn test_serde_is_plain_string() {
        let email = Email::parse("customer@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"customer@example.com\"");
    }
}
