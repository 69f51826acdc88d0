//! Derived contact actions
//!
//! Given a free-text contact string, decide whether it supports an email or
//! phone action. Email wins when an `@` is present; otherwise the string
//! must contain enough digits to be dialable.

/// Minimum digit count for a string to be treated as a phone number.
pub const MIN_PHONE_DIGITS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactAction {
    /// Dial string: leading `+` preserved, all other non-digits stripped.
    Call(String),
    Email(String),
}

/// The action a contact string supports, if any.
pub fn contact_action(contact: &str) -> Option<ContactAction> {
    let contact = contact.trim();
    if contact.is_empty() {
        return None;
    }
    if contact.contains('@') {
        return Some(ContactAction::Email(contact.to_string()));
    }
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }
    let dial = if contact.starts_with('+') {
        format!("+{digits}")
    } else {
        digits
    };
    Some(ContactAction::Call(dial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_detected() {
        assert_eq!(
            contact_action(" dana@example.com "),
            Some(ContactAction::Email("dana@example.com".to_string()))
        );
    }

    #[test]
    fn test_phone_detected_and_normalized() {
        assert_eq!(
            contact_action("(555) 010-4477"),
            Some(ContactAction::Call("5550104477".to_string()))
        );
        assert_eq!(
            contact_action("+1 555 010 4477"),
            Some(ContactAction::Call("+15550104477".to_string()))
        );
    }

    #[test]
    fn test_too_few_digits_offers_nothing() {
        assert_eq!(contact_action("ext. 42"), None);
        assert_eq!(contact_action("555-01"), None);
        assert_eq!(contact_action(""), None);
    }

    #[test]
    fn test_email_wins_over_digits() {
        // An address with many digits is still an email
        assert_eq!(
            contact_action("12345678@example.com"),
            Some(ContactAction::Email("12345678@example.com".to_string()))
        );
    }
}
