// File: src/predicates.rs
// Purpose: Plain string predicates behind the validation rules (no side effects)

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Email validation regex: something@something.something, no whitespace
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Validate email format
///
/// Shape check only, no DNS or mailbox verification.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate absolute URL format
///
/// Accepts anything the WHATWG URL parser accepts as an absolute URL.
/// Special schemes (http, https, ws, wss, ftp) must carry a host.
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            if matches!(url.scheme(), "http" | "https" | "ws" | "wss" | "ftp") {
                url.host_str().map(|h| !h.is_empty()).unwrap_or(false)
            } else {
                true
            }
        }
        Err(_) => false,
    }
}

/// Minimum length check on characters (not bytes)
pub fn has_min_length(s: &str, min: usize) -> bool {
    s.chars().count() >= min
}

/// Maximum length check on characters (not bytes)
pub fn has_max_length(s: &str, max: usize) -> bool {
    s.chars().count() <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://localhost:3000/admin"));
        assert!(is_valid_url("https://example.com/path?q=1#frag"));
        assert!(is_valid_url("mailto:someone@example.com"));

        assert!(!is_valid_url(""));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_length_helpers() {
        assert!(has_min_length("hello", 3));
        assert!(!has_min_length("hi", 3));
        assert!(has_max_length("héllo", 5));
        assert!(!has_max_length("verylongstring", 5));
    }
}
