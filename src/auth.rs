//! Access-email validation.
//!
//! Accepted addresses are lowercased and used as the opaque key for the
//! user store. The rules match the login form: restricted local-part
//! charset, a dotted domain, and a short alphabetic top-level label.

pub fn validate_email(raw: &str) -> bool {
    let s = raw.trim();
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    {
        return false;
    }
    (2..=6).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Canonical user id for a validated address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
