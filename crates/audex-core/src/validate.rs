//! # Field Validators
//!
//! Reusable field-level predicates shared by entity validation across the
//! workspace: identifier slugs, email/phone/URL shapes, domain names,
//! array bounds, and chronological date ordering.
//!
//! Predicates return `bool`; entity validators combine them with
//! [`crate::error::ValidationErrors`] to build field-level reports.

use crate::temporal::Timestamp;

/// Lowercase alphanumeric segments separated by single hyphens.
pub fn is_valid_slug(s: &str) -> bool {
    if s.is_empty() || s.starts_with('-') || s.ends_with('-') || s.contains("--") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Minimal email shape check: one `@`, non-empty local part, and a
/// domain with at least one dot. Deliverability is not our problem.
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && is_valid_domain(domain)
}

/// Hostname shape: dot-separated labels of alphanumerics and hyphens,
/// with a non-numeric top-level label.
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    labels_ok
        && labels
            .last()
            .is_some_and(|tld| tld.chars().any(|c| c.is_ascii_alphabetic()))
}

/// Phone shape: optional leading `+`, then 7–15 digits, ignoring
/// spaces, hyphens, dots, and parentheses.
pub fn is_valid_phone(s: &str) -> bool {
    let stripped: String = s
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// URL shape: `http://` or `https://` followed by a valid host.
pub fn is_valid_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    is_valid_domain(host) || host == "localhost"
}

/// Whether a collection length falls within `[min, max]`.
pub fn within_bounds<T>(items: &[T], min: usize, max: usize) -> bool {
    (min..=max).contains(&items.len())
}

/// Whether each present timestamp is `<=` the next present one.
///
/// `None` entries are skipped, so a timeline with unset optional dates
/// is still checked for consistency among the dates it does carry.
pub fn is_chronological(dates: &[Option<Timestamp>]) -> bool {
    let mut prev: Option<Timestamp> = None;
    for date in dates.iter().flatten() {
        if let Some(p) = prev {
            if *date < p {
                return false;
            }
        }
        prev = Some(*date);
    }
    true
}
