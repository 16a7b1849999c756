//! Advisory password strength. Five independent criteria are checked and the
//! number satisfied is mapped onto a coarse bucket. Nothing here blocks
//! submission; see [`crate::validation`] for the hard gate.

use shared::domain::{Criterion, StrengthBucket, StrengthResult};

pub const MIN_ADVISED_LENGTH: usize = 8;
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

const LENGTH_LABEL: &str = "At least 8 characters";
const UPPERCASE_LABEL: &str = "Contains uppercase letter (A-Z)";
const LOWERCASE_LABEL: &str = "Contains lowercase letter (a-z)";
const DIGIT_LABEL: &str = "Contains number (0-9)";
const SPECIAL_LABEL: &str = "Contains special character (!@#$%^&*)";

/// Scores `password`. Pure and total; an empty password yields no bucket.
pub fn score(password: &str) -> StrengthResult {
    let criteria = vec![
        Criterion {
            label: LENGTH_LABEL,
            satisfied: password.chars().count() >= MIN_ADVISED_LENGTH,
        },
        Criterion {
            label: UPPERCASE_LABEL,
            satisfied: password.chars().any(|c| c.is_ascii_uppercase()),
        },
        Criterion {
            label: LOWERCASE_LABEL,
            satisfied: password.chars().any(|c| c.is_ascii_lowercase()),
        },
        Criterion {
            label: DIGIT_LABEL,
            satisfied: password.chars().any(|c| c.is_ascii_digit()),
        },
        Criterion {
            label: SPECIAL_LABEL,
            satisfied: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        },
    ];

    let bucket = if password.is_empty() {
        None
    } else {
        let satisfied = criteria.iter().filter(|c| c.satisfied).count();
        Some(StrengthBucket::from_satisfied(satisfied))
    };

    StrengthResult { bucket, criteria }
}

/// Whether the "make your password stronger" checklist should be shown.
pub fn suggestions_visible(result: &StrengthResult) -> bool {
    matches!(
        result.bucket,
        Some(StrengthBucket::Weak) | Some(StrengthBucket::Medium)
    )
}

#[cfg(test)]
#[path = "tests/strength_tests.rs"]
mod tests;
