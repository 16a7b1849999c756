//! Submission gate for the registration form. Rules run in a fixed order and
//! the first failing rule is the only one reported.

use shared::{domain::RegistrationForm, error::ValidationError};

/// Hard minimum, intentionally looser than the advisory length in
/// [`crate::strength::MIN_ADVISED_LENGTH`].
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate(form: &RegistrationForm) -> Result<(), ValidationError> {
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err(ValidationError::AllFieldsRequired);
    }

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    // Presence of '@' only; the service owns real address validation.
    if !form.email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
