use super::*;

fn valid_form() -> RegistrationForm {
    RegistrationForm::new("ada", "ada@example.org", "secret1", "secret1")
}

#[test]
fn accepts_valid_form() {
    assert_eq!(validate(&valid_form()), Ok(()));
}

#[test]
fn missing_email_wins_over_short_password() {
    let form = RegistrationForm::new("ada", "", "abc", "abc");
    assert_eq!(validate(&form), Err(ValidationError::AllFieldsRequired));
}

#[test]
fn missing_username_or_password_is_required() {
    let mut form = valid_form();
    form.username.clear();
    assert_eq!(validate(&form), Err(ValidationError::AllFieldsRequired));

    let mut form = valid_form();
    form.password.clear();
    form.confirm_password.clear();
    assert_eq!(validate(&form), Err(ValidationError::AllFieldsRequired));
}

#[test]
fn empty_confirmation_alone_is_a_mismatch() {
    let mut form = valid_form();
    form.confirm_password.clear();
    assert_eq!(validate(&form), Err(ValidationError::PasswordMismatch));
}

#[test]
fn five_characters_is_too_short() {
    let form = RegistrationForm::new("ada", "ada@example.org", "abcde", "abcde");
    assert_eq!(validate(&form), Err(ValidationError::PasswordTooShort));
}

#[test]
fn six_characters_pass_even_though_advised_against() {
    let form = RegistrationForm::new("ada", "ada@example.org", "abcdef", "abcdef");
    assert_eq!(validate(&form), Ok(()));
    assert_eq!(
        crate::strength::score(&form.password).bucket,
        Some(shared::domain::StrengthBucket::Weak)
    );
}

#[test]
fn short_password_wins_over_mismatch() {
    let form = RegistrationForm::new("ada", "ada@example.org", "abc", "xyz");
    assert_eq!(validate(&form), Err(ValidationError::PasswordTooShort));
}

#[test]
fn mismatched_passwords_are_rejected() {
    let form = RegistrationForm::new("ada", "ada@example.org", "secret1", "secret2");
    assert_eq!(validate(&form), Err(ValidationError::PasswordMismatch));
}

#[test]
fn mismatch_wins_over_invalid_email() {
    let form = RegistrationForm::new("ada", "nodomain", "secret1", "secret2");
    assert_eq!(validate(&form), Err(ValidationError::PasswordMismatch));
}

#[test]
fn email_without_at_sign_is_invalid() {
    let form = RegistrationForm::new("ada", "nodomain", "secret1", "secret1");
    assert_eq!(validate(&form), Err(ValidationError::InvalidEmail));
}

#[test]
fn bare_at_sign_email_passes() {
    let form = RegistrationForm::new("ada", "a@b", "secret1", "secret1");
    assert_eq!(validate(&form), Ok(()));
}

#[test]
fn whitespace_fields_count_as_present() {
    let form = RegistrationForm::new(" ", "@", "      ", "      ");
    assert_eq!(validate(&form), Ok(()));
}
