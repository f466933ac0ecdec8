use thiserror::Error;

use shared::types::{CreateUserData, LoginData, UpdateUserData};

/// First failing rule's message, surfaced verbatim as the 400 body message.
#[derive(Error, Debug, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn fail(message: &str) -> Result<(), ValidationError> {
    Err(ValidationError(message.to_string()))
}

/// Keep this permissive: real mail validation happens when the invitation
/// mail bounces, not here.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

const SPECIAL_CHARS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

fn validate_strong_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return fail("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return fail("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return fail("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("Password must contain at least one number");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(&c)) {
        return fail("Password must contain at least one special character");
    }
    Ok(())
}

/// Registration rules: every field required, strong password, confirmation
/// must match.  Rules run in declaration order; the first failure wins.
pub fn validate_create(data: &CreateUserData) -> Result<(), ValidationError> {
    if data.name.is_empty() {
        return fail("Name cannot be empty");
    }
    if !is_valid_email(&data.email) {
        return fail("Invalid email format");
    }
    validate_strong_password(&data.password)?;
    if data.password != data.confirm_password {
        return fail("Passwords and confirmPassword do not match");
    }
    Ok(())
}

/// Update rules: name and email required, password optional — when both
/// password fields are present they must match (strength is not re-checked
/// on update, mirroring registration-time-only policy).
pub fn validate_update(data: &UpdateUserData) -> Result<(), ValidationError> {
    if data.name.is_empty() {
        return fail("Name must be at least 1 characters long");
    }
    if data.email.is_empty() {
        return fail("Email must be at least 1 characters long");
    }
    if !is_valid_email(&data.email) {
        return fail("Invalid email format");
    }
    if let (Some(password), Some(confirm)) = (&data.password, &data.confirm_password) {
        if password != confirm {
            return fail("Passwords do not match");
        }
    }
    Ok(())
}

pub fn validate_login(data: &LoginData) -> Result<(), ValidationError> {
    if data.email.is_empty() {
        return fail("Email must be at least 1 characters long");
    }
    if !is_valid_email(&data.email) {
        return fail("Invalid email format");
    }
    if data.password.is_empty() {
        return fail("Password must be at least 1 characters long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_data() -> CreateUserData {
        CreateUserData {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            password: "Password@123".into(),
            confirm_password: "Password@123".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_create(&create_data()).is_ok());
    }

    #[test]
    fn empty_name_fails_first() {
        let mut data = create_data();
        data.name.clear();
        data.email = "broken".into(); // name rule must win over email rule
        assert_eq!(
            validate_create(&data).unwrap_err().0,
            "Name cannot be empty"
        );
    }

    #[test]
    fn bad_email_is_rejected() {
        for email in ["plainaddress", "missing@tld", "two words@a.com", "@no-local.com"] {
            let mut data = create_data();
            data.email = email.into();
            assert_eq!(
                validate_create(&data).unwrap_err().0,
                "Invalid email format",
                "email: {email}"
            );
        }
    }

    #[test]
    fn password_rules_fire_in_order() {
        let cases = [
            ("Sh0rt@", "Password must be at least 8 characters long"),
            ("lowercase@123", "Password must contain at least one uppercase letter"),
            ("UPPERCASE@123", "Password must contain at least one lowercase letter"),
            ("NoNumbers@here", "Password must contain at least one number"),
            ("NoSpecials123", "Password must contain at least one special character"),
        ];
        for (password, message) in cases {
            let mut data = create_data();
            data.password = password.into();
            data.confirm_password = password.into();
            assert_eq!(validate_create(&data).unwrap_err().0, message);
        }
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut data = create_data();
        data.confirm_password = "Different@123".into();
        assert_eq!(
            validate_create(&data).unwrap_err().0,
            "Passwords and confirmPassword do not match"
        );
    }

    #[test]
    fn update_allows_missing_password() {
        let data = UpdateUserData {
            name: "John".into(),
            email: "john@example.com".into(),
            password: None,
            confirm_password: None,
        };
        assert!(validate_update(&data).is_ok());
    }

    #[test]
    fn update_rejects_mismatched_password_pair() {
        let data = UpdateUserData {
            name: "John".into(),
            email: "john@example.com".into(),
            password: Some("Password@123".into()),
            confirm_password: Some("Other@123".into()),
        };
        assert_eq!(validate_update(&data).unwrap_err().0, "Passwords do not match");
    }

    #[test]
    fn login_requires_email_and_password() {
        let mut data = LoginData {
            email: String::new(),
            password: "x".into(),
        };
        assert_eq!(
            validate_login(&data).unwrap_err().0,
            "Email must be at least 1 characters long"
        );

        data.email = "john@example.com".into();
        data.password = String::new();
        assert_eq!(
            validate_login(&data).unwrap_err().0,
            "Password must be at least 1 characters long"
        );
    }
}
