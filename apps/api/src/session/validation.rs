use crate::session::{AuthError, SignInRequest, SignUpRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::InvalidInput("Email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AuthError::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}

/// Local checks performed before the provider is contacted.
pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), AuthError> {
    validate_email(&req.email)?;
    if req.password != req.confirm_password {
        return Err(AuthError::InvalidInput("Passwords do not match".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub fn validate_sign_in(req: &SignInRequest) -> Result<(), AuthError> {
    validate_email(&req.email)?;
    if req.password.is_empty() {
        return Err(AuthError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            email: "student@college.edu".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            full_name: "Student".to_string(),
        }
    }

    fn message(err: AuthError) -> String {
        err.to_string()
    }

    #[test]
    fn test_mismatched_passwords_rejected_first() {
        let err = validate_sign_up(&sign_up("abc", "abd")).unwrap_err();
        assert_eq!(message(err), "Passwords do not match");
    }

    #[test]
    fn test_short_password_rejected() {
        let err = validate_sign_up(&sign_up("12345", "12345")).unwrap_err();
        assert_eq!(message(err), "Password must be at least 6 characters long");
    }

    #[test]
    fn test_six_character_password_accepted() {
        assert!(validate_sign_up(&sign_up("123456", "123456")).is_ok());
    }

    #[test]
    fn test_email_without_at_rejected() {
        let mut req = sign_up("secret1", "secret1");
        req.email = "student.college.edu".to_string();
        assert!(validate_sign_up(&req).is_err());
    }

    #[test]
    fn test_sign_in_requires_password() {
        let req = SignInRequest {
            email: "student@college.edu".to_string(),
            password: String::new(),
        };
        assert_eq!(message(validate_sign_in(&req).unwrap_err()), "Password is required");
    }
}
