use std::fmt;

use super::{AuthError, Field, ValidationError, ValidationErrors};

/// Minimum password length accepted by the login form
pub const MIN_PASSWORD_LENGTH: usize = 6;

const INVALID_EMAIL: &str = "Adresse email invalide";
const PASSWORD_TOO_SHORT: &str = "Mot de passe doit contenir au moins 6 caractères";

/// Email and password submitted from the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials without validation
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate form input, reporting every failing field at once.
    /// The email is trimmed; the password is taken as typed.
    pub fn validate(email: &str, password: &str) -> Result<Self, ValidationErrors> {
        let email = email.trim();
        let mut errors = Vec::new();

        if !is_valid_email(email) {
            errors.push(ValidationError {
                field: Field::Email,
                message: INVALID_EMAIL,
            });
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(ValidationError {
                field: Field::Password,
                message: PASSWORD_TOO_SHORT,
            });
        }

        if errors.is_empty() {
            Ok(Self::new(email, password))
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

// Keep passwords out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Rejected(errors.to_string())
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain whose labels are non-empty. No whitespace or control characters.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || local.starts_with('.') || local.ends_with('.') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
        && labels.last().map(|tld| tld.len() >= 2).unwrap_or(false)
}
