//! Request field validation.
//!
//! Handlers validate the full request body up front and report every
//! failing field at once, as a list of `{ field, message }` pairs.

use std::str::FromStr;

use serde::Serialize;

use ratewise_core::{Email, Role};

/// Bounds for a self-registered user's name.
pub const SIGNUP_NAME_MIN: usize = 20;
pub const SIGNUP_NAME_MAX: usize = 60;

/// Bounds for a name entered by an administrator.
pub const ADMIN_NAME_MIN: usize = 2;
pub const ADMIN_NAME_MAX: usize = 60;

/// Password length bounds.
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;

/// Maximum address length.
pub const ADDRESS_MAX: usize = 400;

/// A single failed field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    /// Build a field error with a literal message.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Collects field errors across a request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name as entered on the public signup form.
    pub fn signup_name(&mut self, name: &str) -> &mut Self {
        self.name_in_range(name, SIGNUP_NAME_MIN, SIGNUP_NAME_MAX)
    }

    /// Name as entered by an administrator; the floor is relaxed.
    pub fn admin_name(&mut self, name: &str) -> &mut Self {
        self.name_in_range(name, ADMIN_NAME_MIN, ADMIN_NAME_MAX)
    }

    fn name_in_range(&mut self, name: &str, min: usize, max: usize) -> &mut Self {
        let len = name.chars().count();
        if len < min || len > max {
            self.errors.push(FieldError::new(
                "name",
                format!("Name must be between {min} and {max} characters"),
            ));
        }
        self
    }

    /// Email must parse as a plausible address.
    pub fn email(&mut self, email: &str) -> &mut Self {
        if Email::parse(email).is_err() {
            self.errors
                .push(FieldError::new("email", "Invalid email address"));
        }
        self
    }

    /// 8-16 characters, at least one uppercase letter and one special
    /// character.
    pub fn password(&mut self, password: &str) -> &mut Self {
        let len = password.chars().count();
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

        if len < PASSWORD_MIN || len > PASSWORD_MAX || !has_upper || !has_special {
            self.errors.push(FieldError::new(
                "password",
                format!(
                    "Password must be {PASSWORD_MIN}-{PASSWORD_MAX} characters \
                     with at least one uppercase letter and one special character"
                ),
            ));
        }
        self
    }

    /// Address is optional but capped in length.
    pub fn address(&mut self, address: &str) -> &mut Self {
        if address.chars().count() > ADDRESS_MAX {
            self.errors.push(FieldError::new(
                "address",
                format!("Address must be at most {ADDRESS_MAX} characters"),
            ));
        }
        self
    }

    /// Role must be one of the known roles. Callers parse the value
    /// afterwards with [`parse_role`].
    pub fn role(&mut self, role: &str) -> &mut Self {
        if Role::from_str(role).is_err() {
            self.errors
                .push(FieldError::new("role", "Role must be admin, owner, or user"));
        }
        self
    }

    /// All errors collected so far; `Ok(())` when the body is clean.
    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// Parse a role string after [`Validator::role`] has vetted it.
#[must_use]
pub fn parse_role(role: &str) -> Option<Role> {
    Role::from_str(role).ok()
}

/// A rating must be an integer from 1 to 5. The wire type is `i32`, so
/// integrality is enforced by deserialization; this checks the range.
#[must_use]
pub const fn rating_in_range(value: i32) -> bool {
    value >= 1 && value <= 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_name_bounds() {
        let long_enough = "a".repeat(20);
        let too_short = "a".repeat(19);
        let too_long = "a".repeat(61);

        assert!(Validator::new().signup_name(&long_enough).finish().is_ok());
        assert!(Validator::new().signup_name(&too_short).finish().is_err());
        assert!(Validator::new().signup_name(&too_long).finish().is_err());
    }

    #[test]
    fn test_admin_name_relaxed_floor() {
        assert!(Validator::new().admin_name("Al").finish().is_ok());
        assert!(Validator::new().admin_name("A").finish().is_err());
    }

    #[test]
    fn test_password_rules() {
        let ok = |p: &str| Validator::new().password(p).finish().is_ok();

        assert!(ok("Abcdef1!"));
        assert!(ok("P@ssword12345678"));
        assert!(!ok("abcdef1!"), "missing uppercase");
        assert!(!ok("Abcdefgh"), "missing special");
        assert!(!ok("Ab1!"), "too short");
        assert!(!ok("Abcdefgh1!Abcdefg"), "too long");
    }

    #[test]
    fn test_address_cap() {
        let fine = "x".repeat(400);
        let over = "x".repeat(401);

        assert!(Validator::new().address(&fine).finish().is_ok());
        assert!(Validator::new().address("").finish().is_ok());
        assert!(Validator::new().address(&over).finish().is_err());
    }

    #[test]
    fn test_role_allowlist() {
        assert!(Validator::new().role("owner").finish().is_ok());
        assert!(Validator::new().role("superuser").finish().is_err());
        assert!(Validator::new().role("Admin").finish().is_err());
    }

    #[test]
    fn test_errors_accumulate() {
        let errors = Validator::new()
            .signup_name("short")
            .email("nope")
            .password("weak")
            .finish()
            .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_rating_range() {
        assert!(rating_in_range(1));
        assert!(rating_in_range(5));
        assert!(!rating_in_range(0));
        assert!(!rating_in_range(6));
        assert!(!rating_in_range(-3));
    }
}
