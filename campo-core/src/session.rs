//! Signed-in user handle and the identity-provider seam.
//!
//! The session is passed explicitly into every fetch; there is no global
//! "current user".

use crate::error::{CampoError, Result};
use serde::{Deserialize, Serialize};

/// Read-only view of the signed-in user.
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct Session {
    /// Identity-provider user id (`uid`)
    pub user_id: Option<String>,
    /// Bearer token forwarded to the backend, when the provider issued one
    pub id_token: Option<String>,
    pub email: Option<String>,
}

impl Session {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn logged_in(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// The user id, or [`CampoError::Unauthenticated`].
    ///
    /// Called at the start of every fetch attempt.
    pub fn require_user(&self) -> Result<&str> {
        match self.user_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(CampoError::Unauthenticated),
        }
    }
}

/// Sign-in and account creation against a third-party identity provider.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn create_account(&self, email: &str, password: &str) -> Result<Session>;
}

/// Per-field validation messages for the login and register forms.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FormErrors {
    pub username: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Validate the login form.
pub fn validate_login(email: &str, password: &str) -> FormErrors {
    FormErrors {
        username: None,
        email: email_error(email),
        password: password.is_empty().then_some("Se requiere una contraseña"),
    }
}

/// Validate the register form; same as login plus a required username.
pub fn validate_register(username: &str, email: &str, password: &str) -> FormErrors {
    FormErrors {
        username: username
            .trim()
            .is_empty()
            .then_some("Se requiere un nombre de usuario"),
        ..validate_login(email, password)
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if email.is_empty() {
        Some("Se requiere un email")
    } else if !is_email(email) {
        Some("Formato de email inválido")
    } else {
        None
    }
}

/// Structural check only: one `@`, non-empty local part, and a dotted
/// domain without empty labels. Any TLD is accepted.
fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_user() {
        assert!(matches!(
            Session::default().require_user(),
            Err(CampoError::Unauthenticated)
        ));
        let empty = Session {
            user_id: Some(String::new()),
            ..Default::default()
        };
        assert!(!empty.logged_in());
        assert!(empty.require_user().is_err());

        let session = Session::signed_in("uid-1");
        assert!(session.logged_in());
        assert_eq!(session.require_user().unwrap(), "uid-1");
    }

    #[test]
    fn test_validate_login_messages() {
        let errors = validate_login("", "");
        assert_eq!(errors.email, Some("Se requiere un email"));
        assert_eq!(errors.password, Some("Se requiere una contraseña"));

        let errors = validate_login("no-arroba", "x");
        assert_eq!(errors.email, Some("Formato de email inválido"));
        assert!(errors.password.is_none());

        assert!(validate_login("ana@campo.local", "secreta").is_empty());
    }

    #[test]
    fn test_validate_register_requires_username() {
        let errors = validate_register("  ", "ana@campo.ar", "x");
        assert_eq!(errors.username, Some("Se requiere un nombre de usuario"));
        assert!(errors.email.is_none());
        assert!(validate_register("ana", "ana@campo.ar", "x").is_empty());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.c"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("a@b..com"));
        assert!(!is_email("a b@c.com"));
    }
}
