//! Authentication service.
//!
//! Registration, login, and token issuance. Passwords are hashed with
//! Argon2id (salted, cost-factored) before storage and never logged. Roles
//! are assigned once at registration from the configured admin allow-list.
//!
//! There is no session or revocation state: an issued token remains valid
//! until its expiry even if the account changes afterward.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{TokenError, TokenIdentity, issue_token, verify_token};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use tamarind_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// A successful registration or login.
#[derive(Debug)]
pub struct AuthSession {
    pub token: String,
    pub role: Role,
    pub name: String,
    pub email: Email,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
    admin_emails: &'a [Email],
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        jwt_secret: &'a SecretString,
        admin_emails: &'a [Email],
    ) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
            admin_emails,
        }
    }

    /// Register a new user and issue a token.
    ///
    /// The role is computed from the admin allow-list; everyone else gets the
    /// default role. No password strength policy is enforced beyond
    /// non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for empty name or password.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email)?;
        let role = self.role_for(&email);
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        self.session_for(user)
    }

    /// Login with email and password, issuing a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are indistinguishable by design.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        // An unparseable email can't belong to any account; same generic answer.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.session_for(user)
    }

    /// Get a user by ID (for `GET /auth/me`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Role for a registrant: admin iff the email is on the allow-list.
    fn role_for(&self, email: &Email) -> Role {
        if self.admin_emails.contains(email) {
            Role::Admin
        } else {
            Role::User
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = issue_token(user.id, user.role, self.jwt_secret.expose_secret())?;

        Ok(AuthSession {
            token,
            role: user.role,
            name: user.name,
            email: user.email,
        })
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("pw123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw123", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("pw123").unwrap();
        let err = verify_password("pw124", &hash).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw123").unwrap();
        let b = hash_password("pw123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_rejected() {
        let err = verify_password("pw123", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_role_assignment_from_allow_list() {
        // A lazy pool never connects; role_for touches no I/O.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let secret = SecretString::from("unit-test-secret");
        let admins = vec![Email::parse("riyas@gmail.com").unwrap()];
        let service = AuthService::new(&pool, &secret, &admins);

        let admin = Email::parse("riyas@gmail.com").unwrap();
        let shopper = Email::parse("alice@x.com").unwrap();
        assert_eq!(service.role_for(&admin), Role::Admin);
        assert_eq!(service.role_for(&shopper), Role::User);
    }
}
