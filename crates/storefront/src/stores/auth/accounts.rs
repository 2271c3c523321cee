//! Locally stored accounts with Argon2id password hashes.

use std::sync::{Arc, PoisonError, RwLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use aurora_core::{Email, User, UserId};
use serde::{Deserialize, Serialize};

use super::{AuthError, IdentityProvider};
use crate::persistence::{StateStore, keys};
use crate::stores::{load_or_default, persist};

/// A registered account as persisted under the `accounts` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    user: User,
    password_hash: String,
}

/// Accounts registered on this machine.
///
/// Emails are matched case-insensitively. Passwords are never stored in
/// plain text.
#[derive(Clone)]
pub struct LocalAccounts {
    accounts: Arc<RwLock<Vec<AccountRecord>>>,
    persistence: Arc<dyn StateStore>,
}

impl LocalAccounts {
    /// Restore registered accounts from `persistence`.
    #[must_use]
    pub fn load(persistence: Arc<dyn StateStore>) -> Self {
        let accounts: Vec<AccountRecord> = load_or_default(persistence.as_ref(), keys::ACCOUNTS);
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
            persistence,
        }
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityProvider for LocalAccounts {
    fn register(&self, name: &str, email: &Email, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let password_hash = hash_password(password)?;

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts.iter().any(|a| a.user.email.matches(email)) {
            return Err(AuthError::UserAlreadyExists);
        }

        let next_id = accounts
            .iter()
            .map(|a| a.user.id.as_i32())
            .max()
            .unwrap_or(0)
            + 1;
        let user = User {
            id: UserId::new(next_id),
            name: name.to_string(),
            email: email.clone(),
            avatar: None,
        };
        accounts.push(AccountRecord {
            user: user.clone(),
            password_hash,
        });
        persist(self.persistence.as_ref(), keys::ACCOUNTS, &*accounts);

        tracing::info!(user_id = %user.id, "Registered local account");
        Ok(user)
    }

    fn authenticate(&self, email: &Email, password: &str) -> Result<User, AuthError> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .iter()
            .find(|a| a.user.email.matches(email))
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;
        Ok(account.user.clone())
    }

    fn update_user(&self, user: &User) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts
            .iter()
            .any(|a| a.user.id != user.id && a.user.email.matches(&user.email))
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let account = accounts
            .iter_mut()
            .find(|a| a.user.id == user.id)
            .ok_or(AuthError::NotAuthenticated)?;
        account.user = user.clone();
        persist(self.persistence.as_ref(), keys::ACCOUNTS, &*accounts);
        Ok(())
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

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_register_then_authenticate() {
        let accounts = LocalAccounts::load(Arc::new(MemoryStore::new()));
        let user = accounts
            .register("Jane", &email("jane@aurora.test"), "hunter22")
            .unwrap();
        assert_eq!(user.id, UserId::new(1));

        let again = accounts
            .authenticate(&email("JANE@aurora.test"), "hunter22")
            .unwrap();
        assert_eq!(again, user);
    }

    #[test]
    fn test_wrong_password_and_unknown_email() {
        let accounts = LocalAccounts::load(Arc::new(MemoryStore::new()));
        accounts
            .register("Jane", &email("jane@aurora.test"), "hunter22")
            .unwrap();

        assert!(matches!(
            accounts.authenticate(&email("jane@aurora.test"), "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            accounts.authenticate(&email("nobody@aurora.test"), "hunter22"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let accounts = LocalAccounts::load(Arc::new(MemoryStore::new()));
        accounts
            .register("Jane", &email("jane@aurora.test"), "hunter22")
            .unwrap();

        assert!(matches!(
            accounts.register("Other", &email("Jane@Aurora.test"), "pw"),
            Err(AuthError::UserAlreadyExists)
        ));
        assert_eq!(accounts.len(), 1);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let accounts = LocalAccounts::load(Arc::new(MemoryStore::new()));
        assert!(matches!(
            accounts.register("  ", &email("a@b.c"), "pw"),
            Err(AuthError::MissingField("name"))
        ));
        assert!(matches!(
            accounts.register("A", &email("a@b.c"), ""),
            Err(AuthError::MissingField("password"))
        ));
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_hash_is_not_plain_text() {
        let persistence: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let accounts = LocalAccounts::load(Arc::clone(&persistence));
        accounts
            .register("Jane", &email("jane@aurora.test"), "hunter22")
            .unwrap();

        let raw = persistence.load_value(keys::ACCOUNTS).unwrap().unwrap();
        let text = raw.to_string();
        assert!(!text.contains("hunter22"));
        assert!(text.contains("$argon2"));
    }

    #[test]
    fn test_update_user_rejects_taken_email() {
        let accounts = LocalAccounts::load(Arc::new(MemoryStore::new()));
        accounts.register("A", &email("a@aurora.test"), "pw").unwrap();
        let mut b = accounts.register("B", &email("b@aurora.test"), "pw").unwrap();

        b.email = email("a@aurora.test");
        assert!(matches!(
            accounts.update_user(&b),
            Err(AuthError::UserAlreadyExists)
        ));
    }
}
