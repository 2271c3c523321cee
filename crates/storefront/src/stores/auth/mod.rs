//! Session store and identity seam.
//!
//! [`AuthStore`] holds the single signed-in user. Credential checks are
//! delegated to an [`IdentityProvider`]; [`LocalAccounts`] is the bundled
//! implementation and a remote identity service can replace it without
//! touching the store.

mod accounts;
mod error;

pub use accounts::LocalAccounts;
pub use error::AuthError;

use std::sync::{Arc, PoisonError, RwLock};

use aurora_core::{Email, ProfileUpdate, User};
use tracing::instrument;

use super::{load_or_default, persist};
use crate::persistence::{StateStore, keys};

/// Verifies credentials and owns account records.
pub trait IdentityProvider: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name or password and
    /// `UserAlreadyExists` if the email is taken.
    fn register(&self, name: &str, email: &Email, password: &str) -> Result<User, AuthError>;

    /// Check a password for an existing account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email or wrong password.
    fn authenticate(&self, email: &Email, password: &str) -> Result<User, AuthError>;

    /// Store profile changes for an existing account.
    ///
    /// # Errors
    ///
    /// Returns `UserAlreadyExists` if the new email belongs to another
    /// account.
    fn update_user(&self, user: &User) -> Result<(), AuthError>;
}

/// Handle to the current session.
#[derive(Clone)]
pub struct AuthStore {
    session: Arc<RwLock<Option<User>>>,
    identity: Arc<dyn IdentityProvider>,
    persistence: Arc<dyn StateStore>,
}

impl AuthStore {
    /// Restore the session from `persistence`.
    #[must_use]
    pub fn load(persistence: Arc<dyn StateStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        let session: Option<User> = load_or_default(persistence.as_ref(), keys::SESSION);
        Self {
            session: Arc::new(RwLock::new(session)),
            identity,
            persistence,
        }
    }

    fn set_session(&self, user: Option<User>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = user;
        persist(self.persistence.as_ref(), keys::SESSION, &*session);
    }

    /// Sign in. Returns `true` and sets the session when the credentials
    /// check out; otherwise returns `false` and leaves the session as it was.
    pub fn login(&self, email: &str, password: &str) -> bool {
        self.sign_in(email, password).is_some()
    }

    /// Like [`login`](Self::login), returning the user the session was set to.
    #[instrument(skip(self, password))]
    pub fn sign_in(&self, email: &str, password: &str) -> Option<User> {
        match self.try_login(email, password) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Signed in");
                self.set_session(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected");
                None
            }
        }
    }

    fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        self.identity.authenticate(&email, password)
    }

    /// Create an account and sign in as it. Returns `false` for blank
    /// fields, an invalid email or an email that is already registered.
    pub fn register(&self, name: &str, email: &str, password: &str) -> bool {
        self.sign_up(name, email, password).is_some()
    }

    /// Like [`register`](Self::register), returning the new user.
    #[instrument(skip(self, password))]
    pub fn sign_up(&self, name: &str, email: &str, password: &str) -> Option<User> {
        let result = Email::parse(email)
            .map_err(AuthError::from)
            .and_then(|email| self.identity.register(name, &email, password));
        match result {
            Ok(user) => {
                self.set_session(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "Registration rejected");
                None
            }
        }
    }

    /// Merge `update` into the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when no one is signed in, or the identity
    /// provider's error if the change cannot be stored.
    #[instrument(skip(self))]
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        let current = session.as_ref().ok_or(AuthError::NotAuthenticated)?;

        let mut updated = current.clone();
        update.apply(&mut updated);
        if &updated == current {
            return Ok(updated);
        }

        self.identity.update_user(&updated)?;
        *session = Some(updated.clone());
        persist(self.persistence.as_ref(), keys::SESSION, &*session);
        Ok(updated)
    }

    /// Sign out unconditionally.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.set_session(None);
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn store() -> (AuthStore, Arc<dyn StateStore>) {
        let persistence: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let identity = Arc::new(LocalAccounts::load(Arc::clone(&persistence)));
        (AuthStore::load(Arc::clone(&persistence), identity), persistence)
    }

    #[test]
    fn test_register_signs_in() {
        let (auth, _) = store();
        assert!(auth.register("Jane Doe", "jane@aurora.test", "hunter22"));
        assert!(auth.is_authenticated());
        assert_eq!(auth.current_user().unwrap().name, "Jane Doe");
    }

    #[test]
    fn test_login_requires_registered_account() {
        let (auth, _) = store();
        assert!(!auth.login("ghost@aurora.test", "anything"));
        assert!(!auth.is_authenticated());

        assert!(auth.register("Jane", "jane@aurora.test", "hunter22"));
        auth.logout();
        assert!(!auth.is_authenticated());

        assert!(!auth.login("jane@aurora.test", "wrong"));
        assert!(!auth.is_authenticated());
        assert!(auth.login("jane@aurora.test", "hunter22"));
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_sign_in_returns_the_session_user() {
        let (auth, _) = store();
        let registered = auth.sign_up("Jane", "jane@aurora.test", "hunter22").unwrap();
        assert_eq!(auth.current_user().as_ref(), Some(&registered));

        // A concurrent sign-out does not change what the caller was handed.
        let other = auth.clone();
        let signed_in = auth.sign_in("JANE@aurora.test", "hunter22").unwrap();
        other.logout();
        assert_eq!(signed_in, registered);
        assert!(!auth.is_authenticated());

        assert!(auth.sign_up("Jane again", "jane@aurora.test", "pw").is_none());
        assert!(auth.sign_in("jane@aurora.test", "wrong").is_none());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_register_rejects_blank_or_invalid_fields() {
        let (auth, _) = store();
        assert!(!auth.register("", "jane@aurora.test", "pw"));
        assert!(!auth.register("Jane", "not-an-email", "pw"));
        assert!(!auth.register("Jane", "jane@aurora.test", ""));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_update_profile_without_session() {
        let (auth, _) = store();
        assert!(matches!(
            auth.update_profile(ProfileUpdate::default()),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_update_profile_persists_through_login() {
        let (auth, _) = store();
        assert!(auth.register("Jane", "jane@aurora.test", "hunter22"));

        let updated = auth
            .update_profile(ProfileUpdate {
                name: Some("Jane Q".to_string()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(updated.name, "Jane Q");

        auth.logout();
        assert!(auth.login("jane@aurora.test", "hunter22"));
        assert_eq!(auth.current_user().unwrap().name, "Jane Q");
    }

    #[test]
    fn test_session_survives_reload() {
        let (auth, persistence) = store();
        assert!(auth.register("Jane", "jane@aurora.test", "hunter22"));

        let identity = Arc::new(LocalAccounts::load(Arc::clone(&persistence)));
        let reloaded = AuthStore::load(persistence, identity);
        assert_eq!(reloaded.current_user(), auth.current_user());

        reloaded.logout();
        let identity = Arc::new(LocalAccounts::load(Arc::clone(&reloaded.persistence)));
        let after_logout = AuthStore::load(Arc::clone(&reloaded.persistence), identity);
        assert!(!after_logout.is_authenticated());
    }
}
