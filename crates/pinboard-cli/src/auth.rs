//! CLI auth/session helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use pinboard_core::auth::{AuthClient, AuthResult, SessionPersistence};
use pinboard_core::config::AuthConfig;

pub use pinboard_core::auth::{AuthError, AuthSession};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "pinboard";
const SESSION_USERNAME: &str = "session";

#[derive(Clone)]
struct SessionStore;

impl SessionStore {
    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry() -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, SESSION_USERNAME)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = Self::entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(SESSION_USERNAME) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        Self::entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(SESSION_USERNAME.to_string(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = Self::entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(SESSION_USERNAME);
        Ok(())
    }
}

#[derive(Clone)]
pub struct AuthService {
    inner: AuthClient<SessionStore>,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        Ok(Self {
            inner: AuthClient::new(&config.url, config.anon_key.clone(), SessionStore)?,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        self.inner.sign_in(email, password).await
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        self.inner.restore_session().await
    }

    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        self.inner.sign_out(access_token).await
    }
}

pub fn load_stored_session() -> AuthResult<Option<AuthSession>> {
    SessionStore.load_session()
}

pub fn clear_stored_session() -> AuthResult<()> {
    SessionStore.clear_session()
}

#[cfg(test)]
mod tests {
    use pinboard_core::auth::AuthUser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_session() -> AuthSession {
        AuthSession {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: 1_700_000_000,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("user@example.com".to_string()),
            },
        }
    }

    #[test]
    fn session_store_roundtrip() {
        let store = SessionStore;
        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);

        let session = sample_session();
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
    }
}
