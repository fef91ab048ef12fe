pub mod error;
pub mod models;

use std::{
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex, RwLock},
};

use log::{debug, info};
#[cfg(test)]
use mockall::automock;

use {error::*, models::*};

#[cfg(test)]
mod test;

pub type DynTokenStore = Arc<dyn TokenStore + Send + Sync>;

///
/// Persistent home of the bearer credential. Its presence is the sole
/// signal that a user is logged in between runs.
///
#[cfg_attr(test, automock)]
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new_dyn(path: PathBuf) -> DynTokenStore {
        Arc::new(Self { path })
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok(if token.is_empty() { None } else { Some(token.to_string()) })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::ReadTokenError(self.path.clone(), e)),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        fs::write(&self.path, token).map_err(|e| Error::WriteTokenError(self.path.clone(), e))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::RemoveTokenError(self.path.clone(), e)),
        }
    }
}

/// Process-local store, for hosts without a writable filesystem.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new_dyn() -> DynTokenStore {
        Arc::new(Self::default())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

pub type DynSession = Arc<Session>;

///
/// Explicit session context: the in-memory copy of the bearer credential
/// plus the store it is persisted to. Passed to every client that needs it
/// instead of living in process-wide state.
///
pub struct Session {
    token: RwLock<Option<String>>,
    store: DynTokenStore,
}

impl Session {
    /// Creates a session initialized from whatever token the store holds.
    pub fn restore(store: DynTokenStore) -> Result<DynSession> {
        let token = store.load()?;
        if token.is_some() {
            debug!("Restored persisted credential");
        }
        Ok(Arc::new(Self { token: RwLock::new(token), store }))
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Stores the token both in memory and in the persistent store.
    pub fn establish(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        self.store.save(token)
    }

    /// Clears both copies of the credential.
    pub fn clear(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        info!("Session cleared");
        self.store.clear()
    }

    ///
    /// Synthesizes the current user from the held token without contacting
    /// the backend. The token is not checked for validity.
    ///
    pub fn current_user(&self) -> Option<User> {
        self.token().map(|token| User {
            username: token.clone(),
            role: Role::from_login_id(&token),
            token,
        })
    }
}
