//! Admin session token storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Utc};
use shared::domain::SESSION_COOKIE_NAME;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session cookie '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove session cookie '{}': {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Supplies the token attached to authenticated catalog requests.
pub trait TokenSupplier: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

pub trait SessionStore: Send + Sync {
    /// Current token, or `None` when absent or expired.
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

impl<T: SessionStore + ?Sized> TokenSupplier for T {
    fn current_token(&self) -> Option<String> {
        self.token()
    }
}

/// One `hexToken=<token>;expires=<date>` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionCookie {
    pub fn encode(&self) -> String {
        format!(
            "{SESSION_COOKIE_NAME}={};expires={}",
            self.token,
            self.expires_at.to_rfc2822()
        )
    }

    /// Parses a cookie line. Attributes may be separated by `;` or `; `.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split(';').map(str::trim);
        let token = parts
            .next()?
            .strip_prefix(SESSION_COOKIE_NAME)?
            .strip_prefix('=')?
            .to_string();
        if token.is_empty() {
            return None;
        }
        let expires = parts.find_map(|part| part.strip_prefix("expires="))?;
        let expires_at = DateTime::parse_from_rfc2822(expires).ok()?.with_timezone(&Utc);
        Some(Self { token, expires_at })
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Session cookie persisted to a single file between console runs.
pub struct CookieFileStore {
    path: PathBuf,
}

impl CookieFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_cookie(&self) -> Option<SessionCookie> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to read session cookie: {err}");
                return None;
            }
        };
        let cookie = SessionCookie::parse(&raw);
        if cookie.is_none() {
            debug!(path = %self.path.display(), "ignoring malformed session cookie");
        }
        cookie
    }
}

impl SessionStore for CookieFileStore {
    fn token(&self) -> Option<String> {
        self.read_cookie()
            .filter(|cookie| cookie.is_live(Utc::now()))
            .map(|cookie| cookie.token)
    }

    fn set_token(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), SessionError> {
        let cookie = SessionCookie {
            token: token.to_string(),
            expires_at,
        };
        let write_err = |source| SessionError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, cookie.encode()).map_err(write_err)?;
        debug!(path = %self.path.display(), %expires_at, "stored session cookie");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    cookie: Mutex<Option<SessionCookie>>,
}

impl MemorySessionStore {
    pub fn with_token(token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            cookie: Mutex::new(Some(SessionCookie {
                token: token.to_string(),
                expires_at,
            })),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        let guard = self.cookie.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|cookie| cookie.is_live(Utc::now()))
            .map(|cookie| cookie.token.clone())
    }

    fn set_token(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), SessionError> {
        let mut guard = self.cookie.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(SessionCookie {
            token: token.to_string(),
            expires_at,
        });
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.cookie.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
