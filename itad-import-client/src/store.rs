//! On-disk session tokens and the last raw input.
//!
//! Tokens are opaque: they are stored and handed back, never inspected.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::TokenResponse;

/// Tokens this close to expiry are already treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Tokens persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Profile token from linking the sync profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_token: Option<String>,
}

impl SessionTokens {
    /// Record a fresh access token, keeping any existing sync token.
    pub fn set_access_token(&mut self, token: &TokenResponse, now: DateTime<Utc>) {
        self.access_token = Some(token.access_token.clone());
        self.expires_at = token
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| now + Duration::seconds(secs));
    }

    /// The access token, unless it is missing or expired.
    pub fn access_token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.access_token.as_deref()?;
        match self.expires_at {
            Some(expires) if expires - Duration::seconds(EXPIRY_SKEW_SECS) <= now => None,
            _ => Some(token),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token_at(Utc::now())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn sync_token(&self) -> Option<&str> {
        self.sync_token.as_deref()
    }
}

pub fn session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itad-import").join("session.toml"))
}

pub fn input_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("itad-import").join("last_input.json"))
}

/// Load stored tokens. A missing file is an empty session.
pub fn load_session() -> Result<SessionTokens, ApiError> {
    match session_path() {
        Some(path) => load_session_at(&path),
        None => Ok(SessionTokens::default()),
    }
}

pub fn load_session_at(path: &Path) -> Result<SessionTokens, ApiError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SessionTokens::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content).map_err(|e| {
        ApiError::Config(format!(
            "Corrupt session file {}: {}. Run 'itad-import logout' to reset it",
            path.display(),
            e
        ))
    })
}

pub fn save_session(tokens: &SessionTokens) -> Result<PathBuf, ApiError> {
    let path = session_path()
        .ok_or_else(|| ApiError::Config("Could not determine config directory".to_string()))?;
    save_session_at(tokens, &path)?;
    Ok(path)
}

pub fn save_session_at(tokens: &SessionTokens, path: &Path) -> Result<(), ApiError> {
    let toml_str = toml::to_string_pretty(tokens)
        .map_err(|e| ApiError::Config(format!("Failed to serialize session: {}", e)))?;
    write_private(path, toml_str.as_bytes())
}

/// Forget all tokens. Returns whether anything was stored.
pub fn clear_session() -> Result<bool, ApiError> {
    match session_path() {
        Some(path) => clear_session_at(&path),
        None => Ok(false),
    }
}

pub fn clear_session_at(path: &Path) -> Result<bool, ApiError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Remember the raw export so later runs can reuse it with `--cached`.
pub fn cache_input(raw: &str) -> Result<PathBuf, ApiError> {
    let path = input_cache_path()
        .ok_or_else(|| ApiError::Config("Could not determine cache directory".to_string()))?;
    cache_input_at(raw, &path)?;
    Ok(path)
}

pub fn cache_input_at(raw: &str, path: &Path) -> Result<(), ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, raw)?;
    Ok(())
}

/// The cached export, if any.
pub fn load_cached_input() -> Result<Option<String>, ApiError> {
    match input_cache_path() {
        Some(path) => load_cached_input_at(&path),
        None => Ok(None),
    }
}

pub fn load_cached_input_at(path: &Path) -> Result<Option<String>, ApiError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a file readable only by the owner (on unix).
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> Result<(), ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: Option<u64>) -> TokenResponse {
        TokenResponse {
            access_token: "at-1".into(),
            token_type: Some("Bearer".into()),
            expires_in,
            refresh_token: None,
            scope: None,
        }
    }

    #[test]
    fn expired_token_is_treated_as_absent() {
        let now = Utc::now();
        let mut tokens = SessionTokens::default();
        tokens.set_access_token(&token(Some(3600)), now);

        assert_eq!(tokens.access_token_at(now), Some("at-1"));
        assert_eq!(tokens.access_token_at(now + Duration::hours(2)), None);
    }

    #[test]
    fn token_without_expiry_never_expires() {
        let mut tokens = SessionTokens::default();
        tokens.set_access_token(&token(None), Utc::now());
        assert!(tokens.is_authenticated());
    }

    #[test]
    fn new_login_keeps_sync_token() {
        let mut tokens = SessionTokens {
            sync_token: Some("profile".into()),
            ..Default::default()
        };
        tokens.set_access_token(&token(Some(60 * 60)), Utc::now());
        assert_eq!(tokens.sync_token(), Some("profile"));
    }

    #[test]
    fn session_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itad-import").join("session.toml");

        assert_eq!(load_session_at(&path).unwrap(), SessionTokens::default());

        let mut tokens = SessionTokens {
            sync_token: Some("profile".into()),
            ..Default::default()
        };
        tokens.set_access_token(&token(Some(3600)), Utc::now());
        save_session_at(&tokens, &path).unwrap();
        assert_eq!(load_session_at(&path).unwrap(), tokens);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        assert!(clear_session_at(&path).unwrap());
        assert!(!clear_session_at(&path).unwrap());
        assert_eq!(load_session_at(&path).unwrap(), SessionTokens::default());
    }

    #[test]
    fn corrupt_session_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "access_token = ").unwrap();
        assert!(matches!(
            load_session_at(&path),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn input_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("last_input.json");

        assert_eq!(load_cached_input_at(&path).unwrap(), None);
        cache_input_at("[{\"items\":[]}]", &path).unwrap();
        assert_eq!(
            load_cached_input_at(&path).unwrap().as_deref(),
            Some("[{\"items\":[]}]")
        );
    }
}
