use std::path::{Path, PathBuf};

use crate::error::ApiError;
use crate::oauth::OAuthConfig;
use crate::store::write_private;

/// Redirect registered for the loopback login flow.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8417/callback";

const ENV_CLIENT_ID: &str = "ITAD_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "ITAD_CLIENT_SECRET";
const ENV_API_KEY: &str = "ITAD_API_KEY";
const ENV_REDIRECT_URI: &str = "ITAD_REDIRECT_URI";

/// Credentials for the IsThereAnyDeal API and its OAuth app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_key: Option<String>,
    pub redirect_uri: String,
}

/// Where a credential field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub client_id: CredentialSource,
    pub client_secret: CredentialSource,
    pub api_key: CredentialSource,
    pub redirect_uri: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    itad: Option<ItadConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
struct ItadConfig {
    client_id: Option<String>,
    client_secret: Option<String>,
    api_key: Option<String>,
    redirect_uri: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables and the config file.
    ///
    /// Priority: env vars > config file > default. Missing fields stay `None`
    /// here; commands that need them fail when they ask for them.
    pub fn load() -> Self {
        let config = config_path().and_then(|p| read_config(&p));
        Self::resolve(env_var, config.as_ref())
    }

    /// Like [`Credentials::load`], but reads the config file at `path`.
    pub fn load_from(path: &Path) -> Self {
        Self::resolve(env_var, read_config(path).as_ref())
    }

    fn resolve(env: impl Fn(&str) -> Option<String>, config: Option<&ItadConfig>) -> Self {
        let pick = |var: &str, field: fn(&ItadConfig) -> &Option<String>| {
            env(var).or_else(|| config.and_then(|c| field(c).clone()))
        };

        Self {
            client_id: pick(ENV_CLIENT_ID, |c| &c.client_id),
            client_secret: pick(ENV_CLIENT_SECRET, |c| &c.client_secret),
            api_key: pick(ENV_API_KEY, |c| &c.api_key),
            redirect_uri: pick(ENV_REDIRECT_URI, |c| &c.redirect_uri)
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
        }
    }

    /// Apply explicit values (e.g., from CLI args).
    pub fn with_overrides(
        mut self,
        client_id: Option<String>,
        client_secret: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        if let Some(id) = client_id {
            self.client_id = Some(id);
        }
        if let Some(secret) = client_secret {
            self.client_secret = Some(secret);
        }
        if let Some(key) = api_key {
            self.api_key = Some(key);
        }
        self
    }

    /// OAuth app settings for the login flow.
    pub fn oauth_config(&self) -> Result<OAuthConfig, ApiError> {
        let client_id = self.client_id.clone().ok_or_else(|| {
            ApiError::Config(format!(
                "Missing client_id. Set {} or run 'itad-import config setup'",
                ENV_CLIENT_ID
            ))
        })?;
        let client_secret = self.client_secret.clone().ok_or_else(|| {
            ApiError::Config(format!(
                "Missing client_secret. Set {} or run 'itad-import config setup'",
                ENV_CLIENT_SECRET
            ))
        })?;

        Ok(OAuthConfig::new(
            client_id,
            client_secret,
            self.redirect_uri.clone(),
        ))
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("itad-import").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
///
/// Returns the path the file was written to.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, ApiError> {
    let path = config_path()
        .ok_or_else(|| ApiError::Config("Could not determine config directory".to_string()))?;
    save_to(creds, &path)?;
    Ok(path)
}

/// Save credentials to `path`, readable only by the owner. The default
/// redirect is not persisted.
pub fn save_to(creds: &Credentials, path: &Path) -> Result<(), ApiError> {
    let config = ConfigFile {
        itad: Some(ItadConfig {
            client_id: creds.client_id.clone(),
            client_secret: creds.client_secret.clone(),
            api_key: creds.api_key.clone(),
            redirect_uri: if creds.redirect_uri == DEFAULT_REDIRECT_URI {
                None
            } else {
                Some(creds.redirect_uri.clone())
            },
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| ApiError::Config(format!("Failed to serialize config: {}", e)))?;

    write_private(path, toml_str.as_bytes())
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = config_path().and_then(|p| read_config(&p));
    sources(env_var, config.as_ref())
}

fn sources(env: impl Fn(&str) -> Option<String>, config: Option<&ItadConfig>) -> CredentialSources {
    let source = |var: &'static str, field: fn(&ItadConfig) -> &Option<String>, fallback| {
        if env(var).is_some() {
            CredentialSource::EnvVar(var)
        } else if config.and_then(|c| field(c).as_ref()).is_some() {
            CredentialSource::ConfigFile
        } else {
            fallback
        }
    };

    CredentialSources {
        client_id: source(ENV_CLIENT_ID, |c| &c.client_id, CredentialSource::Missing),
        client_secret: source(
            ENV_CLIENT_SECRET,
            |c| &c.client_secret,
            CredentialSource::Missing,
        ),
        api_key: source(ENV_API_KEY, |c| &c.api_key, CredentialSource::Missing),
        redirect_uri: source(
            ENV_REDIRECT_URI,
            |c| &c.redirect_uri,
            CredentialSource::Default,
        ),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_config(path: &Path) -> Option<ItadConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<ConfigFile>(&content) {
        Ok(config) => config.itad,
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn file_config() -> ItadConfig {
        ItadConfig {
            client_id: Some("file-client".into()),
            client_secret: Some("file-secret".into()),
            api_key: Some("file-key".into()),
            redirect_uri: None,
        }
    }

    #[test]
    fn env_overrides_config_file() {
        let env = |name: &str| (name == ENV_API_KEY).then(|| "env-key".to_string());
        let creds = Credentials::resolve(env, Some(&file_config()));

        assert_eq!(creds.api_key.as_deref(), Some("env-key"));
        assert_eq!(creds.client_id.as_deref(), Some("file-client"));
        assert_eq!(creds.redirect_uri, DEFAULT_REDIRECT_URI);
    }

    #[test]
    fn missing_everywhere_stays_none() {
        let creds = Credentials::resolve(no_env, None);
        assert!(creds.client_id.is_none());
        assert!(creds.api_key.is_none());

        let err = creds.oauth_config().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn sources_report_provenance() {
        let env = |name: &str| (name == ENV_CLIENT_SECRET).then(|| "s".to_string());
        let mut config = file_config();
        config.client_id = None;
        let sources = sources(env, Some(&config));

        assert_eq!(sources.client_id, CredentialSource::Missing);
        assert_eq!(
            sources.client_secret,
            CredentialSource::EnvVar(ENV_CLIENT_SECRET)
        );
        assert_eq!(sources.api_key, CredentialSource::ConfigFile);
        assert_eq!(sources.redirect_uri, CredentialSource::Default);
        assert_eq!(sources.client_secret.to_string(), "env $ITAD_CLIENT_SECRET");
    }

    #[test]
    fn save_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.toml");
        let creds = Credentials {
            client_id: Some("cid".into()),
            client_secret: Some("secret".into()),
            api_key: None,
            redirect_uri: "http://127.0.0.1:9000/cb".into(),
        };

        save_to(&creds, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[itad]"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        let config = read_config(&path).unwrap();
        assert_eq!(Credentials::resolve(no_env, Some(&config)), creds);
    }

    #[test]
    fn default_redirect_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        let creds = Credentials::resolve(no_env, Some(&file_config()));

        save_to(&creds, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("redirect_uri"));
    }

    #[test]
    fn malformed_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "itad = [not toml").unwrap();
        assert!(read_config(&path).is_none());
    }
}
