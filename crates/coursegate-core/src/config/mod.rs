use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Minimum session signing secret length accepted by the cookie signer.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// JSON file older deployments keep their TLS settings in, with `domain`,
/// `autocert` and `certification` at the top level.
pub const LEGACY_TLS_CONFIG_PATH: &str = "config/config.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub tls: TlsConfig,
    pub auth: AuthConfig,
    pub files: FilesConfig,
    pub frontend: FrontendConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Port that switches the front door into TLS mode.
    pub tls_port: u16,
    pub redirect_port: u16,
    pub redirect_http: bool,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the listen address for `port` in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self, port: u16) -> String {
        format!("{}:{}", self.host, port)
    }

    /// ## Summary
    /// Whether the configured port selects the TLS listener.
    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.port == self.tls_port
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    pub domain: String,
    pub autocert: bool,
    pub certification: CertificationConfig,
    pub acme_cache_dir: PathBuf,
}

impl TlsConfig {
    /// ## Summary
    /// Host names the ACME listener requests certificates for.
    #[must_use]
    pub fn acme_domains(&self) -> Vec<String> {
        vec![self.domain.clone(), format!("www.{}", self.domain)]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificationConfig {
    pub crt: PathBuf,
    pub key: PathBuf,
}

/// Top-level keys of [`LEGACY_TLS_CONFIG_PATH`]. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct LegacyTlsConfig {
    domain: Option<String>,
    autocert: Option<bool>,
    #[serde(default)]
    certification: LegacyCertificationConfig,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyCertificationConfig {
    crt: Option<String>,
    key: Option<String>,
}

impl LegacyTlsConfig {
    fn read(path: &Path) -> Result<Self> {
        Ok(Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize::<Self>()?)
    }
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub allow_list_path: PathBuf,
    pub session_cookie_name: String,
    pub session_ttl_secs: u64,
    /// How often expired sessions are swept from the in-memory store.
    pub session_cleanup_secs: u64,
    pub session_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("allow_list_path", &self.allow_list_path)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("session_cleanup_secs", &self.session_cleanup_secs)
            .field(
                "session_secret",
                &self.session_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    #[must_use]
    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session_cleanup_secs)
    }

    /// ## Summary
    /// Returns the key used to sign session cookies.
    ///
    /// Without a configured secret a random one is generated, so sessions do
    /// not survive a restart.
    ///
    /// ## Errors
    /// Returns an error if the configured secret is shorter than
    /// [`MIN_SESSION_SECRET_LEN`] bytes.
    pub fn session_secret_bytes(&self) -> CoreResult<Vec<u8>> {
        match &self.session_secret {
            Some(secret) if secret.len() < MIN_SESSION_SECRET_LEN => {
                Err(CoreError::ConfigError(format!(
                    "auth.session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
                )))
            }
            Some(secret) => Ok(secret.as_bytes().to_vec()),
            None => {
                tracing::warn!("No session secret configured, generating an ephemeral one");
                Ok((0..MIN_SESSION_SECRET_LEN / 16)
                    .flat_map(|_| *uuid::Uuid::new_v4().as_bytes())
                    .collect())
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory whose immediate subdirectories are the listable top-level directories.
    pub root: PathBuf,
    /// Prefix of the download URLs returned by the listing endpoint.
    pub url_prefix: String,
    pub course_dir: String,
    pub course_in_url: bool,
    /// Status sent with the "Access deny" body. 200 reproduces the legacy behaviour.
    pub denial_status: u16,
    pub error_page: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    pub root: PathBuf,
    pub index: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `config.toml`, an optional explicit
    /// file and `COURSEGATE_` environment variables, in increasing precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it or
    /// validating it fails, or if `extra_file` is given but cannot be read.
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        Self::load_with_legacy(extra_file, Path::new(LEGACY_TLS_CONFIG_PATH))
    }

    /// ## Summary
    /// Like [`Settings::load`], reading legacy TLS keys from `legacy_file`.
    ///
    /// The legacy keys replace the built-in `tls.*` defaults, so every other
    /// source still overrides them.
    ///
    /// ## Errors
    /// As [`Settings::load`], and if `legacy_file` exists but is malformed.
    pub fn load_with_legacy(extra_file: Option<&Path>, legacy_file: &Path) -> Result<Self> {
        let legacy = LegacyTlsConfig::read(legacy_file)?;

        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.tls_port", 443)?
            .set_default("server.redirect_port", 80)?
            .set_default("server.redirect_http", true)?
            .set_default("server.request_timeout_secs", 3600)?
            .set_default("tls.domain", "")?
            .set_default("tls.autocert", false)?
            .set_default("tls.certification.crt", "")?
            .set_default("tls.certification.key", "")?
            .set_default("tls.acme_cache_dir", "./")?
            .set_default("auth.allow_list_path", "login.txt")?
            .set_default("auth.session_cookie_name", "coursegate.sid")?
            .set_default("auth.session_ttl_secs", 86_400)?
            .set_default("auth.session_cleanup_secs", 600)?
            .set_default("files.root", "./files")?
            .set_default("files.url_prefix", "files")?
            .set_default("files.course_dir", "course")?
            .set_default("files.course_in_url", false)?
            .set_default("files.denial_status", 403)?
            .set_default("files.error_page", "/error/403")?
            .set_default("frontend.root", "./angular")?
            .set_default("frontend.index", "index.html")?
            .set_default("logging.level", "info")?;

        if let Some(domain) = legacy.domain {
            builder = builder.set_default("tls.domain", domain)?;
        }
        // Legacy `autocert = true` selects the certificate pair, not ACME.
        if let Some(autocert) = legacy.autocert {
            builder = builder.set_default("tls.autocert", !autocert)?;
        }
        if let Some(crt) = legacy.certification.crt {
            builder = builder.set_default("tls.certification.crt", crt)?;
        }
        if let Some(key) = legacy.certification.key {
            builder = builder.set_default("tls.certification.key", key)?;
        }

        // TOML file
        builder = builder.add_source(config::File::with_name("config.toml").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            // Env vars
            .add_source(
                config::Environment::with_prefix("COURSEGATE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks settings that must hold regardless of the listener mode.
    ///
    /// ## Errors
    /// Returns `ConfigError` for an invalid denial status, a short session
    /// secret or an empty course directory name.
    pub fn validate(&self) -> CoreResult<()> {
        if !(100..=599).contains(&self.files.denial_status) {
            return Err(CoreError::ConfigError(format!(
                "files.denial_status {} is not an HTTP status code",
                self.files.denial_status
            )));
        }

        if let Some(secret) = &self.auth.session_secret
            && secret.len() < MIN_SESSION_SECRET_LEN
        {
            return Err(CoreError::ConfigError(format!(
                "auth.session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
            )));
        }

        if self.auth.session_cleanup_secs == 0 {
            return Err(CoreError::ConfigError(
                "auth.session_cleanup_secs must be greater than zero".to_string(),
            ));
        }

        if self.files.course_dir.is_empty() || self.files.course_dir.contains('/') {
            return Err(CoreError::ConfigError(
                "files.course_dir must be a single path segment".to_string(),
            ));
        }

        Ok(())
    }

    /// ## Summary
    /// Checks the settings consumed when the front door runs in TLS mode.
    ///
    /// ## Errors
    /// Returns `ConfigError` if ACME is selected without a domain or static
    /// certificates are selected without both file paths.
    pub fn validate_tls(&self) -> CoreResult<()> {
        if self.tls.autocert {
            if self.tls.domain.is_empty() {
                return Err(CoreError::ConfigError(
                    "tls.domain is required when tls.autocert is enabled".to_string(),
                ));
            }
        } else if self.tls.certification.crt.as_os_str().is_empty()
            || self.tls.certification.key.as_os_str().is_empty()
        {
            return Err(CoreError::ConfigError(
                "tls.certification.crt and tls.certification.key are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and config files.
///
/// ## Errors
/// Returns an error if loading, deserializing or validating the configuration fails.
pub fn load_config(extra_file: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load(extra_file)
}
