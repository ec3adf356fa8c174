//! Connection descriptor for a Bitcoin Core RPC endpoint.
//!
//! A [`ConnectionConfig`] is built once from the caller's configuration and
//! handed to the transport; nothing in it changes afterwards.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8332;
pub const DEFAULT_USER: &str = "user";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ==============================================================================
// Scheme
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn from_https_flag(https: bool) -> Self {
        if https {
            Self::Https
        } else {
            Self::Http
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// Credentials
// ==============================================================================

/// Basic-auth credentials. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read `username:password` from the first line of a bitcoind cookie file.
    pub fn from_cookie_file(cookie_file: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(cookie_file).map_err(|e| {
            CoreError::InvalidConfig(format!(
                "failed to read rpc cookie file {}: {e}",
                cookie_file.display()
            ))
        })?;
        let line = content
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| {
                CoreError::InvalidConfig(format!(
                    "rpc cookie file {} is empty",
                    cookie_file.display()
                ))
            })?;

        let (user, password) = line.split_once(':').ok_or_else(|| {
            CoreError::InvalidConfig(format!(
                "rpc cookie file {} must contain `username:password`",
                cookie_file.display()
            ))
        })?;
        if user.is_empty() || password.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "rpc cookie file {} must contain non-empty `username:password`",
                cookie_file.display()
            )));
        }

        Ok(Self::new(user, password))
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USER, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ==============================================================================
// ConnectionConfig
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    credentials: Credentials,
    scheme: Scheme,
    timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        credentials: Credentials,
        scheme: Scheme,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
            scheme,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-round-trip timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The endpoint URL, `scheme://host:port/`.
    pub fn url(&self) -> Result<Url, CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::InvalidConfig("rpc host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(CoreError::InvalidConfig("rpc port must be non-zero".into()));
        }
        if self.timeout.is_zero() {
            return Err(CoreError::InvalidConfig(
                "rpc timeout must be greater than zero".into(),
            ));
        }

        // Bare IPv6 literals need brackets inside a URL authority.
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let raw = format!("{}://{}:{}", self.scheme, host, self.port);
        let url = Url::parse(&raw).map_err(|e| {
            CoreError::InvalidConfig(format!("invalid rpc endpoint `{raw}`: {e}"))
        })?;
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(CoreError::InvalidConfig(format!(
                "rpc host `{}` must not contain a path, query or fragment",
                self.host
            )));
        }
        Ok(url)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOST,
            DEFAULT_PORT,
            Credentials::default(),
            Scheme::Http,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_cookie(tag: &str, contents: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time must be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("btcrpc-cookie-{tag}-{unique}.txt"));
        fs::write(&path, contents).expect("cookie file must be writable");
        path
    }

    #[test]
    fn default_config_targets_local_mainnet_port() {
        let config = ConnectionConfig::default();
        let url = config.url().expect("default config must produce a url");
        assert_eq!(url.as_str(), "http://127.0.0.1:8332/");
        assert_eq!(config.credentials().user(), "user");
        assert_eq!(config.credentials().password(), "password");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn https_scheme_is_used_in_url() {
        let config = ConnectionConfig::new(
            "node.example.com",
            443,
            Credentials::new("alice", "secret"),
            Scheme::from_https_flag(true),
        );
        let url = config.url().expect("https config must produce a url");
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("node.example.com"));
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let config = ConnectionConfig::new("::1", 18443, Credentials::default(), Scheme::Http);
        let url = config.url().expect("ipv6 config must produce a url");
        assert_eq!(url.as_str(), "http://[::1]:18443/");
    }

    #[test]
    fn url_rejects_zero_port_and_empty_host() {
        let zero_port = ConnectionConfig::new("127.0.0.1", 0, Credentials::default(), Scheme::Http);
        assert!(zero_port.url().is_err());

        let empty_host = ConnectionConfig::new(" ", 8332, Credentials::default(), Scheme::Http);
        let err = empty_host.url().expect_err("must reject empty host");
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn url_rejects_host_with_path() {
        let config = ConnectionConfig::new(
            "127.0.0.1/wallet",
            8332,
            Credentials::default(),
            Scheme::Http,
        );
        assert!(config.url().is_err());
    }

    #[test]
    fn url_rejects_zero_timeout() {
        let config = ConnectionConfig::default().with_timeout(Duration::ZERO);
        assert!(config.url().is_err());
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn cookie_file_is_parsed() {
        let path = temp_cookie("valid", "__cookie__:token\n");
        let creds = Credentials::from_cookie_file(&path).expect("cookie must parse");
        assert_eq!(creds.user(), "__cookie__");
        assert_eq!(creds.password(), "token");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn cookie_file_without_separator_is_rejected() {
        let path = temp_cookie("no-separator", "no-separator\n");
        let err = Credentials::from_cookie_file(&path).expect_err("must reject cookie");
        assert!(err.to_string().contains("username:password"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_cookie_file_is_rejected() {
        let path = temp_cookie("empty", "\n");
        let err = Credentials::from_cookie_file(&path).expect_err("must reject empty cookie");
        assert!(err.to_string().contains("is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_cookie_file_is_rejected() {
        let path = std::env::temp_dir().join("btcrpc-cookie-does-not-exist.txt");
        let err = Credentials::from_cookie_file(&path).expect_err("must reject missing file");
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }
}
