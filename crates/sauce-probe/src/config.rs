//! Run configuration: credentials from the environment and the storefront URLs.
//!
//! Credentials are read once at startup. A `.env` file in the working
//! directory (or any parent) is honoured, but values already present in the
//! process environment win. Every required key must be present and non-empty,
//! otherwise loading fails with [`E2eError::MissingEnvironment`] naming all of
//! the missing keys at once.

use crate::result::{E2eError, E2eResult};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Username of the standard (happy path) account
pub const STANDARD_USERNAME: &str = "STANDARD_USERNAME";
/// Password shared by the demo accounts
pub const PASSWORD: &str = "PASSWORD";
/// Username of the account that is locked out
pub const LOCKED_OUT_USERNAME: &str = "LOCKED_OUT_USERNAME";
/// A password that no account accepts
pub const INVALID_PASSWORD: &str = "INVALID_PASSWORD";

/// Every key that must be set before a run can start
pub const REQUIRED_KEYS: [&str; 4] = [
    STANDARD_USERNAME,
    PASSWORD,
    LOCKED_OUT_USERNAME,
    INVALID_PASSWORD,
];

/// Default storefront root
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/v1";

/// A username/password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username typed into the login form
    pub username: String,
    /// Password typed into the login form
    pub password: String,
}

impl Credentials {
    /// Create a new credential pair
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials required by the shipped suites
#[derive(Clone)]
pub struct Environment {
    standard_username: String,
    locked_out_username: String,
    password: String,
    invalid_password: String,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("standard_username", &self.standard_username)
            .field("locked_out_username", &self.locked_out_username)
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Load `.env` (if any) into the process environment, then read the
    /// required keys.
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::MissingEnvironment`] if any required key is unset
    /// or empty, or [`E2eError::EnvFile`] if a `.env` file exists but is
    /// malformed.
    pub fn load() -> E2eResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => tracing::debug!("no .env file found"),
            Err(e) => {
                return Err(E2eError::EnvFile {
                    path: ".env".to_string(),
                    message: e.to_string(),
                })
            }
        }
        Self::from_process_env()
    }

    /// Read the required keys from the process environment only
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::MissingEnvironment`] if any key is unset or empty.
    pub fn from_process_env() -> E2eResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the required keys from an explicit env file, with the process
    /// environment taking precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::EnvFile`] if the file cannot be read or parsed and
    /// [`E2eError::MissingEnvironment`] if any key is still missing.
    pub fn from_env_file(path: &Path) -> E2eResult<Self> {
        let env_file_error = |e: dotenvy::Error| E2eError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(env_file_error)? {
            let (key, value) = item.map_err(env_file_error)?;
            let _ = values.insert(key, value);
        }

        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| values.get(key).cloned()))
    }

    /// Build the environment from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::MissingEnvironment`] listing every key for which
    /// the lookup returned `None` or a blank value.
    pub fn from_lookup<F>(lookup: F) -> E2eResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |key: &str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let standard_username = fetch(STANDARD_USERNAME);
        let password = fetch(PASSWORD);
        let locked_out_username = fetch(LOCKED_OUT_USERNAME);
        let invalid_password = fetch(INVALID_PASSWORD);

        if !missing.is_empty() {
            return Err(E2eError::MissingEnvironment { keys: missing });
        }

        Ok(Self {
            standard_username,
            locked_out_username,
            password,
            invalid_password,
        })
    }

    /// The standard account
    #[must_use]
    pub fn standard_user(&self) -> Credentials {
        Credentials::new(&self.standard_username, &self.password)
    }

    /// The locked-out account with the valid password
    #[must_use]
    pub fn locked_out_user(&self) -> Credentials {
        Credentials::new(&self.locked_out_username, &self.password)
    }

    /// The standard username paired with a password nobody accepts
    #[must_use]
    pub fn invalid_password_user(&self) -> Credentials {
        Credentials::new(&self.standard_username, &self.invalid_password)
    }
}

/// Fixed URLs of the storefront screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    base: String,
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SiteUrls {
    /// Create URLs rooted at `base` (trailing slashes are ignored)
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Storefront root
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Login screen
    #[must_use]
    pub fn login(&self) -> String {
        self.page("index.html")
    }

    /// Product listing
    #[must_use]
    pub fn inventory(&self) -> String {
        self.page("inventory.html")
    }

    /// Shopping cart
    #[must_use]
    pub fn cart(&self) -> String {
        self.page("cart.html")
    }

    /// Checkout: customer information
    #[must_use]
    pub fn checkout_step_one(&self) -> String {
        self.page("checkout-step-one.html")
    }

    /// Checkout: order overview
    #[must_use]
    pub fn checkout_step_two(&self) -> String {
        self.page("checkout-step-two.html")
    }

    /// Checkout: confirmation
    #[must_use]
    pub fn checkout_complete(&self) -> String {
        self.page("checkout-complete.html")
    }

    fn page(&self, file: &str) -> String {
        format!("{}/{file}", self.base)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_lookup(key: &str) -> Option<String> {
        match key {
            STANDARD_USERNAME => Some("standard_user".into()),
            PASSWORD => Some("secret_sauce".into()),
            LOCKED_OUT_USERNAME => Some("locked_out_user".into()),
            INVALID_PASSWORD => Some("wrong".into()),
            _ => None,
        }
    }

    mod environment_tests {
        use super::*;

        #[test]
        fn test_all_keys_present() {
            let env = Environment::from_lookup(full_lookup).unwrap();
            assert_eq!(
                env.standard_user(),
                Credentials::new("standard_user", "secret_sauce")
            );
            assert_eq!(
                env.locked_out_user(),
                Credentials::new("locked_out_user", "secret_sauce")
            );
            assert_eq!(
                env.invalid_password_user(),
                Credentials::new("standard_user", "wrong")
            );
        }

        #[test]
        fn test_missing_keys_reported_together() {
            let err = Environment::from_lookup(|key| {
                if key == PASSWORD || key == INVALID_PASSWORD {
                    None
                } else {
                    full_lookup(key)
                }
            })
            .unwrap_err();

            match err {
                E2eError::MissingEnvironment { keys } => {
                    assert_eq!(keys, vec![PASSWORD, INVALID_PASSWORD]);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_blank_value_counts_as_missing() {
            let err = Environment::from_lookup(|key| {
                if key == STANDARD_USERNAME {
                    Some("   ".into())
                } else {
                    full_lookup(key)
                }
            })
            .unwrap_err();
            assert!(err.to_string().contains(STANDARD_USERNAME));
        }

        #[test]
        fn test_nothing_set() {
            let err = Environment::from_lookup(|_| None).unwrap_err();
            match err {
                E2eError::MissingEnvironment { keys } => assert_eq!(keys.len(), 4),
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_debug_redacts_password() {
            let creds = Credentials::new("standard_user", "secret_sauce");
            let debug = format!("{creds:?}");
            assert!(debug.contains("standard_user"));
            assert!(!debug.contains("secret_sauce"));
        }

        #[test]
        fn test_env_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.env");
            let mut file = std::fs::File::create(&path).unwrap();
            for key in REQUIRED_KEYS {
                writeln!(file, "{key}=from-file-{}", key.to_lowercase()).unwrap();
            }
            drop(file);

            let env = Environment::from_env_file(&path).unwrap();
            // Process environment may legitimately override in CI
            if std::env::var(PASSWORD).is_err() && std::env::var(STANDARD_USERNAME).is_err() {
                assert_eq!(
                    env.standard_user(),
                    Credentials::new("from-file-standard_username", "from-file-password")
                );
            }
        }

        #[test]
        fn test_env_file_missing() {
            let dir = tempfile::tempdir().unwrap();
            let err = Environment::from_env_file(&dir.path().join("absent.env")).unwrap_err();
            assert!(matches!(err, E2eError::EnvFile { .. }));
        }
    }

    mod site_urls_tests {
        use super::*;

        #[test]
        fn test_default_urls() {
            let urls = SiteUrls::default();
            assert_eq!(urls.login(), "https://www.saucedemo.com/v1/index.html");
            assert_eq!(urls.inventory(), "https://www.saucedemo.com/v1/inventory.html");
            assert_eq!(urls.cart(), "https://www.saucedemo.com/v1/cart.html");
            assert_eq!(
                urls.checkout_step_one(),
                "https://www.saucedemo.com/v1/checkout-step-one.html"
            );
            assert_eq!(
                urls.checkout_step_two(),
                "https://www.saucedemo.com/v1/checkout-step-two.html"
            );
            assert_eq!(
                urls.checkout_complete(),
                "https://www.saucedemo.com/v1/checkout-complete.html"
            );
        }

        #[test]
        fn test_trailing_slash_ignored() {
            let urls = SiteUrls::new("http://127.0.0.1:8080/v1/");
            assert_eq!(urls.base(), "http://127.0.0.1:8080/v1");
            assert_eq!(urls.cart(), "http://127.0.0.1:8080/v1/cart.html");
        }
    }
}
