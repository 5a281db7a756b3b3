//! Cookie session settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning; release
//! builds insist on every toggle being set to a valid value.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use super::validation::parse_flag;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics on shorter input.
const KEY_DERIVE_MIN_LEN: usize = 32;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const FLAG_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether the binary was compiled with debug assertions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// ```rust
    /// use recipe_backend::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Key used to encrypt and sign the session cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Reasons session settings could not be built.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Environment reader that applies the build mode's leniency.
struct Toggles<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Toggles<'_, E> {
    /// Resolve an unset or unparseable toggle: debug builds warn and use
    /// `fallback`, release builds fail with `error`.
    fn lenient<T>(
        &self,
        name: &'static str,
        fallback: T,
        error: SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        match self.mode {
            BuildMode::Debug => {
                warn!(variable = name, "session toggle unset or invalid; using default");
                Ok(fallback)
            }
            BuildMode::Release => Err(error),
        }
    }

    fn flag(&self, name: &'static str, fallback: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.lenient(name, fallback, SessionConfigError::MissingEnv { name });
        };
        match parse_flag(&value) {
            Some(flag) => Ok(flag),
            None => self.lenient(
                name,
                fallback,
                SessionConfigError::InvalidEnv {
                    name,
                    value,
                    expected: FLAG_EXPECTED,
                },
            ),
        }
    }

    fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let fallback = match self.mode {
            BuildMode::Debug => SameSite::Lax,
            BuildMode::Release => SameSite::Strict,
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.lenient(
                SAMESITE_ENV,
                fallback,
                SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            );
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => match self.mode {
                BuildMode::Debug => {
                    warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it");
                    Ok(SameSite::None)
                }
                BuildMode::Release => Err(SessionConfigError::InsecureSameSiteNone),
            },
            _ => self.lenient(
                SAMESITE_ENV,
                fallback,
                SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
            ),
        }
    }

    fn allow_ephemeral(&self) -> Result<bool, SessionConfigError> {
        let allowed = self.flag(ALLOW_EPHEMERAL_ENV, false)?;
        if allowed && self.mode == BuildMode::Release {
            return Err(SessionConfigError::EphemeralNotAllowed);
        }
        Ok(allowed)
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
        );
        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if self.mode == BuildMode::Debug || allow_ephemeral => {
                warn!(path = %path.display(), error = %source, "using an ephemeral session key");
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };
        let length = bytes.len();
        if self.mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
            bytes.zeroize();
            return Err(SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            });
        }
        if length < KEY_DERIVE_MIN_LEN {
            bytes.zeroize();
            warn!(
                path = %path.display(),
                length,
                min_len = KEY_DERIVE_MIN_LEN,
                "session key file too short; using an ephemeral session key"
            );
            return Ok(Key::generate());
        }
        let key = Key::derive_from(&bytes);
        bytes.zeroize();
        Ok(key)
    }
}

/// Build session settings from `SESSION_*` variables.
///
/// # Examples
///
/// ```rust
/// use recipe_backend::inbound::http::session_config::{session_settings_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let toggles = Toggles { env, mode };
    let cookie_secure = toggles.flag(COOKIE_SECURE_ENV, true)?;
    let same_site = toggles.same_site(cookie_secure)?;
    let allow_ephemeral = toggles.allow_ephemeral()?;
    let key = toggles.key(allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}
