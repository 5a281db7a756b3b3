//! Server settings loaded via OrthoConfig.
//!
//! Values come from `RECIPES_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Process-level settings for the HTTP server and its store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// Address to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    pub pool_max_size: Option<u32>,
    /// Apply pending schema migrations before serving; on unless disabled.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "RECIPES_HOST",
        "RECIPES_PORT",
        "RECIPES_DATABASE_URL",
        "RECIPES_POOL_MAX_SIZE",
        "RECIPES_RUN_MIGRATIONS",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("recipe-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();

        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
        assert!(settings.database_url().is_none());
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPES_HOST", Some("127.0.0.1".to_owned())),
            ("RECIPES_PORT", Some("9090".to_owned())),
            (
                "RECIPES_DATABASE_URL",
                Some("postgres://cook@localhost/recipes".to_owned()),
            ),
            ("RECIPES_POOL_MAX_SIZE", Some("4".to_owned())),
            ("RECIPES_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load();

        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(
            settings.database_url(),
            Some("postgres://cook@localhost/recipes")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn blank_database_url_means_memory() {
        let mut vars = VARS.map(|name| (name, None::<String>));
        vars[2].1 = Some("   ".to_owned());
        let _guard = lock_env(vars);

        assert!(load().database_url().is_none());
    }
}
