//! Create a staff superuser account in the PostgreSQL store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use recipe_backend::domain::AccountService;
use recipe_backend::domain::ports::AccountCommand;
use recipe_backend::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use recipe_backend::settings::ServerSettings;
use tokio::runtime::Builder;

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an account with staff and superuser privileges",
    version
)]
struct CliArgs {
    #[arg(long, value_name = "address")]
    email: String,
    #[arg(long, value_name = "secret")]
    password: String,
    /// Database connection URL. Falls back to the server's configured URL.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = match args.database_url {
        Some(url) => url,
        None => configured_database_url()?,
    };

    run_pending_migrations(&database_url)
        .await
        .map_err(io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let accounts = AccountService::new(Arc::new(DieselUserRepository::new(pool)));

    let user = accounts
        .create_superuser(&args.email, &args.password)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("created superuser {} ({})", user.email(), user.id());
    Ok(())
}

/// The database URL from the server's settings layers (files and
/// `RECIPES_*` variables). Command-line flags belong to this tool, so only
/// the program name is passed on.
fn configured_database_url() -> io::Result<String> {
    let settings = ServerSettings::load_from_iter([OsString::from("create-superuser")])
        .map_err(|error| io::Error::other(format!("invalid server settings: {error}")))?;
    settings
        .database_url()
        .map(str::to_owned)
        .ok_or_else(|| io::Error::other("pass --database-url or set RECIPES_DATABASE_URL"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    const URL_ENV: &str = "RECIPES_DATABASE_URL";

    #[rstest]
    fn falls_back_to_the_configured_url() {
        let _guard = lock_env([(URL_ENV, Some("postgres://cook@localhost/recipes".to_owned()))]);

        let url = configured_database_url().expect("configured url");

        assert_eq!(url, "postgres://cook@localhost/recipes");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn missing_or_blank_urls_are_errors(#[case] value: Option<&str>) {
        let _guard = lock_env([(URL_ENV, value.map(str::to_owned))]);

        let error = configured_database_url().expect_err("no url configured");

        assert!(error.to_string().contains("--database-url"));
    }
}
