//! Register a single user against the configured PostgreSQL database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use user_registry::domain::ports::{CreateUserRequest, UserRegistration};
use user_registry::domain::{Email, NationalId, UserRegistrationService};
use user_registry::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// `register-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "register-user",
    about = "Register a user, rejecting duplicate email addresses",
    version
)]
struct CliArgs {
    /// Full name of the user.
    #[arg(long, value_name = "name")]
    name: String,
    /// Email address; stored trimmed and lower-cased.
    #[arg(long, value_name = "address")]
    email: Email,
    /// Eleven-digit national identifier, punctuation optional.
    #[arg(long = "national-id", value_name = "digits")]
    national_id: NationalId,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending schema migrations before registering.
    #[arg(long)]
    migrate: bool,
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
    let database_url = resolve_database_url(args.database_url)?;

    if args.migrate {
        run_pending_migrations(&database_url)
            .await
            .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let service = UserRegistrationService::new(Arc::new(DieselUserRepository::new(pool)));

    let user = service
        .create(CreateUserRequest::new(
            args.name,
            args.email,
            args.national_id,
        ))
        .await
        .map_err(|error| io::Error::other(format!("registration failed: {error}")))?;

    let json = serde_json::to_string_pretty(&user)
        .map_err(|error| io::Error::other(format!("serialise user: {error}")))?;
    writeln!(io::stdout().lock(), "{json}")
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}
