use crate::{
    cli::{
        actions::{Action, server::Args},
        commands::{self, hashing},
    },
    password::CostParameters,
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or the Argon2 cost
/// parameters are invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(commands::ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let db_username = matches.get_one::<String>(commands::ARG_DB_USERNAME).cloned();
    let db_password = matches
        .get_one::<String>(commands::ARG_DB_PASSWORD)
        .map(|password| SecretString::from(password.as_str()));
    let db_max_connections = matches
        .get_one::<u32>(commands::ARG_DB_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);

    let params = cost_parameters(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        db_username,
        db_password,
        db_max_connections,
        params,
    }))
}

fn cost_parameters(matches: &clap::ArgMatches) -> Result<CostParameters> {
    let defaults = CostParameters::default();

    let memory_kib = matches
        .get_one::<u32>(hashing::ARG_ARGON2_MEMORY_KIB)
        .copied()
        .unwrap_or(defaults.memory_kib());
    let iterations = matches
        .get_one::<u32>(hashing::ARG_ARGON2_ITERATIONS)
        .copied()
        .unwrap_or(defaults.iterations());
    let parallelism = matches
        .get_one::<u8>(hashing::ARG_ARGON2_PARALLELISM)
        .copied()
        .unwrap_or(defaults.parallelism());
    let salt_length = matches
        .get_one::<u32>(hashing::ARG_ARGON2_SALT_LENGTH)
        .copied()
        .unwrap_or(defaults.salt_length());
    let key_length = matches
        .get_one::<u32>(hashing::ARG_ARGON2_KEY_LENGTH)
        .copied()
        .unwrap_or(defaults.key_length());

    CostParameters::new(memory_kib, iterations, parallelism, salt_length, key_length)
        .context("invalid Argon2 cost parameters")
}
