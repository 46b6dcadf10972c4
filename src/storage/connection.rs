//! Destination connection management.
//!
//! Opens the single PostgreSQL connection used by the bulk loader. Each
//! statement on it auto-commits; no explicit transaction is opened.

use log::{error, info};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::config::PgConfig;
use crate::error_handling::LoadError;

/// Builds connect options from `pg`. Unset values fall back to libpq
/// defaults (`PGHOST`, `PGUSER`, ... and then sqlx's built-ins).
pub fn connect_options(pg: &PgConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new().port(pg.port);
    if let Some(host) = &pg.host {
        options = options.host(host);
    }
    if let Some(database) = &pg.database {
        options = options.database(database);
    }
    if let Some(user) = &pg.user {
        options = options.username(user);
    }
    if let Some(password) = &pg.password {
        options = options.password(password);
    }
    if let Some(application_name) = &pg.application_name {
        options = options.application_name(application_name);
    }
    options
}

/// Opens a connection, giving up after `pg.connect_timeout`.
///
/// # Errors
///
/// - `LoadError::ConnectTimeout` if the bound elapses first
/// - `LoadError::Connect` if the server refuses the connection
pub async fn connect(pg: &PgConfig) -> Result<PgConnection, LoadError> {
    let options = connect_options(pg);

    match tokio::time::timeout(pg.connect_timeout, PgConnection::connect_with(&options)).await {
        Ok(Ok(conn)) => {
            info!(
                "Postgres connection created ({}:{})",
                options.get_host(),
                options.get_port()
            );
            Ok(conn)
        }
        Ok(Err(e)) => {
            error!("Error getting database: {e}");
            Err(LoadError::Connect(e))
        }
        Err(_) => {
            error!(
                "Timed out connecting to {}:{}",
                options.get_host(),
                options.get_port()
            );
            Err(LoadError::ConnectTimeout(pg.connect_timeout.as_secs()))
        }
    }
}
