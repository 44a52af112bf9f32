pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Connects to `DATABASE_URL`.
///
/// A plain path is treated as a SQLite file; its parent directory is created
/// first because SQLite won't create intermediate dirs.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let raw = config::database_url();
    if let Some(parent) = config::sqlite_file_path(&raw)
        .as_deref()
        .and_then(Path::parent)
    {
        let _ = std::fs::create_dir_all(parent);
    }

    let url = config::database_dsn();
    tracing::info!(target: "db", "connecting to {}", redact(&url));
    Database::connect(&url).await
}

/// Strips the password from a DSN before it is logged.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let creds = &url[scheme_end + 3..at];
            match creds.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &creds[..colon],
                    &url[at..]
                ),
                None => url.to_owned(),
            }
        }
        _ => url.to_owned(),
    }
}
