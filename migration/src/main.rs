use std::{fs, path::Path, process::ExitCode};
use util::config;

mod runner;

#[tokio::main]
async fn main() -> ExitCode {
    let raw = config::database_url();
    let url = config::database_dsn();
    let sqlite_file = config::sqlite_file_path(&raw);
    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(sqlite_file.as_deref());
            Ok(())
        }
        Some("fresh") => {
            remove_db_file(sqlite_file.as_deref());
            create_db_dir(sqlite_file.as_deref());
            runner::run_all_migrations(&url).await
        }
        _ => {
            create_db_dir(sqlite_file.as_deref());
            runner::run_all_migrations(&url).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Migration failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn remove_db_file(path: Option<&Path>) {
    let Some(db_path) = path else {
        println!("DATABASE_URL is not a SQLite file, nothing to delete");
        return;
    };
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(e) => eprintln!("Failed to delete {}: {e}", db_path.display()),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(path: Option<&Path>) {
    if let Some(parent) = path.and_then(Path::parent) {
        let _ = fs::create_dir_all(parent);
    }
}
