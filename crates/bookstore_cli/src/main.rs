//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookstore_core` linkage, config loading and schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `bookstore_cli [CONFIG_PATH]`; falls back to `BOOKSTORE_CONFIG`,
//! then to built-in defaults.

use bookstore_core::config::CONFIG_PATH_ENV;
use bookstore_core::db::migrations::current_version;
use bookstore_core::{
    core_version, init_logging, AuthorRepository, BookRepository, CoreConfig, PrizeRepository,
    RepoError, SqliteAuthorRepository, SqliteBookRepository, SqlitePrizeRepository,
    TransactionManager,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bookstore_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("bookstore_core version={}", core_version());

    let config = match config_path() {
        Some(path) => {
            println!("config={}", path.display());
            CoreConfig::load(&path)?
        }
        None => CoreConfig::default(),
    };

    if let Some(dir) = config.logging.dir.as_ref() {
        init_logging(&config.logging.level, dir)?;
    }

    let mut conn = config.open_database()?;
    println!("schema_version={}", current_version(&conn)?);

    let (authors, books, prizes) =
        TransactionManager::new(&mut conn).run::<_, RepoError, _>("cli_counts", |uow| {
            Ok((
                SqliteAuthorRepository::new().list_authors(uow)?.len(),
                SqliteBookRepository::new().list_books(uow)?.len(),
                SqlitePrizeRepository::new().list_prizes(uow)?.len(),
            ))
        })?;
    println!("authors={authors} books={books} prizes={prizes}");
    info!("event=cli_probe module=cli status=ok authors={authors} books={books} prizes={prizes}");

    Ok(())
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}
