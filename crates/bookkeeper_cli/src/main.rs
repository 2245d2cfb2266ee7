//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookkeeper_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use bookkeeper_core::{open_db_in_memory, Category, Filter, Repository, SqliteRepository};

fn main() {
    println!("bookkeeper_core version={}", bookkeeper_core::core_version());

    // One in-memory round-trip as a wiring probe; real callers own their
    // database file and repositories.
    let result = open_db_in_memory()
        .map_err(|err| err.to_string())
        .and_then(|conn| {
            let repo: SqliteRepository<'_, Category> =
                SqliteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let mut category = Category::new("probe");
            repo.add(&mut category).map_err(|err| err.to_string())?;
            let stored = repo.get_all(&Filter::new()).map_err(|err| err.to_string())?;
            Ok(stored.len())
        });

    match result {
        Ok(count) => println!("bookkeeper_core probe=ok categories={count}"),
        Err(err) => {
            eprintln!("bookkeeper_core probe=error {err}");
            std::process::exit(1);
        }
    }
}
