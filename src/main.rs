mod categorize;
mod config;
mod db;
mod export;
mod logging;
mod models;
mod planner;
mod run;
mod summary;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let paths = config::AppPaths::resolve()?;
    let config = config::Config::load(&paths.config_file)?;
    if let Err(e) = logging::init(&paths.log_file(), &config.log_filter) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    let mut db = db::Database::open(&paths.db_file())?;

    match args.len() {
        1 => run::as_tui(&mut db, config, paths.config_file),
        _ => run::as_cli(&args, &mut db, &config),
    }
}
