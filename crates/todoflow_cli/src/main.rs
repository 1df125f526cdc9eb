//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todoflow_core` linkage outside the Flutter/FFI runtime.
//! - Print a deterministic summary of the configured storage.

use std::process::ExitCode;
use std::sync::Arc;
use todoflow_core::{AppConfig, AppSession, SqliteKvStorage, SystemClock};

fn main() -> ExitCode {
    println!("todoflow_core ping={}", todoflow_core::ping());
    println!("todoflow_core version={}", todoflow_core::core_version());

    let config = AppConfig::from_env();
    if let Err(err) = todoflow_core::init_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let storage = match SqliteKvStorage::open(&config.db_path) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("storage open failed at {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let session = AppSession::open(Arc::new(storage), SystemClock);
    let stats = session.profile_stats();
    println!("storage={}", config.db_path.display());
    println!(
        "onboarding_completed={}",
        session.persistence().onboarding_completed().value
    );
    println!(
        "tasks total={} completed={} productivity_pct={} streak_days={}",
        stats.total_tasks, stats.tasks_completed, stats.productivity_pct, stats.current_streak
    );
    println!(
        "notifications total={} unread={}",
        session.notifications().len(),
        session.notifications().unread_count()
    );
    ExitCode::SUCCESS
}
