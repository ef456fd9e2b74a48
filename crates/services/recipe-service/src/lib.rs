//! Recipe Service Library
//!
//! Persistence and use cases for a recipe-sharing application: user
//! accounts with write-only password credentials, and recipes that
//! validate their own fields and are deleted together with their owner.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use common::AppResult;
use sea_orm::DbErr;
use tracing::info;

pub use config::RecipeServiceConfig;
pub use service::{AccountService, RecipeService, Services};

use crate::infra::Database;

/// Connect to the database, apply pending migrations and build the services.
pub async fn connect(config: &RecipeServiceConfig) -> AppResult<Services> {
    let db = Database::connect(&config.database).await?;
    Ok(Services::from_connection(db.get_connection(), config.hash_cost))
}

/// Run a migration action (for CLI commands).
pub async fn run_migrations(config: &RecipeServiceConfig, action: MigrateAction) -> Result<(), DbErr> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Fresh,
}
