//! `limo migrate`: manage the local database schema by hand.
//!
//! Every other command migrates on connect; this exists for rollbacks and
//! inspecting the applied migrations.

use limo::db;
use limo::migration::{Migrator, MigratorTrait};

use super::CommandResult;
use crate::MigrateAction;

pub(crate) async fn handle_migrate(action: MigrateAction, database_url: &str) -> CommandResult {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(&db).await?.len();
            Migrator::up(&db, None).await?;
            println!("Applied {pending} migration(s).");
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            println!("Rolled back the last migration.");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(&db).await? {
                println!("{:<40} {}", migration.name(), migration.status());
            }
        }
        MigrateAction::Fresh => {
            Migrator::fresh(&db).await?;
            println!("Dropped all tables and reapplied every migration.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_action_runs_on_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("limo.db").display());

        handle_migrate(MigrateAction::Up, &url).await.unwrap();
        handle_migrate(MigrateAction::Status, &url).await.unwrap();
        handle_migrate(MigrateAction::Down, &url).await.unwrap();
        handle_migrate(MigrateAction::Fresh, &url).await.unwrap();

        let db = db::connect(&url).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    }
}
