use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

use super::db::build_sqlite_url;

/// Где искать `migrations/`: рядом с бинарником (туда кладёт build.rs),
/// затем относительно рабочей папки (cargo run из корня или из crates/backend).
fn migration_dirs(exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = exe_dir.map(|d| d.join("migrations")).into_iter().collect();
    dirs.extend(["migrations", "../../migrations"].iter().map(PathBuf::from));
    dirs
}

/// Накатывает схему. Ошибка миграции останавливает запуск сервера.
pub async fn run_migrations(db_path: &Path) -> anyhow::Result<()> {
    let exe = std::env::current_exe().ok();
    let dir = migration_dirs(exe.as_deref().and_then(Path::parent))
        .into_iter()
        .find(|p| p.is_dir())
        .ok_or_else(|| anyhow::anyhow!("migrations directory not found"))?;

    let migrator = Migrator::new(dir.as_path()).await?;
    let latest = migrator.iter().map(|m| m.version).max().unwrap_or_default();
    tracing::info!(
        "Applying {} migrations from {} (latest version {})",
        migrator.iter().count(),
        dir.display(),
        latest
    );

    let pool = SqlitePool::connect(&build_sqlite_url(db_path)).await?;
    let result = migrator.run(&pool).await;
    pool.close().await;
    result?;

    tracing::info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exe_dir_searched_first() {
        let dirs = migration_dirs(Some(Path::new("/opt/insurance")));
        assert_eq!(dirs[0], PathBuf::from("/opt/insurance/migrations"));
        assert_eq!(dirs.len(), 3);
        assert_eq!(migration_dirs(None)[0], PathBuf::from("migrations"));
    }
}
