use async_trait::async_trait;

use crate::{
    configuration::Config,
    dao::{get_path, PoolOption, PoolType, SnapshotLoad, SnapshotStore},
    error::Error,
    model::{Snapshot, SnapshotRow, Table, SNAPSHOT_KEY},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub snapshot: Table<SnapshotRow>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let database_url = config.database_url.as_deref().ok_or_else(|| {
            Error::ConfigurationError(String::from(
                "DATABASE_URL is required for the postgres backend",
            ))
        })?;

        let pool = PoolOption::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Self::init_migrations(&pool).await?;

        Ok(DatabasePool {
            snapshot: Table::new(pool.clone()),
            pool,
        })
    }

    async fn init_migrations(pool: &PoolType) -> Result<(), Error> {
        let files = vec!["tvl_snapshot.sql"];
        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let data = get_path(dir, file)?;
            sqlx::query(data.as_str()).execute(pool).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for DatabasePool {
    async fn load(&self) -> Result<SnapshotLoad, Error> {
        match self.snapshot.get(SNAPSHOT_KEY).await? {
            Some(row) => Ok(SnapshotLoad::Found(row.data.0)),
            None => Ok(SnapshotLoad::NotFound),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), Error> {
        self.snapshot
            .upsert(SNAPSHOT_KEY, snapshot)
            .await
            .map_err(|e| Error::SnapshotSaveError(e.to_string()))
    }
}
