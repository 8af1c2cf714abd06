pub use self::file::FileStore;
pub use self::postgre::{get_path, PoolOption, PoolType};

mod file;
mod postgre;

use async_trait::async_trait;

use crate::{error::Error, model::Snapshot};

/// Outcome of a snapshot lookup. A missing row is a normal first-run
/// condition, distinct from a store transport failure (`Err`).
#[derive(Debug)]
pub enum SnapshotLoad {
    Found(Snapshot),
    NotFound,
}

/// Single persistence seam for the "yesterday" snapshot. Backends are
/// selected by configuration; the pipeline never sees which one is active.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<SnapshotLoad, Error>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), Error>;
}
