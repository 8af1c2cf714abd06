use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{SnapshotLoad, SnapshotStore};
use crate::{error::Error, model::Snapshot};

/// JSON-file snapshot backend for deployments without a database.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for FileStore {
    async fn load(&self) -> Result<SnapshotLoad, Error> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(SnapshotLoad::NotFound);
            },
            Err(e) => return Err(Error::Io(e)),
        };

        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        Ok(SnapshotLoad::Found(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), Error> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| Error::SnapshotSaveError(e.to_string()))?;

        fs::write(&self.path, raw)
            .await
            .map_err(|e| Error::SnapshotSaveError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("snapshot.json"));

        assert!(matches!(store.load().await, Ok(SnapshotLoad::NotFound)));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("snapshot.json"));

        let mut snapshot = Snapshot::new();
        snapshot.insert(String::from("Aave"), 12_500_000_000.0);
        store.save(&snapshot).await.unwrap();

        match store.load().await.unwrap() {
            SnapshotLoad::Found(loaded) => assert_eq!(loaded, snapshot),
            SnapshotLoad::NotFound => panic!("snapshot should exist"),
        }
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("snapshot.json"));

        let mut first = Snapshot::new();
        first.insert(String::from("Aave"), 1.0);
        store.save(&first).await.unwrap();

        let mut second = Snapshot::new();
        second.insert(String::from("Lido"), 2.0);
        store.save(&second).await.unwrap();

        match store.load().await.unwrap() {
            SnapshotLoad::Found(loaded) => {
                assert_eq!(loaded, second);
                assert!(!loaded.contains_key("Aave"));
            },
            SnapshotLoad::NotFound => panic!("snapshot should exist"),
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = FileStore::new(path);
        assert!(store.load().await.is_err());
    }
}
