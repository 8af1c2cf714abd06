use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};

/// Filtered TVL mapping persisted between runs, protocol name to TVL in USD.
pub type Snapshot = HashMap<String, f64>;

/// Key of the single persisted snapshot row.
pub const SNAPSHOT_KEY: &str = "yesterday";

#[derive(Debug, FromRow)]
pub struct SnapshotRow {
    pub id: String,
    pub data: Json<Snapshot>,
    pub updated_at: DateTime<Utc>,
}
