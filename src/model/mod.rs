pub use self::{
    snapshot::{Snapshot, SnapshotRow, SNAPSHOT_KEY},
    table::Table,
};

mod snapshot;
mod table;
