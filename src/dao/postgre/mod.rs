pub use self::{
    path::get_path,
    types::{PoolOption, PoolType},
};

mod path;
mod snapshot;
mod types;
