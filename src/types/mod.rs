pub use self::protocol::{ProtocolRecord, SpikeRecord};

mod protocol;
