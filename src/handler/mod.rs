pub mod delivery;
pub mod report;
pub mod spikes;
pub mod tvl_check;
