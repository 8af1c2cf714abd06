pub mod health;
pub mod run_check;
pub mod version;
