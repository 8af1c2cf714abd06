use std::{env, fs, ops::Deref, str::FromStr, sync::Arc};

use crate::{
    dao::SnapshotStore,
    error::Error,
    provider::{ChatTransport, FeedSource},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Process-wide state. Store, feed and transport are constructed once in
/// `main` and injected so tests can substitute fakes.
pub struct State {
    pub config: Config,
    pub store: Box<dyn SnapshotStore>,
    pub feed: Box<dyn FeedSource>,
    pub transport: Box<dyn ChatTransport>,
}

impl State {
    pub fn new(
        config: Config,
        store: Box<dyn SnapshotStore>,
        feed: Box<dyn FeedSource>,
        transport: Box<dyn ChatTransport>,
    ) -> State {
        State {
            config,
            store,
            feed,
            transport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotBackend {
    Postgres,
    File,
}

impl FromStr for SnapshotBackend {
    type Err = Error;

    fn from_str(value: &str) -> Result<SnapshotBackend, Error> {
        match value {
            "postgres" => Ok(SnapshotBackend::Postgres),
            "file" => Ok(SnapshotBackend::File),
            other => Err(Error::ConfigurationError(format!(
                "unknown STORE_BACKEND: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub snapshot_backend: SnapshotBackend,
    pub database_url: Option<String>,
    pub snapshot_file: Option<String>,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub trigger_secret: Option<String>,
    pub timeout: u64,
    pub check_hour: u32,
    pub max_chunk_len: usize,
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    // A .env file is a local convenience; deployments set real env vars.
    let Ok(config_string) = fs::read_to_string(path) else {
        return Ok(());
    };

    parse_config_string(config_string);
    Ok(())
}

fn parse_config_string(config: String) {
    for line in config.split('\n') {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if env::var(key).is_err() {
                env::set_var(key, value);
            }
        }
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host =
        env::var("SERVER_HOST").unwrap_or_else(|_| String::from("0.0.0.0"));
    let port = env::var("PORT")
        .unwrap_or_else(|_| String::from("3000"))
        .parse::<u16>()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| String::from("*"))
        .split(',')
        .map(|origin| origin.trim().to_owned())
        .collect();

    let snapshot_backend = env::var("STORE_BACKEND")
        .unwrap_or_else(|_| String::from("postgres"))
        .parse::<SnapshotBackend>()?;
    let database_url = env::var("DATABASE_URL").ok();
    let snapshot_file = env::var("SNAPSHOT_FILE").ok();

    let telegram_token = env::var("TELEGRAM_TOKEN")?;
    let telegram_chat_id = env::var("TELEGRAM_CHAT_ID")?;
    let trigger_secret = env::var("CRON_SECRET").ok();

    let timeout = env::var("TIMEOUT_IN_SEC")
        .unwrap_or_else(|_| String::from("30"))
        .parse::<u64>()?;
    let check_hour = env::var("CHECK_HOUR_UTC")
        .unwrap_or_else(|_| String::from("9"))
        .parse::<u32>()?;
    let max_chunk_len = env::var("MAX_MESSAGE_CHUNK")
        .unwrap_or_else(|_| String::from("4000"))
        .parse::<usize>()?;

    if check_hour > 23 {
        return Err(Error::ConfigurationError(format!(
            "CHECK_HOUR_UTC must be 0-23, got {}",
            check_hour
        )));
    }

    if max_chunk_len == 0 {
        return Err(Error::ConfigurationError(String::from(
            "MAX_MESSAGE_CHUNK must be positive",
        )));
    }

    Ok(Config {
        server_host,
        port,
        allowed_origins,
        snapshot_backend,
        database_url,
        snapshot_file,
        telegram_token,
        telegram_chat_id,
        trigger_secret,
        timeout,
        check_hour,
        max_chunk_len,
    })
}
