use tracing::{error, Level};

use tvl_notifier::{
    configuration::{
        get_configuration, set_configuration, AppState, Config,
        SnapshotBackend, State,
    },
    dao::{FileStore, SnapshotStore},
    error::Error,
    handler::tvl_check,
    provider::{DatabasePool, LlamaFeed, TelegramClient},
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match init() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let store = init_store(&config).await?;
    let feed = LlamaFeed::new(&config)?;
    let transport = TelegramClient::new(&config)?;

    let state =
        State::new(config, store, Box::new(feed), Box::new(transport));
    let app_state = AppState::new(state);

    let (_, _) = tokio::try_join!(
        tvl_check::tvl_check_task(app_state.clone()),
        server::server_task(&app_state),
    )?;

    Ok(())
}

fn init() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

async fn init_store(config: &Config) -> Result<Box<dyn SnapshotStore>, Error> {
    match config.snapshot_backend {
        SnapshotBackend::Postgres => {
            Ok(Box::new(DatabasePool::new(config).await?))
        },
        SnapshotBackend::File => {
            let path = config.snapshot_file.as_deref().ok_or_else(|| {
                Error::ConfigurationError(String::from(
                    "SNAPSHOT_FILE is required for the file backend",
                ))
            })?;
            Ok(Box::new(FileStore::new(path)))
        },
    }
}
