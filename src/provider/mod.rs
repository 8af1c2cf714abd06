pub use self::{
    database::DatabasePool,
    http::{FeedSource, LlamaFeed},
    telegram::{ChatTransport, TelegramClient},
};

mod database;
mod http;
mod telegram;
