//! Database row models

mod chat;

pub use chat::ChatModel;
