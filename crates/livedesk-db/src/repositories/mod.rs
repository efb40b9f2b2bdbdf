//! Repository implementations

mod chat;

pub use chat::PgChatRepository;
