//! Terminal client for a bot-imitation backend: polls `/getUpdates`,
//! reconciles the results into a chat transcript and sends what the user
//! types back through `/sendMessage`.

pub mod app;
pub mod chat;
pub mod client;
pub mod config;
pub mod content;
pub mod identity;
pub mod poller;
pub mod render;
pub mod transcript;
pub mod update;

#[cfg(test)]
mod testing;
