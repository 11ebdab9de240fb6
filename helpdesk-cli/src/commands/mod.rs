pub mod chat;
pub mod complaint;
pub mod completion;
pub mod config;
