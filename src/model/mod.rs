pub mod chat;
pub mod config;
pub mod idea;

pub use chat::*;
pub use config::*;
pub use idea::*;
