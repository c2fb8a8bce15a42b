pub mod board;
pub mod config;

pub use board::*;
pub use config::*;
