pub mod audio;
pub mod compute;
pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod scheduler;
pub mod store;

pub use error::{GameError, Result};
