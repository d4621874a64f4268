//! Task lists with subtasks, completion and star flags, and free-text
//! details, held in an in-memory store and persisted to a key-value backend.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod render;

pub use app::{AppState, Snapshot};
pub use error::PersistError;
