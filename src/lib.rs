//! Riddles API: HTTP resource API for riddle records backed by PostgreSQL.

pub mod access;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod representation;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use access::AllowList;
pub use config::{AppConfig, LogFormat};
pub use error::{AppError, ConfigError};
pub use model::{NewRiddle, Riddle};
pub use routes::{app, common_routes, riddle_routes};
pub use service::RiddlePatch;
pub use state::AppState;
pub use store::{connect, PgRiddleStore, RiddleStore};
