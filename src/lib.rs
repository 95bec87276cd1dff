pub mod config;
pub mod database;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

pub use database::Database;
pub use state::AppState;
