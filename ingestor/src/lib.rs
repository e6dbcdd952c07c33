#[warn(clippy::pedantic)]
pub mod api;
pub mod database;
pub mod delta;
pub mod error;
pub mod fetch;
pub mod health;
pub mod models;
pub mod orchestrator;
pub mod reconcile;
pub mod scheduler;
pub mod store;
